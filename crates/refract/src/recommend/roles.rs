//! Column role detection for chart recommendation.

use crate::profile::{ColumnProfile, ColumnType, DatasetIndex, SemanticTag};

/// Distinct-count bound for a column to act as a chart category axis.
pub const CATEGORY_AXIS_LIMIT: usize = 20;

/// Chart-facing role of a column, derived from its profile and tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Time,
    Id,
    Measure,
    Category,
}

/// Columns grouped by role, in original column order within each group.
#[derive(Debug, Default)]
pub struct RoleMap<'a> {
    pub time: Vec<&'a ColumnProfile>,
    pub ids: Vec<&'a ColumnProfile>,
    pub measures: Vec<&'a ColumnProfile>,
    pub categories: Vec<&'a ColumnProfile>,
}

impl<'a> RoleMap<'a> {
    /// The preferred time column: a name containing "created" wins the
    /// tie-break, otherwise the first Date-typed column.
    pub fn preferred_time(&self) -> Option<&'a ColumnProfile> {
        self.time
            .iter()
            .find(|c| c.name.to_lowercase().contains("created"))
            .or_else(|| self.time.first())
            .copied()
    }
}

/// Classify one column. Roles are mutually exclusive; the first matching
/// rule wins.
pub fn detect_role(profile: &ColumnProfile) -> Option<ColumnRole> {
    if profile.inferred_type == ColumnType::Date {
        return Some(ColumnRole::Time);
    }
    if profile.has_tag(SemanticTag::Identifier) {
        return Some(ColumnRole::Id);
    }
    if profile.inferred_type == ColumnType::Number {
        if profile.has_tag(SemanticTag::Rate) {
            // Rates chart poorly as raw measures; they still work as a
            // scatter axis but are not promoted.
            return None;
        }
        return Some(ColumnRole::Measure);
    }
    if profile.inferred_type.is_categorical() {
        return Some(ColumnRole::Category);
    }
    if profile.inferred_type == ColumnType::String
        && profile.distinct_count <= CATEGORY_AXIS_LIMIT
        && profile.distinct_count >= 2
    {
        return Some(ColumnRole::Category);
    }
    None
}

/// Partition an index's columns by role.
pub fn detect_roles(index: &DatasetIndex) -> RoleMap<'_> {
    let mut map = RoleMap::default();
    for profile in &index.columns {
        match detect_role(profile) {
            Some(ColumnRole::Time) => map.time.push(profile),
            Some(ColumnRole::Id) => map.ids.push(profile),
            Some(ColumnRole::Measure) => map.measures.push(profile),
            Some(ColumnRole::Category) => map.categories.push(profile),
            None => {}
        }
    }
    map
}
