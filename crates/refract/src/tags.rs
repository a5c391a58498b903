//! Heuristic semantic tagging.
//!
//! Column tags come from a declarative rule table evaluated uniformly per
//! column: each rule is a predicate over the normalized column name, the
//! inferred type and the cardinality/length statistics. Precedence is
//! type-first, so a Date column is tagged `timestamp` no matter what it is
//! called. The computation is pure and order-independent; all result lists
//! are sorted for determinism.

use std::collections::BTreeMap;

use crate::profile::{ColumnProfile, ColumnTag, ColumnType, DatasetTag, SemanticTag};

/// Context handed to each rule predicate.
pub struct RuleContext<'a> {
    /// Lowercased column name.
    pub name: &'a str,
    pub profile: &'a ColumnProfile,
}

impl RuleContext<'_> {
    fn column_type(&self) -> ColumnType {
        self.profile.inferred_type
    }

    /// Whether the name carries an identifier-like token. Token-aware so
    /// that "valid" does not match "id".
    fn has_id_token(&self) -> bool {
        name_tokens(self.name)
            .iter()
            .any(|t| matches!(t.as_str(), "id" | "uuid" | "guid" | "key" | "identifier"))
    }

    fn name_contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.name.contains(n))
    }

    fn near_unique(&self) -> bool {
        self.profile.distinct_ratio() >= 0.98 && self.profile.null_rate <= 0.01
    }
}

/// One declarative tagging rule.
struct TagRule {
    tag: SemanticTag,
    source: &'static str,
    score: f64,
    applies: fn(&RuleContext) -> bool,
}

fn is_timestamp(ctx: &RuleContext) -> bool {
    ctx.column_type() == ColumnType::Date
}

fn is_category(ctx: &RuleContext) -> bool {
    matches!(
        ctx.column_type(),
        ColumnType::Category | ColumnType::Boolean
    )
}

fn is_identifier(ctx: &RuleContext) -> bool {
    if ctx.has_id_token() {
        return true;
    }
    // An embedded "id" only counts when the values are mostly distinct;
    // this keeps names like "valid" from matching on substring alone.
    if ctx.name.contains("id") && ctx.profile.distinct_ratio() >= 0.9 {
        return true;
    }
    // Near-unique textual columns identify rows even without a telling name.
    matches!(ctx.column_type(), ColumnType::String | ColumnType::Category) && ctx.near_unique()
}

fn is_amount(ctx: &RuleContext) -> bool {
    ctx.column_type() == ColumnType::Number
        && ctx.name_contains_any(&[
            "amount", "price", "total", "revenue", "cost", "balance", "salary", "fee",
        ])
}

fn is_rate(ctx: &RuleContext) -> bool {
    if ctx.column_type() != ColumnType::Number {
        return false;
    }
    if ctx.name_contains_any(&["rate", "ratio", "pct", "percent", "share"]) {
        return true;
    }
    // Values confined to the unit interval read as a rate.
    ctx.profile
        .numeric
        .as_ref()
        .is_some_and(|s| s.min >= 0.0 && s.max <= 1.0 && s.min < s.max)
}

fn is_measure(ctx: &RuleContext) -> bool {
    ctx.column_type() == ColumnType::Number && !is_identifier(ctx) && !is_rate(ctx)
}

fn is_free_text(ctx: &RuleContext) -> bool {
    if ctx.column_type() != ColumnType::String || is_identifier(ctx) {
        return false;
    }
    ctx.profile
        .string
        .as_ref()
        .is_some_and(|s| s.avg_length > 25.0)
}

/// The rule table. Evaluated in full for every column; a column collects
/// every tag whose predicate holds.
const RULES: &[TagRule] = &[
    TagRule {
        tag: SemanticTag::Timestamp,
        source: "type",
        score: 1.0,
        applies: is_timestamp,
    },
    TagRule {
        tag: SemanticTag::Category,
        source: "type",
        score: 0.9,
        applies: is_category,
    },
    TagRule {
        tag: SemanticTag::Identifier,
        source: "name",
        score: 0.9,
        applies: is_identifier,
    },
    TagRule {
        tag: SemanticTag::Amount,
        source: "name",
        score: 0.8,
        applies: is_amount,
    },
    TagRule {
        tag: SemanticTag::Rate,
        source: "name",
        score: 0.8,
        applies: is_rate,
    },
    TagRule {
        tag: SemanticTag::Measure,
        source: "type",
        score: 0.7,
        applies: is_measure,
    },
    TagRule {
        tag: SemanticTag::FreeText,
        source: "cardinality",
        score: 0.6,
        applies: is_free_text,
    },
];

/// Domain-hint rule: required column tags -> dataset tag at a fixed score.
struct DomainHint {
    requires: &'static [SemanticTag],
    name: &'static str,
    score: f64,
}

const DOMAIN_HINTS: &[DomainHint] = &[
    DomainHint {
        requires: &[SemanticTag::Timestamp, SemanticTag::Amount],
        name: "financial-trends",
        score: 0.9,
    },
    DomainHint {
        requires: &[SemanticTag::Timestamp, SemanticTag::Measure],
        name: "time-series",
        score: 0.8,
    },
    DomainHint {
        requires: &[
            SemanticTag::Identifier,
            SemanticTag::Category,
            SemanticTag::Measure,
        ],
        name: "entity-metrics",
        score: 0.7,
    },
];

/// Assigns heuristic role tags per column and aggregates dataset tags.
pub struct SemanticTagger;

impl SemanticTagger {
    pub fn new() -> Self {
        Self
    }

    /// Tags for one column, alphabetically sorted.
    pub fn tag_column(&self, profile: &ColumnProfile) -> Vec<ColumnTag> {
        let name = profile.name.to_lowercase();
        let ctx = RuleContext {
            name: &name,
            profile,
        };

        let mut tags: Vec<ColumnTag> = RULES
            .iter()
            .filter(|rule| (rule.applies)(&ctx))
            .map(|rule| ColumnTag {
                tag: rule.tag,
                source: rule.source.to_string(),
                score: rule.score,
            })
            .collect();

        tags.sort_by(|a, b| a.tag.as_str().cmp(b.tag.as_str()));
        tags
    }

    /// Dataset-level tags: tag-frequency ratios across columns plus fixed
    /// domain hints. Sorted by score descending, name ascending.
    pub fn tag_dataset(&self, profiles: &[ColumnProfile]) -> Vec<DatasetTag> {
        if profiles.is_empty() {
            return Vec::new();
        }

        let total = profiles.len() as f64;
        let mut frequency: BTreeMap<&'static str, usize> = BTreeMap::new();
        for profile in profiles {
            for tag in &profile.tags {
                *frequency.entry(tag.tag.as_str()).or_insert(0) += 1;
            }
        }

        let mut tags: Vec<DatasetTag> = frequency
            .iter()
            .map(|(name, count)| DatasetTag {
                name: name.to_string(),
                source: "tag-frequency".to_string(),
                score: *count as f64 / total,
            })
            .collect();

        for hint in DOMAIN_HINTS {
            let satisfied = hint
                .requires
                .iter()
                .all(|&t| profiles.iter().any(|p| p.has_tag(t)));
            if satisfied {
                tags.push(DatasetTag {
                    name: hint.name.to_string(),
                    source: "domain-hint".to_string(),
                    score: hint.score,
                });
            }
        }

        tags.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        tags
    }
}

impl Default for SemanticTagger {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a normalized (lowercased) name into tokens on separator
/// characters.
fn name_tokens(name: &str) -> Vec<String> {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{NumericStats, StringStats};

    fn profile(name: &str, column_type: ColumnType) -> ColumnProfile {
        let mut p = ColumnProfile::new(name, 0);
        p.inferred_type = column_type;
        p.sampled_values = 100;
        p.distinct_count = 10;
        p
    }

    fn tag_names(tags: &[ColumnTag]) -> Vec<SemanticTag> {
        tags.iter().map(|t| t.tag).collect()
    }

    #[test]
    fn test_date_column_always_timestamp() {
        let tagger = SemanticTagger::new();
        // Name suggests an amount; type wins.
        let p = profile("total_amount", ColumnType::Date);
        let tags = tagger.tag_column(&p);
        assert_eq!(tag_names(&tags), vec![SemanticTag::Timestamp]);
    }

    #[test]
    fn test_amount_and_measure_for_revenue() {
        let tagger = SemanticTagger::new();
        let p = profile("revenue", ColumnType::Number);
        let tags = tag_names(&tagger.tag_column(&p));
        assert!(tags.contains(&SemanticTag::Amount));
        assert!(tags.contains(&SemanticTag::Measure));
    }

    #[test]
    fn test_rate_from_unit_interval_values() {
        let tagger = SemanticTagger::new();
        let mut p = profile("conversion", ColumnType::Number);
        p.numeric = Some(NumericStats {
            min: 0.0,
            max: 0.97,
            mean: 0.4,
            std_dev: 0.2,
            p25: 0.2,
            p50: 0.4,
            p75: 0.6,
            p95: 0.9,
            histogram: None,
            sample_size: 100,
        });
        let tags = tag_names(&tagger.tag_column(&p));
        assert!(tags.contains(&SemanticTag::Rate));
        assert!(!tags.contains(&SemanticTag::Measure));
    }

    #[test]
    fn test_identifier_from_name_token() {
        let tagger = SemanticTagger::new();
        let mut p = profile("user_id", ColumnType::String);
        p.distinct_count = 98;
        p.sampled_values = 100;
        let tags = tag_names(&tagger.tag_column(&p));
        assert!(tags.contains(&SemanticTag::Identifier));
    }

    #[test]
    fn test_valid_does_not_match_id_token() {
        let tagger = SemanticTagger::new();
        let p = profile("valid", ColumnType::Category);
        let tags = tag_names(&tagger.tag_column(&p));
        assert!(!tags.contains(&SemanticTag::Identifier));
        assert!(tags.contains(&SemanticTag::Category));
    }

    #[test]
    fn test_near_unique_string_is_identifier() {
        let tagger = SemanticTagger::new();
        let mut p = profile("fingerprint", ColumnType::String);
        p.distinct_count = 99;
        p.sampled_values = 100;
        p.null_rate = 0.0;
        let tags = tag_names(&tagger.tag_column(&p));
        assert!(tags.contains(&SemanticTag::Identifier));
    }

    #[test]
    fn test_free_text_from_length() {
        let tagger = SemanticTagger::new();
        let mut p = profile("description", ColumnType::String);
        p.string = Some(StringStats {
            avg_length: 80.0,
            max_length: 400,
            detected_pattern: None,
            sample_size: 100,
        });
        let tags = tag_names(&tagger.tag_column(&p));
        assert!(tags.contains(&SemanticTag::FreeText));
    }

    #[test]
    fn test_tags_alphabetically_sorted() {
        let tagger = SemanticTagger::new();
        let p = profile("revenue", ColumnType::Number);
        let tags = tagger.tag_column(&p);
        let names: Vec<&str> = tags.iter().map(|t| t.tag.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_dataset_financial_trends_hint() {
        let tagger = SemanticTagger::new();
        let mut date_col = profile("created_at", ColumnType::Date);
        date_col.tags = tagger.tag_column(&date_col);
        let mut amount_col = profile("amount", ColumnType::Number);
        amount_col.tags = tagger.tag_column(&amount_col);

        let dataset_tags = tagger.tag_dataset(&[date_col, amount_col]);
        assert!(dataset_tags
            .iter()
            .any(|t| t.name == "financial-trends" && t.source == "domain-hint"));
        // Sorted by score descending.
        for w in dataset_tags.windows(2) {
            assert!(w[0].score >= w[1].score);
        }
    }

    #[test]
    fn test_dataset_tags_empty_for_no_columns() {
        assert!(SemanticTagger::new().tag_dataset(&[]).is_empty());
    }

    #[test]
    fn test_tag_frequency_ratio() {
        let tagger = SemanticTagger::new();
        let mut a = profile("x", ColumnType::Number);
        a.tags = tagger.tag_column(&a);
        let mut b = profile("y", ColumnType::Number);
        b.tags = tagger.tag_column(&b);
        let mut c = profile("label", ColumnType::Category);
        c.tags = tagger.tag_column(&c);

        let tags = tagger.tag_dataset(&[a, b, c]);
        let measure = tags
            .iter()
            .find(|t| t.name == "measure" && t.source == "tag-frequency")
            .unwrap();
        assert!((measure.score - 2.0 / 3.0).abs() < 1e-9);
    }
}
