//! Pairwise association computation over profiled columns.

use std::collections::HashMap;

use tracing::debug;

use crate::infer::value::parse_number;
use crate::input::DataTable;
use crate::profile::{
    AssociationMethod, ColumnProfile, ColumnType, Confidence, CorrelationEdge, Direction,
    SemanticTag, Strength,
};

use super::methods::{
    bin_numeric, cramers_v, eta_squared, normalized_mutual_information, pearson, spearman,
};

/// Bin count used when the mutual-information fallback discretizes a
/// numeric column.
const MI_BINS: usize = 10;

/// Configuration for the association engine, derived from build options.
#[derive(Debug, Clone)]
pub struct AssociationConfig {
    /// Informativeness-ranked column subset cap.
    pub max_columns: usize,
    /// Edges retained per column.
    pub top_k_per_column: usize,
}

/// Computes typed pairwise relationships between columns.
pub struct AssociationEngine {
    config: AssociationConfig,
}

impl AssociationEngine {
    pub fn new(config: AssociationConfig) -> Self {
        Self { config }
    }

    /// Compute the retained edge set. Consumes completed column profiles
    /// plus the sample (paired values come from the same single draw).
    pub fn compute(&self, table: &DataTable, profiles: &[ColumnProfile]) -> Vec<CorrelationEdge> {
        let selected = self.select_columns(profiles);
        if selected.len() < 2 {
            return Vec::new();
        }

        let mut edges: Vec<CorrelationEdge> = Vec::new();
        for i in 0..selected.len() {
            for j in (i + 1)..selected.len() {
                // Canonical orientation: lower table position first, so the
                // symmetric pair always materializes as one edge.
                let (a, b) = if selected[i].position <= selected[j].position {
                    (selected[i], selected[j])
                } else {
                    (selected[j], selected[i])
                };
                if let Some(edge) = self.compute_pair(table, a, b) {
                    edges.push(edge);
                }
            }
        }

        let retained = self.retain_top_k(edges);
        debug!(edges = retained.len(), "association computation complete");
        retained
    }

    /// Informativeness ranking: prefer well-covered columns that vary but
    /// are not near-unique; identifier-tagged columns are excluded.
    fn select_columns<'a>(&self, profiles: &'a [ColumnProfile]) -> Vec<&'a ColumnProfile> {
        let mut eligible: Vec<(&ColumnProfile, f64)> = profiles
            .iter()
            .filter(|p| {
                !p.has_tag(SemanticTag::Identifier)
                    && p.distinct_count >= 2
                    && p.null_rate < 1.0
            })
            .map(|p| (p, informativeness(p)))
            .collect();

        eligible.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.position.cmp(&b.0.position))
        });

        eligible
            .into_iter()
            .take(self.config.max_columns)
            .map(|(p, _)| p)
            .collect()
    }

    fn compute_pair(
        &self,
        table: &DataTable,
        a: &ColumnProfile,
        b: &ColumnProfile,
    ) -> Option<CorrelationEdge> {
        let (a_vals, b_vals) = paired_values(table, a.position, b.position);
        if a_vals.len() < 2 {
            return None;
        }

        use ColumnType::*;
        let (method, coefficient, sample) = match (a.inferred_type, b.inferred_type) {
            (Number, Number) => numeric_pair(&a_vals, &b_vals)?,
            (Number, Category) | (Number, Boolean) => {
                numeric_categorical_pair(&a_vals, &b_vals)?
            }
            (Category, Number) | (Boolean, Number) => {
                numeric_categorical_pair(&b_vals, &a_vals)?
            }
            (Category, Category)
            | (Category, Boolean)
            | (Boolean, Category)
            | (Boolean, Boolean) => {
                let v = cramers_v(&a_vals, &b_vals);
                (AssociationMethod::CramersV, v, a_vals.len())
            }
            // Mixed, temporal or free-form pairs: discretize and fall back
            // to mutual information.
            _ => mutual_information_pair(&a_vals, &b_vals, a.inferred_type, b.inferred_type)?,
        };

        if !coefficient.is_finite() {
            return None;
        }

        let strength = Strength::from_coefficient(coefficient);
        let direction = if method.is_signed() {
            if coefficient > 0.0 {
                Direction::Positive
            } else if coefficient < 0.0 {
                Direction::Negative
            } else {
                Direction::None
            }
        } else {
            Direction::None
        };

        Some(CorrelationEdge {
            column_a: a.name.clone(),
            column_b: b.name.clone(),
            method,
            coefficient,
            strength,
            direction,
            confidence: Confidence::from_sample(sample, strength),
        })
    }

    /// Greedy retention: strongest edges first, each endpoint keeps at most
    /// `top_k_per_column` edges. Symmetric pairs were already deduplicated
    /// by canonical orientation.
    fn retain_top_k(&self, mut edges: Vec<CorrelationEdge>) -> Vec<CorrelationEdge> {
        edges.sort_by(|x, y| {
            y.coefficient
                .abs()
                .partial_cmp(&x.coefficient.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| x.column_a.cmp(&y.column_a))
                .then_with(|| x.column_b.cmp(&y.column_b))
        });

        let k = self.config.top_k_per_column;
        let mut per_column: HashMap<&str, usize> = HashMap::new();
        let mut retained = Vec::new();

        for edge in &edges {
            let ca = per_column.get(edge.column_a.as_str()).copied().unwrap_or(0);
            let cb = per_column.get(edge.column_b.as_str()).copied().unwrap_or(0);
            if ca < k && cb < k {
                *per_column.entry(edge.column_a.as_str()).or_insert(0) += 1;
                *per_column.entry(edge.column_b.as_str()).or_insert(0) += 1;
                retained.push(edge.clone());
            }
        }

        retained
    }
}

fn informativeness(p: &ColumnProfile) -> f64 {
    p.coverage() * (1.0 - 0.5 * p.distinct_ratio())
}

/// Rows where both columns are non-null, as raw strings.
fn paired_values<'a>(
    table: &'a DataTable,
    pos_a: usize,
    pos_b: usize,
) -> (Vec<&'a str>, Vec<&'a str>) {
    let mut a_vals = Vec::new();
    let mut b_vals = Vec::new();
    for row in &table.rows {
        let a = row.get(pos_a).map(|s| s.as_str()).unwrap_or("");
        let b = row.get(pos_b).map(|s| s.as_str()).unwrap_or("");
        if DataTable::is_null_value(a) || DataTable::is_null_value(b) {
            continue;
        }
        a_vals.push(a.trim());
        b_vals.push(b.trim());
    }
    (a_vals, b_vals)
}

/// Pearson with Spearman as a secondary signal: a monotone non-linear
/// relationship the linear coefficient misses is reported as Spearman.
fn numeric_pair(
    a_vals: &[&str],
    b_vals: &[&str],
) -> Option<(AssociationMethod, f64, usize)> {
    let mut xs = Vec::with_capacity(a_vals.len());
    let mut ys = Vec::with_capacity(b_vals.len());
    for i in 0..a_vals.len() {
        if let (Some(x), Some(y)) = (parse_number(a_vals[i]), parse_number(b_vals[i])) {
            xs.push(x);
            ys.push(y);
        }
    }
    if xs.len() < 2 {
        return None;
    }

    let p = pearson(&xs, &ys);
    let s = spearman(&xs, &ys);
    if p.abs() < 0.2 && s.abs() >= 0.5 {
        Some((AssociationMethod::Spearman, s, xs.len()))
    } else {
        Some((AssociationMethod::Pearson, p, xs.len()))
    }
}

fn numeric_categorical_pair(
    numeric_vals: &[&str],
    category_vals: &[&str],
) -> Option<(AssociationMethod, f64, usize)> {
    let mut values = Vec::with_capacity(numeric_vals.len());
    let mut cats = Vec::with_capacity(category_vals.len());
    for i in 0..numeric_vals.len() {
        if let Some(v) = parse_number(numeric_vals[i]) {
            values.push(v);
            cats.push(category_vals[i]);
        }
    }
    if values.len() < 2 {
        return None;
    }

    let eta = eta_squared(&cats, &values);
    Some((AssociationMethod::EtaSquared, eta, values.len()))
}

fn mutual_information_pair(
    a_vals: &[&str],
    b_vals: &[&str],
    type_a: ColumnType,
    type_b: ColumnType,
) -> Option<(AssociationMethod, f64, usize)> {
    let a_labels = discretize(a_vals, type_a);
    let b_labels = discretize(b_vals, type_b);

    let a_refs: Vec<&str> = a_labels.iter().map(|s| s.as_str()).collect();
    let b_refs: Vec<&str> = b_labels.iter().map(|s| s.as_str()).collect();

    let nmi = normalized_mutual_information(&a_refs, &b_refs);
    Some((AssociationMethod::MutualInformation, nmi, a_refs.len()))
}

fn discretize(vals: &[&str], column_type: ColumnType) -> Vec<String> {
    if column_type == ColumnType::Number {
        let parsed: Vec<f64> = vals.iter().map(|v| parse_number(v).unwrap_or(0.0)).collect();
        bin_numeric(&parsed, MI_BINS)
    } else {
        vals.iter().map(|v| v.to_string()).collect()
    }
}
