//! Weighted chart recommendation generation and ranking.
//!
//! Candidates are generated in a fixed order (line, bar, histogram,
//! scatter), scored by chart-type base plus data-quality bonuses, and
//! ranked by (score, impact score, generation order) descending with the
//! output capped at twelve entries. Pure function of the index.

use serde::{Deserialize, Serialize};

use crate::profile::{ColumnProfile, DatasetIndex, SemanticTag};

use super::roles::{detect_roles, RoleMap, CATEGORY_AXIS_LIMIT};

/// Maximum recommendations returned.
pub const MAX_RECOMMENDATIONS: usize = 12;

const MAX_LINE_MEASURES: usize = 2;
const MAX_BAR_CHARTS: usize = 6;
const MAX_BAR_MEASURES: usize = 2;
const MAX_HISTOGRAMS: usize = 2;
const MAX_SCATTER_PAIRS: usize = 2;
const MAX_SCATTER_MEASURES: usize = 3;

/// High-cardinality x axes above this distinct count are penalized.
const HIGH_CARDINALITY_X: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Line,
    Bar,
    Scatter,
    Histogram,
}

impl ChartType {
    /// Chart-type base score: Line > Bar > Scatter > Histogram.
    fn base_score(self) -> f64 {
        match self {
            ChartType::Line => 3.0,
            ChartType::Bar => 2.7,
            ChartType::Scatter => 2.4,
            ChartType::Histogram => 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Sum,
    Average,
    Count,
    None,
}

/// Axis roles, aggregation and binning for rendering a candidate chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySpec {
    pub x_axis: String,
    pub y_axis: Vec<String>,
    pub aggregation: Aggregation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_count: Option<usize>,
}

/// A ranked, parameterized chart specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartRecommendation {
    pub id: String,
    pub title: String,
    pub rationale: String,
    pub chart_type: ChartType,
    pub query: QuerySpec,
    pub score: f64,
    pub impact_score: f64,
    /// Ranking criteria trail, in application order.
    pub criteria: Vec<String>,
}

/// Generate ranked chart recommendations for an index.
pub fn generate_recommendations(index: &DatasetIndex) -> Vec<ChartRecommendation> {
    let roles = detect_roles(index);

    let mut candidates: Vec<ChartRecommendation> = Vec::new();
    generate_line_charts(&roles, &mut candidates);
    generate_bar_charts(&roles, &mut candidates);
    generate_histograms(index, &roles, &mut candidates);
    generate_scatter_plots(&roles, &mut candidates);

    // Stable sort preserves generation order for full ties.
    let mut ranked: Vec<(usize, ChartRecommendation)> =
        candidates.into_iter().enumerate().collect();
    ranked.sort_by(|(ia, a), (ib, b)| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.impact_score
                    .partial_cmp(&a.impact_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| ia.cmp(ib))
    });

    ranked
        .into_iter()
        .map(|(_, c)| c)
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

fn generate_line_charts(roles: &RoleMap, out: &mut Vec<ChartRecommendation>) {
    let Some(time) = roles.preferred_time() else {
        return;
    };
    if roles.measures.is_empty() {
        return;
    }

    let measures: Vec<&ColumnProfile> =
        roles.measures.iter().take(MAX_LINE_MEASURES).copied().collect();
    let names: Vec<String> = measures.iter().map(|m| m.name.clone()).collect();

    let scored = score_chart(ChartType::Line, time, &measures);
    out.push(ChartRecommendation {
        id: format!("line-{}", out.len() + 1),
        title: format!("{} over {}", join_names(&names), time.name),
        rationale: format!(
            "Time-series view of {} against the {} column; trends and seasonality read best on a line.",
            join_names(&names),
            time.name
        ),
        chart_type: ChartType::Line,
        query: QuerySpec {
            x_axis: time.name.clone(),
            y_axis: names,
            aggregation: Aggregation::Sum,
            bin_count: None,
        },
        score: scored.score,
        impact_score: scored.impact,
        criteria: scored.criteria,
    });
}

fn generate_bar_charts(roles: &RoleMap, out: &mut Vec<ChartRecommendation>) {
    let mut emitted = 0;
    for category in roles.categories.iter().copied() {
        if category.distinct_count > CATEGORY_AXIS_LIMIT || category.distinct_count < 2 {
            continue;
        }
        for measure in roles.measures.iter().copied().take(MAX_BAR_MEASURES) {
            if emitted >= MAX_BAR_CHARTS {
                return;
            }
            let aggregation = if measure.has_tag(SemanticTag::Amount) {
                Aggregation::Sum
            } else {
                Aggregation::Average
            };

            let scored = score_chart(ChartType::Bar, category, &[measure]);
            out.push(ChartRecommendation {
                id: format!("bar-{}", emitted + 1),
                title: format!("{} by {}", measure.name, category.name),
                rationale: format!(
                    "Compares {} across the {} groups of '{}'.",
                    measure.name, category.distinct_count, category.name
                ),
                chart_type: ChartType::Bar,
                query: QuerySpec {
                    x_axis: category.name.clone(),
                    y_axis: vec![measure.name.clone()],
                    aggregation,
                    bin_count: None,
                },
                score: scored.score,
                impact_score: scored.impact,
                criteria: scored.criteria,
            });
            emitted += 1;
        }
    }
}

fn generate_histograms(
    index: &DatasetIndex,
    roles: &RoleMap,
    out: &mut Vec<ChartRecommendation>,
) {
    for (i, measure) in roles.measures.iter().copied().take(MAX_HISTOGRAMS).enumerate() {
        let scored = score_chart(ChartType::Histogram, measure, &[measure]);
        out.push(ChartRecommendation {
            id: format!("histogram-{}", i + 1),
            title: format!("Distribution of {}", measure.name),
            rationale: format!(
                "Shows how '{}' values spread across their range.",
                measure.name
            ),
            chart_type: ChartType::Histogram,
            query: QuerySpec {
                x_axis: measure.name.clone(),
                y_axis: vec![measure.name.clone()],
                aggregation: Aggregation::Count,
                bin_count: Some(index.limits.histogram_bins),
            },
            score: scored.score,
            impact_score: scored.impact,
            criteria: scored.criteria,
        });
    }
}

fn generate_scatter_plots(roles: &RoleMap, out: &mut Vec<ChartRecommendation>) {
    if roles.measures.len() < 2 {
        return;
    }

    // Preference order: name contains "score", then "balance", then higher
    // distinct count; position breaks remaining ties.
    let mut preferred: Vec<&ColumnProfile> = roles.measures.clone();
    preferred.sort_by(|a, b| {
        scatter_rank(b)
            .partial_cmp(&scatter_rank(a))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.position.cmp(&b.position))
    });
    preferred.truncate(MAX_SCATTER_MEASURES);

    let mut pairs: Vec<(&ColumnProfile, &ColumnProfile)> = Vec::new();
    'outer: for i in 0..preferred.len() {
        for j in (i + 1)..preferred.len() {
            pairs.push((preferred[i], preferred[j]));
            if pairs.len() >= MAX_SCATTER_PAIRS {
                break 'outer;
            }
        }
    }

    for (i, (x, y)) in pairs.into_iter().enumerate() {
        let scored = score_chart(ChartType::Scatter, x, &[y]);
        out.push(ChartRecommendation {
            id: format!("scatter-{}", i + 1),
            title: format!("{} vs {}", y.name, x.name),
            rationale: format!(
                "Looks for a relationship between '{}' and '{}'.",
                x.name, y.name
            ),
            chart_type: ChartType::Scatter,
            query: QuerySpec {
                x_axis: x.name.clone(),
                y_axis: vec![y.name.clone()],
                aggregation: Aggregation::None,
                bin_count: None,
            },
            score: scored.score,
            impact_score: scored.impact,
            criteria: scored.criteria,
        });
    }
}

fn scatter_rank(p: &ColumnProfile) -> f64 {
    let name = p.name.to_lowercase();
    if name.contains("score") {
        2.0 + p.distinct_ratio()
    } else if name.contains("balance") {
        1.0 + p.distinct_ratio()
    } else {
        p.distinct_ratio()
    }
}

struct Scored {
    score: f64,
    impact: f64,
    criteria: Vec<String>,
}

/// Base score plus coverage, distinctness and x-axis adjustments; impact
/// weights completeness and distinctness more heavily and rewards grouped
/// (multi-series) views.
fn score_chart(chart_type: ChartType, x: &ColumnProfile, targets: &[&ColumnProfile]) -> Scored {
    let mut criteria = Vec::new();
    let base = chart_type.base_score();
    criteria.push(format!("base:{:?}={:.2}", chart_type, base));

    let coverage = if targets.is_empty() {
        0.0
    } else {
        targets.iter().map(|t| t.coverage()).sum::<f64>() / targets.len() as f64
    };
    let coverage_bonus = 0.5 * coverage;
    criteria.push(format!("coverage:+{coverage_bonus:.2}"));

    let distinctness = targets.first().map(|t| t.distinct_ratio()).unwrap_or(0.0);
    let distinct_bonus = 0.3 * distinctness;
    criteria.push(format!("distinctness:+{distinct_bonus:.2}"));

    let x_adjust = x_axis_adjustment(chart_type, x);
    if x_adjust != 0.0 {
        criteria.push(format!("x-axis:{x_adjust:+.2}"));
    }

    let score = base + coverage_bonus + distinct_bonus + x_adjust;

    let grouped = targets.len() >= 2;
    let mut impact = 0.45 * distinctness + 0.45 * coverage;
    if grouped {
        impact += 0.3;
        criteria.push("impact:grouped-series".to_string());
    }

    Scored {
        score,
        impact,
        criteria,
    }
}

fn x_axis_adjustment(chart_type: ChartType, x: &ColumnProfile) -> f64 {
    match chart_type {
        // Time axes are always favorable; histogram axes are binned down
        // to a bounded number of buckets regardless of raw cardinality.
        ChartType::Line | ChartType::Histogram => 0.4,
        ChartType::Bar => {
            if x.distinct_count <= CATEGORY_AXIS_LIMIT {
                0.4
            } else {
                0.0
            }
        }
        ChartType::Scatter => {
            if x.distinct_count > HIGH_CARDINALITY_X {
                -0.5
            } else if x.distinct_count <= CATEGORY_AXIS_LIMIT {
                0.4
            } else {
                0.0
            }
        }
    }
}

fn join_names(names: &[String]) -> String {
    names.join(" and ")
}
