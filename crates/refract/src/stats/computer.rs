//! Per-column statistics computation.

use indexmap::IndexMap;

use crate::infer::value::{parse_date, parse_number};
use crate::infer::TypeDecision;
use crate::input::DataTable;
use crate::profile::{
    ColumnProfile, ColumnType, DateGranularity, DateStats, HistogramBin, IndexBuildOptions,
    NumericStats, StringStats, TopValue,
};

use super::patterns::detect_pattern;
use super::streaming::StreamingStats;

/// Number of top values retained per column.
const TOP_VALUES: usize = 10;

/// Computes a full [`ColumnProfile`] for one column from the sampled table
/// and its type decision. Pure per-column work; columns are independent and
/// the orchestrator fans them out.
pub struct StatsComputer {
    options: IndexBuildOptions,
}

impl StatsComputer {
    pub fn new(options: IndexBuildOptions) -> Self {
        Self { options }
    }

    pub fn profile_column(
        &self,
        table: &DataTable,
        col_index: usize,
        decision: &TypeDecision,
    ) -> ColumnProfile {
        let name = table
            .headers
            .get(col_index)
            .cloned()
            .unwrap_or_else(|| format!("column_{}", col_index + 1));

        let values: Vec<&str> = table.column_values(col_index).collect();
        let non_null: Vec<&str> = values
            .iter()
            .copied()
            .filter(|v| !DataTable::is_null_value(v))
            .collect();

        let mut profile = ColumnProfile::new(name, col_index);
        profile.inferred_type = decision.inferred_type;
        profile.sampled_values = decision.sampled_values;
        profile.null_rate = decision.null_rate();
        profile.distinct_count = decision.distinct_count;
        profile.top_values = self.top_values(&non_null);

        match decision.inferred_type {
            ColumnType::Number => {
                profile.numeric = self.numeric_stats(&non_null);
            }
            ColumnType::Date => {
                profile.date = self.date_stats(&non_null);
            }
            ColumnType::String | ColumnType::Category => {
                profile.string = self.string_stats(&non_null);
            }
            ColumnType::Boolean => {}
        }

        profile
    }

    /// Most frequent sampled values; ties broken by first-seen order. The
    /// IndexMap preserves insertion order and the sort is stable, so the
    /// tie-break costs nothing extra.
    fn top_values(&self, non_null: &[&str]) -> Vec<TopValue> {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for v in non_null {
            *counts.entry(v.trim()).or_insert(0) += 1;
        }

        let mut entries: Vec<(&str, usize)> = counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));

        entries
            .into_iter()
            .take(TOP_VALUES)
            .map(|(value, count)| TopValue {
                value: value.to_string(),
                count,
            })
            .collect()
    }

    fn numeric_stats(&self, non_null: &[&str]) -> Option<NumericStats> {
        let parsed: Vec<f64> = non_null.iter().filter_map(|v| parse_number(v)).collect();
        if parsed.is_empty() {
            return None;
        }

        let mut stats = StreamingStats::new();
        for &v in &parsed {
            stats.add(v);
        }

        let histogram = if self.options.include_distributions {
            Some(self.histogram(&parsed, stats.min(), stats.max()))
        } else {
            None
        };

        Some(NumericStats {
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
            p25: stats.percentile(25.0),
            p50: stats.percentile(50.0),
            p75: stats.percentile(75.0),
            p95: stats.percentile(95.0),
            histogram,
            sample_size: parsed.len(),
        })
    }

    /// Equal-width bins over [min, max]. Bin count comes from the options,
    /// clamped into the documented range.
    fn histogram(&self, values: &[f64], min: f64, max: f64) -> Vec<HistogramBin> {
        let bins = self.options.clamped_histogram_bins();

        if min == max {
            return vec![HistogramBin {
                lower: min,
                upper: max,
                count: values.len(),
            }];
        }

        let width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let mut idx = ((v - min) / width) as usize;
            if idx >= bins {
                idx = bins - 1;
            }
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: min + i as f64 * width,
                upper: if i + 1 == bins {
                    max
                } else {
                    min + (i + 1) as f64 * width
                },
                count,
            })
            .collect()
    }

    fn date_stats(&self, non_null: &[&str]) -> Option<DateStats> {
        let parsed: Vec<chrono::NaiveDate> =
            non_null.iter().filter_map(|v| parse_date(v)).collect();
        if parsed.is_empty() {
            return None;
        }

        let min = parsed.iter().min().copied()?;
        let max = parsed.iter().max().copied()?;

        let mut distinct: std::collections::HashSet<chrono::NaiveDate> =
            std::collections::HashSet::new();
        distinct.extend(parsed.iter().copied());

        Some(DateStats {
            min: min.format("%Y-%m-%d").to_string(),
            max: max.format("%Y-%m-%d").to_string(),
            granularity: detect_granularity(&parsed),
            distinct_count: distinct.len(),
        })
    }

    fn string_stats(&self, non_null: &[&str]) -> Option<StringStats> {
        if non_null.is_empty() {
            return None;
        }

        let lengths: Vec<usize> = non_null.iter().map(|v| v.chars().count()).collect();
        let max_length = lengths.iter().max().copied().unwrap_or(0);
        let avg_length = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;

        let detected_pattern = if self.options.include_string_patterns {
            detect_pattern(non_null)
        } else {
            None
        };

        Some(StringStats {
            avg_length,
            max_length,
            detected_pattern,
            sample_size: non_null.len(),
        })
    }
}

use chrono::Datelike;

/// Day unless every date falls on the first of a month; Year when they all
/// fall on January 1st.
fn detect_granularity(dates: &[chrono::NaiveDate]) -> DateGranularity {
    let all_first_of_month = dates.iter().all(|d| d.day() == 1);
    if !all_first_of_month {
        return DateGranularity::Day;
    }
    if dates.iter().all(|d| d.month() == 1) {
        DateGranularity::Year
    } else {
        DateGranularity::Month
    }
}
