//! Candidate key detection over the sampled table.

use std::collections::HashSet;

use tracing::debug;

use crate::input::DataTable;
use crate::profile::{ColumnProfile, KeyCandidate};

/// Configuration for key detection.
#[derive(Debug, Clone)]
pub struct KeyDetectorConfig {
    /// Minimum distinct-to-sampled ratio for acceptance.
    pub uniqueness_threshold: f64,
    /// Maximum null rate for a column to participate.
    pub null_epsilon: f64,
    /// Maximum number of columns in a composite candidate.
    pub max_arity: usize,
    pub max_single_candidates: usize,
    pub max_composite_candidates: usize,
    /// Columns considered for composite search, taken from the
    /// highest-cardinality non-unique columns.
    pub max_composite_pool: usize,
}

impl Default for KeyDetectorConfig {
    fn default() -> Self {
        Self {
            uniqueness_threshold: 0.98,
            null_epsilon: 0.01,
            max_arity: 3,
            max_single_candidates: 5,
            max_composite_candidates: 3,
            max_composite_pool: 8,
        }
    }
}

/// Finds single- and multi-column uniqueness candidates.
pub struct KeyDetector {
    config: KeyDetectorConfig,
}

impl KeyDetector {
    pub fn new() -> Self {
        Self {
            config: KeyDetectorConfig::default(),
        }
    }

    pub fn with_config(config: KeyDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect key candidates. Consumes the completed column profiles plus
    /// the sample itself (composite uniqueness needs the actual tuples).
    pub fn detect(&self, table: &DataTable, profiles: &[ColumnProfile]) -> Vec<KeyCandidate> {
        if table.row_count() == 0 {
            return Vec::new();
        }

        let mut singles = self.single_candidates(profiles);
        let composites = self.composite_candidates(table, profiles);

        debug!(
            singles = singles.len(),
            composites = composites.len(),
            "key detection complete"
        );

        singles.extend(composites);
        singles
    }

    fn single_candidates(&self, profiles: &[ColumnProfile]) -> Vec<KeyCandidate> {
        let mut candidates: Vec<KeyCandidate> = profiles
            .iter()
            .filter(|p| {
                p.null_rate <= self.config.null_epsilon
                    && p.distinct_ratio() >= self.config.uniqueness_threshold
            })
            .map(|p| KeyCandidate::single(p.name.clone(), p.distinct_ratio()))
            .collect();

        sort_candidates(&mut candidates);
        candidates.truncate(self.config.max_single_candidates);
        candidates
    }

    fn composite_candidates(
        &self,
        table: &DataTable,
        profiles: &[ColumnProfile],
    ) -> Vec<KeyCandidate> {
        let rows = table.row_count();

        // Lower-cardinality columns only: columns that are already unique on
        // their own are single candidates, and near-constant columns cannot
        // contribute enough entropy.
        let mut pool: Vec<&ColumnProfile> = profiles
            .iter()
            .filter(|p| {
                p.null_rate <= self.config.null_epsilon
                    && p.distinct_ratio() < self.config.uniqueness_threshold
                    && p.distinct_count > 1
            })
            .collect();
        pool.sort_by(|a, b| {
            b.distinct_count
                .cmp(&a.distinct_count)
                .then(a.position.cmp(&b.position))
        });
        pool.truncate(self.config.max_composite_pool);

        let mut accepted: Vec<KeyCandidate> = Vec::new();
        let mut covered_pairs: HashSet<(usize, usize)> = HashSet::new();

        // Arity 2 first: the search favors fewer columns.
        for i in 0..pool.len() {
            for j in (i + 1)..pool.len() {
                let cols = [pool[i], pool[j]];
                let ratio = tuple_uniqueness(table, &cols, rows);
                if ratio >= self.config.uniqueness_threshold {
                    covered_pairs.insert((cols[0].position, cols[1].position));
                    accepted.push(KeyCandidate::composite(
                        cols.iter().map(|c| c.name.clone()).collect(),
                        ratio,
                    ));
                }
            }
        }

        if self.config.max_arity >= 3 {
            for i in 0..pool.len() {
                for j in (i + 1)..pool.len() {
                    for k in (j + 1)..pool.len() {
                        let cols = [pool[i], pool[j], pool[k]];
                        // Skip triples that extend an already-accepted pair.
                        if contains_covered_pair(&cols, &covered_pairs) {
                            continue;
                        }
                        let ratio = tuple_uniqueness(table, &cols, rows);
                        if ratio >= self.config.uniqueness_threshold {
                            accepted.push(KeyCandidate::composite(
                                cols.iter().map(|c| c.name.clone()).collect(),
                                ratio,
                            ));
                        }
                    }
                }
            }
        }

        sort_candidates(&mut accepted);
        accepted.truncate(self.config.max_composite_candidates);
        accepted
    }
}

impl Default for KeyDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Distinct-tuple ratio over sampled rows for the given columns.
fn tuple_uniqueness(table: &DataTable, cols: &[&ColumnProfile], rows: usize) -> f64 {
    let mut seen: HashSet<String> = HashSet::with_capacity(rows);
    for row in &table.rows {
        let mut key = String::new();
        for col in cols {
            key.push_str(row.get(col.position).map(|s| s.as_str()).unwrap_or(""));
            key.push('\u{1f}');
        }
        seen.insert(key);
    }
    seen.len() as f64 / rows as f64
}

fn contains_covered_pair(cols: &[&ColumnProfile; 3], covered: &HashSet<(usize, usize)>) -> bool {
    let p = [cols[0].position, cols[1].position, cols[2].position];
    covered.contains(&(p[0], p[1]))
        || covered.contains(&(p[0], p[2]))
        || covered.contains(&(p[1], p[2]))
}

/// Uniqueness descending, then fewer columns, then name for determinism.
fn sort_candidates(candidates: &mut [KeyCandidate]) {
    candidates.sort_by(|a, b| {
        b.uniqueness
            .partial_cmp(&a.uniqueness)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.columns.len().cmp(&b.columns.len()))
            .then(a.columns.cmp(&b.columns))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::TypeSampler;
    use crate::profile::IndexBuildOptions;
    use crate::stats::StatsComputer;

    fn make_table(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> DataTable {
        DataTable::new(
            headers.into_iter().map(String::from).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
            b',',
        )
    }

    fn profiles_for(table: &DataTable) -> Vec<ColumnProfile> {
        let sampler = TypeSampler::new();
        let computer = StatsComputer::new(IndexBuildOptions::default());
        (0..table.column_count())
            .map(|i| {
                let decision = sampler.classify_column(table, i);
                computer.profile_column(table, i, &decision)
            })
            .collect()
    }

    #[test]
    fn test_unique_column_is_single_candidate() {
        let table = make_table(
            vec!["id", "group"],
            vec![
                vec!["a1", "x"],
                vec!["a2", "x"],
                vec!["a3", "y"],
                vec!["a4", "y"],
            ],
        );
        let profiles = profiles_for(&table);
        let candidates = KeyDetector::new().detect(&table, &profiles);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].columns, vec!["id".to_string()]);
        assert!(!candidates[0].composite);
        assert!(candidates[0].uniqueness >= 0.98);
    }

    #[test]
    fn test_nullable_column_excluded() {
        let table = make_table(
            vec!["id"],
            vec![vec!["a"], vec!["b"], vec![""], vec!["c"]],
        );
        let profiles = profiles_for(&table);
        let candidates = KeyDetector::new().detect(&table, &profiles);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_composite_pair_detected() {
        // Neither column is unique alone; together they are.
        let table = make_table(
            vec!["region", "seq"],
            vec![
                vec!["north", "1"],
                vec!["north", "2"],
                vec!["north", "3"],
                vec!["south", "1"],
                vec!["south", "2"],
                vec!["south", "3"],
            ],
        );
        let profiles = profiles_for(&table);
        let candidates = KeyDetector::new().detect(&table, &profiles);

        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].composite);
        assert_eq!(candidates[0].uniqueness, 1.0);
        let mut cols = candidates[0].columns.clone();
        cols.sort();
        assert_eq!(cols, vec!["region".to_string(), "seq".to_string()]);
    }

    #[test]
    fn test_ordering_uniqueness_then_arity() {
        let a = KeyCandidate::single("a", 0.99);
        let b = KeyCandidate::composite(vec!["b".into(), "c".into()], 0.99);
        let c = KeyCandidate::single("d", 1.0);
        let mut v = vec![a.clone(), b.clone(), c.clone()];
        sort_candidates(&mut v);
        assert_eq!(v[0].columns, vec!["d".to_string()]);
        assert_eq!(v[1].columns, vec!["a".to_string()]);
        assert_eq!(v[2].columns.len(), 2);
    }

    #[test]
    fn test_empty_table_no_candidates() {
        let table = DataTable::empty();
        let candidates = KeyDetector::new().detect(&table, &[]);
        assert!(candidates.is_empty());
    }
}
