//! Pure association coefficient computations.
//!
//! Every function here is deterministic and total over its inputs:
//! degenerate cases (constant columns, empty overlap) return 0.0 rather
//! than NaN so callers never propagate non-finite coefficients.

use std::collections::HashMap;

/// Pearson linear correlation in sum form (single pass over the pairs).
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_x2 = 0.0;
    let mut sum_y2 = 0.0;
    let mut sum_xy = 0.0;

    for i in 0..n {
        let (x, y) = (xs[i], ys[i]);
        sum_x += x;
        sum_y += y;
        sum_x2 += x * x;
        sum_y2 += y * y;
        sum_xy += x * y;
    }

    let nf = n as f64;
    let numerator = nf * sum_xy - sum_x * sum_y;
    let denominator =
        ((nf * sum_x2 - sum_x * sum_x) * (nf * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 {
        0.0
    } else {
        (numerator / denominator).clamp(-1.0, 1.0)
    }
}

/// Spearman rank correlation: Pearson over average ranks.
pub fn spearman(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let rx = compute_ranks(&xs[..n]);
    let ry = compute_ranks(&ys[..n]);
    pearson(&rx, &ry)
}

/// Average ranks with ties sharing their mean rank.
pub fn compute_ranks(values: &[f64]) -> Vec<f64> {
    let mut indexed: Vec<(usize, f64)> =
        values.iter().enumerate().map(|(i, &v)| (i, v)).collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < indexed.len() {
        let mut j = i;
        while j < indexed.len() && indexed[j].1 == indexed[i].1 {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 0.5;
        for k in i..j {
            ranks[indexed[k].0] = avg_rank;
        }
        i = j;
    }
    ranks
}

/// Cramér's V over two categorical columns, in [0, 1].
pub fn cramers_v(xs: &[&str], ys: &[&str]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }

    let mut joint: HashMap<(&str, &str), usize> = HashMap::new();
    let mut x_counts: HashMap<&str, usize> = HashMap::new();
    let mut y_counts: HashMap<&str, usize> = HashMap::new();

    for i in 0..n {
        *joint.entry((xs[i], ys[i])).or_insert(0) += 1;
        *x_counts.entry(xs[i]).or_insert(0) += 1;
        *y_counts.entry(ys[i]).or_insert(0) += 1;
    }

    let r = x_counts.len();
    let c = y_counts.len();
    if r < 2 || c < 2 {
        return 0.0;
    }

    let nf = n as f64;
    let mut chi2 = 0.0;
    for (x, &nx) in &x_counts {
        for (y, &ny) in &y_counts {
            let expected = (nx as f64) * (ny as f64) / nf;
            if expected == 0.0 {
                continue;
            }
            let observed = joint.get(&(*x, *y)).copied().unwrap_or(0) as f64;
            let diff = observed - expected;
            chi2 += diff * diff / expected;
        }
    }

    let k = (r.min(c) - 1) as f64;
    (chi2 / (nf * k)).sqrt().clamp(0.0, 1.0)
}

/// Eta-squared: fraction of numeric variance explained by category
/// membership, in [0, 1].
pub fn eta_squared(categories: &[&str], values: &[f64]) -> f64 {
    let n = categories.len().min(values.len());
    if n < 2 {
        return 0.0;
    }

    let grand_mean = values[..n].iter().sum::<f64>() / n as f64;

    let mut groups: HashMap<&str, (usize, f64)> = HashMap::new();
    for i in 0..n {
        let entry = groups.entry(categories[i]).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += values[i];
    }

    let ss_total: f64 = values[..n].iter().map(|v| (v - grand_mean).powi(2)).sum();
    if ss_total == 0.0 {
        return 0.0;
    }

    let ss_between: f64 = groups
        .values()
        .map(|&(count, sum)| {
            let group_mean = sum / count as f64;
            count as f64 * (group_mean - grand_mean).powi(2)
        })
        .sum();

    (ss_between / ss_total).clamp(0.0, 1.0)
}

/// Normalized mutual information over discretized values, in [0, 1].
/// `NMI = I(X;Y) / sqrt(H(X) * H(Y))`, 0 when either side is constant.
pub fn normalized_mutual_information(xs: &[&str], ys: &[&str]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;

    let mut joint: HashMap<(&str, &str), usize> = HashMap::new();
    let mut x_counts: HashMap<&str, usize> = HashMap::new();
    let mut y_counts: HashMap<&str, usize> = HashMap::new();

    for i in 0..n {
        *joint.entry((xs[i], ys[i])).or_insert(0) += 1;
        *x_counts.entry(xs[i]).or_insert(0) += 1;
        *y_counts.entry(ys[i]).or_insert(0) += 1;
    }

    let h_x = entropy(x_counts.values(), nf);
    let h_y = entropy(y_counts.values(), nf);
    if h_x == 0.0 || h_y == 0.0 {
        return 0.0;
    }

    let mut mi = 0.0;
    for ((x, y), &nxy) in &joint {
        let p_xy = nxy as f64 / nf;
        let p_x = x_counts[x] as f64 / nf;
        let p_y = y_counts[y] as f64 / nf;
        mi += p_xy * (p_xy / (p_x * p_y)).ln();
    }

    (mi / (h_x * h_y).sqrt()).clamp(0.0, 1.0)
}

fn entropy<'a>(counts: impl Iterator<Item = &'a usize>, n: f64) -> f64 {
    counts
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.ln()
        })
        .sum()
}

/// Discretize numeric values into equal-width bin labels for the mutual
/// information fallback.
pub fn bin_numeric(values: &[f64], bins: usize) -> Vec<String> {
    let bins = bins.max(2);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if !min.is_finite() || !max.is_finite() || min == max {
        return values.iter().map(|_| "b0".to_string()).collect();
    }

    let width = (max - min) / bins as f64;
    values
        .iter()
        .map(|&v| {
            let mut idx = ((v - min) / width) as usize;
            if idx >= bins {
                idx = bins - 1;
            }
            format!("b{}", idx)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pearson_perfect_positive() {
        let xs: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let xs: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| -3.0 * x).collect();
        assert!((pearson(&xs, &ys) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_constant_column_is_zero() {
        let xs = vec![1.0, 1.0, 1.0];
        let ys = vec![1.0, 2.0, 3.0];
        assert_eq!(pearson(&xs, &ys), 0.0);
    }

    #[test]
    fn test_pearson_symmetry() {
        let xs = vec![1.0, 4.0, 2.0, 8.0, 5.0];
        let ys = vec![3.0, 1.0, 7.0, 2.0, 9.0];
        assert!((pearson(&xs, &ys) - pearson(&ys, &xs)).abs() < 1e-12);
    }

    #[test]
    fn test_spearman_monotone_nonlinear() {
        let xs: Vec<f64> = (1..=50).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| x.exp().min(1e300)).collect();
        assert!((spearman(&xs, &ys) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_ranks_with_ties() {
        let ranks = compute_ranks(&[3.0, 1.0, 4.0, 1.0, 5.0]);
        assert_eq!(ranks, vec![3.0, 1.5, 4.0, 1.5, 5.0]);
    }

    #[test]
    fn test_cramers_v_perfect_association() {
        let xs = vec!["a", "a", "b", "b", "a", "b"];
        let ys = vec!["x", "x", "y", "y", "x", "y"];
        assert!((cramers_v(&xs, &ys) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cramers_v_independence() {
        let xs = vec!["a", "a", "b", "b"];
        let ys = vec!["x", "y", "x", "y"];
        assert!(cramers_v(&xs, &ys).abs() < 1e-9);
    }

    #[test]
    fn test_cramers_v_single_level_is_zero() {
        let xs = vec!["a", "a", "a"];
        let ys = vec!["x", "y", "z"];
        assert_eq!(cramers_v(&xs, &ys), 0.0);
    }

    #[test]
    fn test_eta_squared_fully_explained() {
        let cats = vec!["a", "a", "b", "b"];
        let vals = vec![1.0, 1.0, 5.0, 5.0];
        assert!((eta_squared(&cats, &vals) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_eta_squared_unexplained() {
        let cats = vec!["a", "a", "b", "b"];
        let vals = vec![1.0, 5.0, 1.0, 5.0];
        assert!(eta_squared(&cats, &vals).abs() < 1e-9);
    }

    #[test]
    fn test_nmi_perfect_dependence() {
        let xs = vec!["a", "b", "c", "a", "b", "c"];
        let ys = vec!["x", "y", "z", "x", "y", "z"];
        assert!((normalized_mutual_information(&xs, &ys) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_nmi_constant_side_is_zero() {
        let xs = vec!["a", "a", "a"];
        let ys = vec!["x", "y", "z"];
        assert_eq!(normalized_mutual_information(&xs, &ys), 0.0);
    }

    #[test]
    fn test_bin_numeric_bounds() {
        let values = vec![0.0, 5.0, 10.0];
        let binned = bin_numeric(&values, 2);
        assert_eq!(binned, vec!["b0", "b1", "b1"]);
    }
}
