//! Property-based tests for the profiling core.
//!
//! These verify the invariants the index contract depends on:
//!
//! 1. **No panics**: parsers and classifiers accept any input
//! 2. **Determinism**: same input always produces the same output
//! 3. **Bounds**: coefficients, labels and result lists stay in range
//!
//! ```bash
//! cargo test -p refract --test property_tests
//! PROPTEST_CASES=10000 cargo test -p refract --test property_tests
//! ```

use proptest::prelude::*;

use refract::assoc::methods::{cramers_v, normalized_mutual_information, pearson, spearman};
use refract::infer::value::{parse_boolean, parse_date, parse_number};
use refract::infer::TypeSampler;
use refract::profile::{Confidence, Strength};

// =============================================================================
// Strategies
// =============================================================================

/// Arbitrary printable cell values, including separators and null tokens.
fn cell_value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9_,./\\- ]{0,30}",
        "-?[0-9]{1,10}(\\.[0-9]{1,5})?",
        "[12][0-9]{3}-[01][0-9]-[0-3][0-9]",
        Just(String::new()),
        Just("NA".to_string()),
        Just("null".to_string()),
    ]
}

fn finite_f64() -> impl Strategy<Value = f64> {
    (-1.0e6f64..1.0e6f64).prop_filter("finite", |v| v.is_finite())
}

fn paired_vectors() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((finite_f64(), finite_f64()), 2..200)
        .prop_map(|pairs| pairs.into_iter().unzip())
}

fn label_vectors() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    prop::collection::vec(("[a-e]{1}", "[v-z]{1}"), 2..200)
        .prop_map(|pairs| pairs.into_iter().unzip())
}

// =============================================================================
// Parser properties
// =============================================================================

proptest! {
    /// Value parsers never panic on any input.
    #[test]
    fn parsers_never_panic(value in "\\PC{0,100}") {
        let _ = parse_number(&value);
        let _ = parse_date(&value);
        let _ = parse_boolean(&value);
    }

    /// A successfully parsed number is always finite.
    #[test]
    fn parsed_numbers_are_finite(value in "\\PC{0,50}") {
        if let Some(n) = parse_number(&value) {
            prop_assert!(n.is_finite());
        }
    }

    /// Classification is deterministic: the same sample yields the same type.
    #[test]
    fn classification_is_deterministic(values in prop::collection::vec(cell_value(), 0..100)) {
        let refs: Vec<&str> = values.iter().map(|s| s.as_str()).collect();
        let sampler = TypeSampler::new();
        let first = sampler.classify_values(&refs);
        let second = sampler.classify_values(&refs);
        prop_assert_eq!(first.inferred_type, second.inferred_type);
        prop_assert_eq!(first.distinct_count, second.distinct_count);
        prop_assert_eq!(first.null_count, second.null_count);
    }

    /// Null accounting always adds up.
    #[test]
    fn null_rate_bounded(values in prop::collection::vec(cell_value(), 0..100)) {
        let refs: Vec<&str> = values.iter().map(|s| s.as_str()).collect();
        let decision = TypeSampler::new().classify_values(&refs);
        prop_assert!(decision.null_count <= decision.sampled_values);
        prop_assert!((0.0..=1.0).contains(&decision.null_rate()));
        prop_assert!(decision.distinct_count <= decision.sampled_values - decision.null_count
            || decision.sampled_values == 0);
    }
}

// =============================================================================
// Association properties
// =============================================================================

proptest! {
    /// Pearson is symmetric and bounded in [-1, 1].
    #[test]
    fn pearson_symmetric_and_bounded((xs, ys) in paired_vectors()) {
        let ab = pearson(&xs, &ys);
        let ba = pearson(&ys, &xs);
        prop_assert!((ab - ba).abs() < 1e-9);
        prop_assert!((-1.0..=1.0).contains(&ab));
    }

    /// Spearman is symmetric and bounded in [-1, 1].
    #[test]
    fn spearman_symmetric_and_bounded((xs, ys) in paired_vectors()) {
        let ab = spearman(&xs, &ys);
        let ba = spearman(&ys, &xs);
        prop_assert!((ab - ba).abs() < 1e-9);
        prop_assert!((-1.0..=1.0).contains(&ab));
    }

    /// Cramér's V and normalized mutual information stay in [0, 1] and are
    /// symmetric.
    #[test]
    fn categorical_methods_bounded((xs, ys) in label_vectors()) {
        let x_refs: Vec<&str> = xs.iter().map(|s| s.as_str()).collect();
        let y_refs: Vec<&str> = ys.iter().map(|s| s.as_str()).collect();

        let v = cramers_v(&x_refs, &y_refs);
        prop_assert!((0.0..=1.0).contains(&v));
        prop_assert!((v - cramers_v(&y_refs, &x_refs)).abs() < 1e-9);

        let nmi = normalized_mutual_information(&x_refs, &y_refs);
        prop_assert!((0.0..=1.0).contains(&nmi));
        prop_assert!((nmi - normalized_mutual_information(&y_refs, &x_refs)).abs() < 1e-9);
    }

    /// Strength labels partition the coefficient range.
    #[test]
    fn strength_labels_partition(coefficient in -1.0f64..=1.0) {
        let label = Strength::from_coefficient(coefficient);
        let c = coefficient.abs();
        match label {
            Strength::Low => prop_assert!(c < 0.2),
            Strength::Medium => prop_assert!((0.2..0.5).contains(&c)),
            Strength::High => prop_assert!(c >= 0.5),
        }
    }

    /// High confidence requires a large sample.
    #[test]
    fn high_confidence_needs_large_sample(
        sample in 0usize..5000,
        coefficient in -1.0f64..=1.0,
    ) {
        let strength = Strength::from_coefficient(coefficient);
        let confidence = Confidence::from_sample(sample, strength);
        if confidence == Confidence::High {
            prop_assert!(sample >= 1000);
        }
        if sample < 100 {
            prop_assert_eq!(confidence, Confidence::Low);
        }
    }
}
