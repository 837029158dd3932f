//! Property-based tests for subspace-plots
//!
//! - Persistence keeps every array bit-exact, non-finite values included
//! - Eigenvector error ignores sign
//! - Response-curve domains hit the stored bounds at both ends
//! - Run with ProptestConfig::with_cases(100)

use proptest::prelude::*;
use subspace_plots::extract::{
    eigenvector_distance, first_eigenvector_error, Selection, ShadowDomainPolicy,
};
use subspace_plots::record::{ExperimentRecord, Method, ResponseType, Tensor};
use subspace_plots::store::{load_record, save_record};

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

/// Values across many magnitudes, including subnormals, negative zero,
/// infinities and NaN
fn arb_value() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1e300f64..1e300,
        -1.0f64..1.0,
        Just(-0.0),
        Just(f64::MIN_POSITIVE / 4.0),
        Just(f64::MAX),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        Just(f64::NAN),
    ]
}

/// SGpp record with `g × d` error arrays
fn arb_sgpp_record() -> impl Strategy<Value = ExperimentRecord> {
    (1usize..5, 1usize..4).prop_flat_map(|(g, d)| {
        (
            proptest::collection::vec(arb_value(), g * d),
            proptest::collection::vec(arb_value(), g * d),
            proptest::collection::vec(1.0f64..1e6, d),
        )
            .prop_map(move |(l2, integral, data)| {
                ExperimentRecord::builder(Method::Sgpp, "sin5D", ResponseType::Data)
                    .grid_type("nakbsplinemodified")
                    .degree(3)
                    .l2_errors(Tensor::new(vec![g, d], l2).unwrap())
                    .integral_errors(Tensor::new(vec![g, d], integral).unwrap())
                    .data_range(Tensor::from_vec(data))
                    .build()
                    .unwrap()
            })
    })
}

/// Unit vector of dimension `dim`
fn arb_unit_vector(dim: usize) -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(-1.0f64..1.0, dim)
        .prop_filter("non-degenerate", |v| v.iter().map(|x| x * x).sum::<f64>() > 1e-6)
        .prop_map(|v| {
            let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
            v.into_iter().map(|x| x / norm).collect()
        })
}

/// Ordered `(lower, upper)` bounds
fn arb_bounds() -> impl Strategy<Value = (f64, f64)> {
    (-100.0f64..100.0, 0.0f64..100.0).prop_map(|(lower, width)| (lower, lower + width))
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ========================================================================
    // Persistence Properties
    // ========================================================================

    /// Property: write then read returns identical bits
    #[test]
    fn prop_record_round_trip_is_bit_exact(record in arb_sgpp_record()) {
        let dir = tempfile::tempdir().unwrap();
        save_record(dir.path(), &record).unwrap();
        let loaded = load_record(dir.path()).unwrap();

        for (a, b) in [
            (record.l2_errors(), loaded.l2_errors()),
            (record.integral_errors(), loaded.integral_errors()),
            (record.data_range(), loaded.data_range()),
        ] {
            let (a, b) = (a.unwrap(), b.unwrap());
            prop_assert_eq!(a.shape(), b.shape());
            let bits_a: Vec<u64> = a.to_vec().iter().map(|v| v.to_bits()).collect();
            let bits_b: Vec<u64> = b.to_vec().iter().map(|v| v.to_bits()).collect();
            prop_assert_eq!(bits_a, bits_b);
        }
    }

    // ========================================================================
    // Eigenvector Error Properties
    // ========================================================================

    /// Property: negating either vector leaves the distance unchanged
    #[test]
    fn prop_eigenvector_distance_sign_insensitive(
        a in arb_unit_vector(5),
        b in arb_unit_vector(5)
    ) {
        let neg_b: Vec<f64> = b.iter().map(|x| -x).collect();
        let neg_a: Vec<f64> = a.iter().map(|x| -x).collect();
        let d = eigenvector_distance(&a, &b);
        prop_assert_eq!(d, eigenvector_distance(&a, &neg_b));
        prop_assert_eq!(d, eigenvector_distance(&neg_a, &b));
        prop_assert!(eigenvector_distance(&a, &neg_a) < 1e-12);
    }

    /// Property: the error curve of a record is the same for `r` and `-r`
    #[test]
    fn prop_first_eigenvector_error_sign_insensitive(
        columns in proptest::collection::vec(arb_unit_vector(3), 2),
        reference in arb_unit_vector(3)
    ) {
        // eigenvectors: dim 3 × rank 1 × grid 2 × data 1
        let eigenvectors = Tensor::from_fn(vec![3, 1, 2, 1], |ix| columns[ix[2]][ix[0]]);
        let record = ExperimentRecord::builder(Method::As, "sin3D", ResponseType::Adaptive)
            .eigenvalues(Tensor::from_fn(vec![1, 2, 1], |_| 1.0))
            .eigenvectors(eigenvectors)
            .sample_range(Tensor::from_vec(vec![10.0, 100.0]))
            .build()
            .unwrap();
        let negated: Vec<f64> = reference.iter().map(|x| -x).collect();

        let plus = first_eigenvector_error(&record, &reference, Selection::last()).unwrap();
        let minus = first_eigenvector_error(&record, &negated, Selection::last()).unwrap();
        prop_assert_eq!(plus, minus);
    }

    // ========================================================================
    // Response-Curve Domain Properties
    // ========================================================================

    /// Property: [0, 1] maps 0 to the lower and 1 to the upper bound
    #[test]
    fn prop_unit_policy_hits_bounds((lower, upper) in arb_bounds()) {
        let policy = ShadowDomainPolicy::unit();
        prop_assert_eq!(policy.map(0.0, lower, upper), lower);
        prop_assert!((policy.map(1.0, lower, upper) - upper).abs() <= 1e-12 * upper.abs().max(1.0));
    }

    /// Property: [-1, 1] maps -1 to the lower and 1 to the upper bound
    #[test]
    fn prop_symmetric_policy_hits_bounds((lower, upper) in arb_bounds()) {
        let policy = ShadowDomainPolicy::symmetric();
        prop_assert_eq!(policy.map(-1.0, lower, upper), lower);
        prop_assert!((policy.map(1.0, lower, upper) - upper).abs() <= 1e-12 * upper.abs().max(1.0));
    }

    /// Property: a lower-bound override replaces the stored lower bound only
    #[test]
    fn prop_override_keeps_upper_bound(upper in 0.0f64..100.0, stored_lower in -100.0f64..0.0) {
        let policy = ShadowDomainPolicy::symmetric().with_lower_bound(0.0);
        prop_assert_eq!(policy.map(-1.0, stored_lower, upper), 0.0);
        prop_assert_eq!(policy.map(1.0, stored_lower, upper), upper);
    }

    /// Property: abscissae are monotone and span the mapped interval
    #[test]
    fn prop_abscissae_span_bounds((lower, upper) in arb_bounds(), n in 2usize..200) {
        let xs = ShadowDomainPolicy::unit().abscissae(n, lower, upper);
        prop_assert_eq!(xs.len(), n);
        prop_assert_eq!(xs[0], lower);
        prop_assert!(xs.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!((xs[n - 1] - upper).abs() <= 1e-12 * upper.abs().max(1.0));
    }
}
