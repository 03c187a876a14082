//! Population Stability Index between a reference and a live sample.

use crate::{Error, Result};

/// Default number of equal-width buckets
pub const DEFAULT_BINS: usize = 10;

/// Floor applied to bucket proportions before taking the log ratio
pub const MIN_PROPORTION: f64 = 1e-6;

/// Equal-width bucket edges spanning `[min(reference), max(reference)]`
///
/// Returns `bins + 1` edges. A reference whose values are all equal has no
/// width to divide and is rejected.
pub fn bin_edges(reference: &[f64], bins: usize) -> Result<Vec<f64>> {
    if reference.is_empty() {
        return Err(Error::EmptySample("reference"));
    }
    if bins == 0 {
        return Err(Error::InvalidBins(bins));
    }

    let lo = reference.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = reference.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo >= hi {
        return Err(Error::DegenerateReference(lo));
    }

    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
    edges.push(hi);
    Ok(edges)
}

/// Count samples into buckets defined by `edges`
///
/// Buckets are half-open `[e_i, e_{i+1})` except the last, which also
/// includes its right edge. Values outside `[first, last]` land in no bucket.
pub fn bin_counts(data: &[f64], edges: &[f64]) -> Vec<usize> {
    let buckets = edges.len().saturating_sub(1);
    let mut counts = vec![0; buckets];
    let (Some(&first), Some(&last)) = (edges.first(), edges.last()) else {
        return counts;
    };

    for &val in data {
        if val < first || val > last {
            continue;
        }
        // partition_point gives the count of edges <= val, which is >= 1 here
        let idx = edges.partition_point(|&e| e <= val).saturating_sub(1);
        counts[idx.min(buckets - 1)] += 1;
    }
    counts
}

/// Population Stability Index of `live` against `reference`
///
/// Proportions are taken over each sample's full size (out-of-range live
/// values dilute the in-range buckets) and floored at [`MIN_PROPORTION`].
/// Identical bucketed proportions give exactly `0.0`.
pub fn calculate_psi(reference: &[f64], live: &[f64], bins: usize) -> Result<f64> {
    if live.is_empty() {
        return Err(Error::EmptySample("live"));
    }
    let edges = bin_edges(reference, bins)?;

    let ref_counts = bin_counts(reference, &edges);
    let live_counts = bin_counts(live, &edges);
    let ref_n = reference.len() as f64;
    let live_n = live.len() as f64;

    let psi = ref_counts
        .iter()
        .zip(&live_counts)
        .map(|(&r, &l)| {
            let r = (r as f64 / ref_n).max(MIN_PROPORTION);
            let l = (l as f64 / live_n).max(MIN_PROPORTION);
            (l - r) * (l / r).ln()
        })
        .sum();

    Ok(psi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform(n: u32) -> Vec<f64> {
        (0..n).map(f64::from).collect()
    }

    #[test]
    fn test_bin_edges_equal_width() {
        let edges = bin_edges(&[0.0, 10.0, 5.0], 5).unwrap();
        assert_eq!(edges.len(), 6);
        assert_relative_eq!(edges[1], 2.0);
        assert_relative_eq!(edges[5], 10.0);
    }

    #[test]
    fn test_bin_counts_last_bucket_closed() {
        let edges = vec![0.0, 1.0, 2.0];
        assert_eq!(bin_counts(&[0.0, 1.0, 2.0], &edges), vec![1, 2]);
    }

    #[test]
    fn test_bin_counts_ignores_out_of_range() {
        let edges = vec![0.0, 1.0, 2.0];
        assert_eq!(bin_counts(&[-0.5, 0.5, 2.5], &edges), vec![1, 0]);
    }

    #[test]
    fn test_psi_identical_is_zero() {
        let data = uniform(100);
        assert_eq!(calculate_psi(&data, &data, DEFAULT_BINS).unwrap(), 0.0);
    }

    #[test]
    fn test_psi_same_proportions_is_zero() {
        let reference = uniform(100);
        let live: Vec<f64> = reference.iter().chain(&reference).copied().collect();
        assert_eq!(calculate_psi(&reference, &live, DEFAULT_BINS).unwrap(), 0.0);
    }

    #[test]
    fn test_psi_disjoint_exceeds_threshold() {
        let reference: Vec<f64> = (0..100).map(|i| f64::from(i % 10) / 10.0).collect();
        let live = vec![100.0; 50];
        let psi = calculate_psi(&reference, &live, DEFAULT_BINS).unwrap();
        assert!(psi > 0.2, "psi = {psi}");
    }

    #[test]
    fn test_psi_degenerate_reference() {
        let result = calculate_psi(&[3.0; 30], &[3.0; 30], DEFAULT_BINS);
        assert!(matches!(result, Err(Error::DegenerateReference(v)) if v == 3.0));
    }

    #[test]
    fn test_psi_empty_samples() {
        assert!(matches!(
            calculate_psi(&[], &[1.0], DEFAULT_BINS),
            Err(Error::EmptySample("reference"))
        ));
        assert!(matches!(
            calculate_psi(&[1.0, 2.0], &[], DEFAULT_BINS),
            Err(Error::EmptySample("live"))
        ));
    }

    #[test]
    fn test_psi_zero_bins() {
        let data = uniform(10);
        assert!(matches!(calculate_psi(&data, &data, 0), Err(Error::InvalidBins(0))));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn sample() -> impl Strategy<Value = Vec<f64>> {
            prop::collection::vec(-1000.0f64..1000.0, 2..200)
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_psi_non_negative(reference in sample(), live in sample(), bins in 1usize..20) {
                match calculate_psi(&reference, &live, bins) {
                    Ok(psi) => prop_assert!(psi >= 0.0 && psi.is_finite()),
                    Err(e) => prop_assert!(matches!(e, Error::DegenerateReference(_))),
                }
            }

            #[test]
            fn prop_psi_self_is_zero(reference in sample(), bins in 1usize..20) {
                if let Ok(psi) = calculate_psi(&reference, &reference, bins) {
                    prop_assert_eq!(psi, 0.0);
                }
            }

            #[test]
            fn prop_reference_fully_counted(reference in sample(), bins in 1usize..20) {
                if let Ok(edges) = bin_edges(&reference, bins) {
                    let total: usize = bin_counts(&reference, &edges).iter().sum();
                    prop_assert_eq!(total, reference.len());
                }
            }
        }
    }
}
