//! Properties of case partitioning

mod common;

use casewise_core::math::{moments, quantile_sorted, sorted_copy};
use casewise_core::Dataset;
use common::*;
use proptest::prelude::*;

#[test]
fn test_interleaved_rows_group_by_case() {
    let keys = interleaved_keys(4, 3);
    let data = Dataset::builder()
        .numeric("ids", keys.clone())
        .numeric("outs", (0..keys.len()).map(|i| i as f64).collect::<Vec<_>>())
        .build()
        .unwrap();

    let parts = data.partition("ids").unwrap();
    assert_eq!(parts.len(), 4);
    for (c, part) in parts.iter().enumerate() {
        assert_eq!(part.key.as_str(), format!("{}", c + 1));
        assert_eq!(part.rows, vec![c, c + 4, c + 8]);
    }
}

#[test]
fn test_mean_of_case_sizes() {
    let data = Dataset::builder()
        .numeric("ids", vec![1.0, 1.0, 1.0, 2.0])
        .build()
        .unwrap();
    let sizes: Vec<f64> = data
        .partition("ids")
        .unwrap()
        .iter()
        .map(|p| p.len() as f64)
        .collect();
    assert_relative_eq!(moments::mean(&sizes).unwrap(), 2.0, epsilon = EPSILON);
}

proptest! {
    #[test]
    fn partition_covers_every_row_once(keys in prop::collection::vec(0u8..6, 1..80)) {
        let data = Dataset::builder()
            .numeric("ids", keys.iter().map(|&k| k as f64).collect::<Vec<_>>())
            .build()
            .unwrap();
        let parts = data.partition("ids").unwrap();

        let mut seen: Vec<usize> = parts.iter().flat_map(|p| p.rows.iter().copied()).collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..keys.len()).collect::<Vec<_>>());

        for part in &parts {
            prop_assert!(part.rows.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn interpolated_quantile_stays_in_range(
        values in prop::collection::vec(-1e6f64..1e6, 1..60),
        p in 0.0f64..=1.0,
    ) {
        let sorted = sorted_copy(&values);
        let q = quantile_sorted(&sorted, p).unwrap();
        prop_assert!(q >= sorted[0] && q <= sorted[sorted.len() - 1]);
    }
}
