//! Common test utilities for casewise-polars tests

#![allow(dead_code)]

use polars::prelude::*;
use rand::prelude::*;
use rand_distr::Normal;

/// Panel with `n_cases` cases of `per_case` rows in columns `ids`, `vals`, `outs`
pub fn panel_df(n_cases: usize, per_case: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.25).unwrap();

    let mut ids = Vec::new();
    let mut vals = Vec::new();
    let mut outs = Vec::new();
    for case in 1..=n_cases as i64 {
        for t in 0..per_case {
            ids.push(case);
            vals.push(t as f64);
            outs.push(1.0 + 0.5 * t as f64 + noise.sample(&mut rng));
        }
    }

    df!["ids" => ids, "vals" => vals, "outs" => outs].unwrap()
}

/// Helper function to extract a single value from a result DataFrame
pub fn extract_value(df: &DataFrame, col_name: &str, row: usize) -> f64 {
    df.column(col_name)
        .unwrap()
        .f64()
        .unwrap()
        .get(row)
        .unwrap()
}
