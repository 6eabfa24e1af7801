//! Shared helpers for casewise-lm integration tests

#![allow(dead_code)]

use casewise_core::Dataset;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

pub use approx::assert_relative_eq;

/// Panel of `n_cases` cases with `per_case` rows each
///
/// `outs = intercept + slope * vals + noise`, with the same true
/// coefficients in every case. Case keys are `1..=n_cases` in column `ids`.
pub fn linear_panel(
    n_cases: usize,
    per_case: usize,
    intercept: f64,
    slope: f64,
    noise_sd: f64,
    seed: u64,
) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let noise = Normal::new(0.0, noise_sd).unwrap();

    let mut ids = Vec::with_capacity(n_cases * per_case);
    let mut vals = Vec::with_capacity(n_cases * per_case);
    let mut outs = Vec::with_capacity(n_cases * per_case);
    for case in 1..=n_cases {
        for t in 0..per_case {
            let v = t as f64;
            ids.push(case as f64);
            vals.push(v);
            outs.push(intercept + slope * v + noise.sample(&mut rng));
        }
    }

    Dataset::builder()
        .numeric("ids", ids)
        .numeric("vals", vals)
        .numeric("outs", outs)
        .build()
        .unwrap()
}

/// The five-subject example panel: ids 1..5, five rows each
pub fn example_panel() -> Dataset {
    linear_panel(5, 5, 2.0, 0.5, 0.3, 2024)
}
