//! Shared helpers for casewise-confidence integration tests

#![allow(dead_code)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp, Normal};

pub use approx::assert_relative_eq;

/// Per-case estimates drawn from a normal population
pub fn normal_cases(n: usize, mean: f64, sd: f64, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(mean, sd).unwrap();
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

/// Right-skewed per-case estimates
pub fn skewed_cases(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let exp = Exp::new(1.0).unwrap();
    (0..n).map(|_| exp.sample(&mut rng)).collect()
}
