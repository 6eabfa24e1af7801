//! Shared utilities for integration tests

pub use approx::assert_relative_eq;

pub const EPSILON: f64 = 1e-10;

/// Case labels for `n_cases` cases with `per_case` rows each, interleaved
/// so that no case's rows are contiguous
pub fn interleaved_keys(n_cases: usize, per_case: usize) -> Vec<f64> {
    (0..per_case)
        .flat_map(|_| (0..n_cases).map(|c| (c + 1) as f64))
        .collect()
}
