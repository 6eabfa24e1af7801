//! Jackknife quantities for the mean statistic
//!
//! The BCa acceleration constant is estimated from leave-one-case-out means.

use casewise_core::{Error, Result};

/// Mean of the sample with each value left out in turn
///
/// Requires at least two values.
pub fn leave_one_out_means(values: &[f64]) -> Result<Vec<f64>> {
    if values.len() < 2 {
        return Err(Error::degenerate_bootstrap(format!(
            "jackknife needs at least two cases, got {}",
            values.len()
        )));
    }
    let total: f64 = values.iter().sum();
    let denom = (values.len() - 1) as f64;
    Ok(values.iter().map(|&v| (total - v) / denom).collect())
}

/// Jackknife estimate of the BCa acceleration constant
///
/// `a = Σ(θ̄ − θᵢ)³ / (6 · (Σ(θ̄ − θᵢ)²)^{3/2})` where `θᵢ` are the
/// leave-one-out means and `θ̄` their average.
///
/// Fails with `DegenerateBootstrap` when every value is identical, because
/// the denominator vanishes.
pub fn acceleration(values: &[f64]) -> Result<f64> {
    let jack = leave_one_out_means(values)?;

    if values.iter().all(|&v| v == values[0]) {
        return Err(Error::degenerate_bootstrap(
            "all case estimates are identical, acceleration is undefined",
        ));
    }

    let jack_mean = jack.iter().sum::<f64>() / jack.len() as f64;
    let (sum_sq, sum_cube) = jack.iter().fold((0.0, 0.0), |(sq, cube), &t| {
        let d = jack_mean - t;
        (sq + d * d, cube + d * d * d)
    });

    let denom = 6.0 * sum_sq.powf(1.5);
    if denom == 0.0 || !denom.is_finite() {
        return Err(Error::degenerate_bootstrap(format!(
            "acceleration denominator is {denom}"
        )));
    }

    Ok(sum_cube / denom)
}
