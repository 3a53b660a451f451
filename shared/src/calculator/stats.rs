//! Small descriptive statistics helpers used by the budget calculation.

/// Arithmetic mean. Returns `None` for an empty slice.
///
/// When the plain sum overflows, each value is divided by the count before
/// summing instead.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        Some(sum / n)
    } else {
        Some(values.iter().map(|v| v / n).sum())
    }
}

/// Sample standard deviation with one degree of freedom removed (ddof=1).
///
/// Returns `None` when fewer than two values are given.
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    #[allow(clippy::cast_precision_loss)]
    let dof = (values.len() - 1) as f64;

    // Deviations are scaled by the largest one before squaring
    let scale = values.iter().map(|v| (v - avg).abs()).fold(0.0_f64, f64::max);
    if scale == 0.0 {
        return Some(0.0);
    }
    let sum_sq: f64 = values.iter().map(|v| ((v - avg) / scale).powi(2)).sum();
    Some(scale * (sum_sq / dof).sqrt())
}

/// Standard error of the mean: `s / sqrt(n)`.
///
/// A single reading yields exactly zero rather than `None`; repeatability
/// is not assessed from one observation.
#[must_use]
pub fn standard_error(values: &[f64]) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    sample_std_dev(values).map_or(0.0, |s| s / n.sqrt())
}
