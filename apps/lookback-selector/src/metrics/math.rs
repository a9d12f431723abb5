//! Statistical math utilities for return series.

/// Calculate mean of a slice of values.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    Some(sum / values.len() as f64)
}

/// Calculate sample standard deviation (N-1) of a slice of values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let avg = mean(values)?;
    let variance_sum: f64 = values.iter().map(|v| (v - avg) * (v - avg)).sum();
    let variance = variance_sum / (values.len() - 1) as f64;

    Some(variance.sqrt())
}

/// Pearson correlation between consecutive values (`x[t]` against `x[t+1]`).
///
/// `None` when fewer than three values or either side has no variance.
pub fn lag1_autocorrelation(values: &[f64]) -> Option<f64> {
    if values.len() < 3 {
        return None;
    }

    let leading = &values[..values.len() - 1];
    let lagged = &values[1..];
    let leading_mean = mean(leading)?;
    let lagged_mean = mean(lagged)?;

    let mut covariance = 0.0;
    let mut leading_var = 0.0;
    let mut lagged_var = 0.0;
    for (a, b) in leading.iter().zip(lagged) {
        let da = a - leading_mean;
        let db = b - lagged_mean;
        covariance += da * db;
        leading_var += da * da;
        lagged_var += db * db;
    }

    let denominator = (leading_var * lagged_var).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }

    let rho = covariance / denominator;
    rho.is_finite().then_some(rho)
}

/// Total return of compounding every value.
pub fn compounded_return(values: &[f64]) -> f64 {
    values.iter().fold(1.0, |equity, r| equity * (1.0 + r)) - 1.0
}

/// Deepest peak-to-trough decline of the compounded equity curve, as a
/// non-positive fraction.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut equity = 1.0_f64;
    let mut peak = 1.0_f64;
    let mut worst = 0.0_f64;

    for r in values {
        equity *= 1.0 + r;
        peak = peak.max(equity);
        if peak > 0.0 {
            worst = worst.min(equity / peak - 1.0);
        }
    }

    worst
}
