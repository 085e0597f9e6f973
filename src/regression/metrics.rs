//! Regression quality metrics.

use ndarray::ArrayView1;

use crate::error::FitError;

/// Mean Squared Error: (1/n) * Σ(y_true - y_pred)²
pub fn mean_squared_error(
    y_true: ArrayView1<'_, f64>,
    y_pred: ArrayView1<'_, f64>,
) -> Result<f64, FitError> {
    check(y_true, y_pred)?;
    let ss_res = residual_sum_of_squares(y_true, y_pred);
    Ok(ss_res / y_true.len() as f64)
}

/// Root Mean Squared Error, in target units.
pub fn root_mean_squared_error(
    y_true: ArrayView1<'_, f64>,
    y_pred: ArrayView1<'_, f64>,
) -> Result<f64, FitError> {
    mean_squared_error(y_true, y_pred).map(f64::sqrt)
}

/// R² = 1 - SS_res / SS_tot
///
/// When the targets have zero variance the ratio is undefined; the score is
/// then 1.0 for a perfect fit and 0.0 otherwise.
pub fn r2_score(y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> Result<f64, FitError> {
    check(y_true, y_pred)?;
    let mean = y_true.mean().ok_or(FitError::EmptyInput("score predictions"))?;
    let ss_res = residual_sum_of_squares(y_true, y_pred);
    let ss_tot: f64 = y_true.iter().map(|&t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

fn residual_sum_of_squares(y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> f64 {
    y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| (t - p).powi(2))
        .sum()
}

fn check(y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> Result<(), FitError> {
    if y_true.len() != y_pred.len() {
        return Err(FitError::DimensionMismatch {
            expected: y_true.len(),
            got: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(FitError::EmptyInput("score predictions"));
    }
    Ok(())
}
