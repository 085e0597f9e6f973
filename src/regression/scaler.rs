//! Standard scaler (z-score normalization).
//!
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the per-column mean of the training rows and `s` their
//! population standard deviation. Parameters are fixed at fit time and reused
//! unchanged for every later transform.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::FitError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    /// Never zero: constant columns get a scale of 1.0 and are only centered.
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(x: ArrayView2<'_, f64>) -> Result<Self, FitError> {
        if x.nrows() == 0 {
            return Err(FitError::EmptyInput("fit a scaler"));
        }
        let mean = x
            .mean_axis(Axis(0))
            .ok_or(FitError::EmptyInput("fit a scaler"))?;
        let std = x.std_axis(Axis(0), 0.0);

        let scale = std
            .iter()
            .zip(constant_columns(x))
            .map(|(&s, constant)| if constant || s.abs() < f64::EPSILON { 1.0 } else { s })
            .collect();

        Ok(Self {
            mean: mean.to_vec(),
            scale,
        })
    }

    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, FitError> {
        if x.ncols() != self.n_features() {
            return Err(FitError::DimensionMismatch {
                expected: self.n_features(),
                got: x.ncols(),
            });
        }
        let mean = ArrayView1::from(&self.mean[..]);
        let scale = ArrayView1::from(&self.scale[..]);
        Ok((&x - &mean) / &scale)
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Shape and value checks for parameters that did not come from `fit`.
    pub(crate) fn check(&self) -> Result<(), String> {
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "{} means but {} scales",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err("non-finite feature mean".into());
        }
        if self.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err("zero or non-finite feature scale".into());
        }
        Ok(())
    }
}

/// Columns whose values are all identical. Checked exactly rather than via
/// σ, which can come out as rounding noise for a constant column.
pub(crate) fn constant_columns(x: ArrayView2<'_, f64>) -> Vec<bool> {
    x.columns()
        .into_iter()
        .map(|col| {
            let mut values = col.iter();
            match values.next() {
                Some(&first) => values.all(|&v| v == first),
                None => true,
            }
        })
        .collect()
}
