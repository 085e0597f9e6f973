//! Ordinary least squares on standardized features.
//!
//! The fitted coefficients only make sense together with the exact scaler
//! they were fit against, so [`FittedModel`] owns both and exposes no way to
//! pull them apart or swap one out.

use linfa::traits::Fit;
use linfa::Dataset;
use linfa_linear::LinearRegression;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::scaler::{constant_columns, StandardScaler};
use crate::error::FitError;

/// Coefficients and intercept in standardized-feature space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// A linear model bundled with the standardization it was trained on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    model: LinearModel,
    scaler: StandardScaler,
}

impl FittedModel {
    /// Standardize `x` with parameters computed from `x` alone, then solve OLS
    /// (with intercept, no regularization) against `y`.
    pub fn fit(x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<Self, FitError> {
        if x.nrows() != y.len() {
            return Err(FitError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(FitError::EmptyInput("fit a model"));
        }
        if x.ncols() == 0 {
            return Err(FitError::NoFeatures);
        }

        let scaler = StandardScaler::fit(x)?;
        let scaled = scaler.transform(x)?;

        // Constant columns carry no information and would make XᵀX singular:
        // they stay out of the solve and get a zero coefficient.
        let varying: Vec<usize> = constant_columns(x)
            .into_iter()
            .enumerate()
            .filter(|&(_, constant)| !constant)
            .map(|(j, _)| j)
            .collect();
        if varying.len() < x.ncols() {
            log::warn!(
                "{} constant feature column(s) get a zero coefficient",
                x.ncols() - varying.len()
            );
        }

        let mut coefficients = vec![0.0; x.ncols()];
        let intercept = if varying.is_empty() {
            y.mean().ok_or(FitError::EmptyInput("fit a model"))?
        } else {
            let dataset = Dataset::new(scaled.select(Axis(1), &varying), y.to_owned());
            let fitted = LinearRegression::new()
                .fit(&dataset)
                .map_err(|e| FitError::Solver(e.to_string()))?;
            for (&j, &b) in varying.iter().zip(fitted.params().iter()) {
                coefficients[j] = b;
            }
            fitted.intercept()
        };

        let model = LinearModel {
            coefficients,
            intercept,
        };
        if model.coefficients.iter().any(|c| !c.is_finite()) || !model.intercept.is_finite() {
            return Err(FitError::Solver("non-finite coefficients".into()));
        }

        log::info!("Model training complete on {} rows", x.nrows());
        Ok(Self { model, scaler })
    }

    /// Standardize with the stored parameters and apply the linear model.
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, FitError> {
        let scaled = self.scaler.transform(x)?;
        let coefficients = ArrayView1::from(&self.model.coefficients[..]);
        Ok(scaled.dot(&coefficients) + self.model.intercept)
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn n_features(&self) -> usize {
        self.model.coefficients.len()
    }

    /// Consistency checks for a bundle that was decoded rather than fit.
    pub(crate) fn check(&self) -> Result<(), String> {
        self.scaler.check()?;
        if self.model.coefficients.len() != self.scaler.n_features() {
            return Err(format!(
                "{} coefficients but {} scaled features",
                self.model.coefficients.len(),
                self.scaler.n_features()
            ));
        }
        if self.model.coefficients.is_empty() {
            return Err("model has no coefficients".into());
        }
        if self.model.coefficients.iter().any(|c| !c.is_finite())
            || !self.model.intercept.is_finite()
        {
            return Err("non-finite coefficients".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn recovers_exact_line() {
        // y = 2 + 3*x
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![5.0, 8.0, 11.0, 14.0, 17.0];

        let fitted = FittedModel::fit(x.view(), y.view()).unwrap();
        let pred = fitted.predict(x.view()).unwrap();
        for (p, t) in pred.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-8);
        }
        // Intercept in scaled space is the target mean.
        assert!((fitted.model().intercept() - 11.0).abs() < 1e-8);
    }

    #[test]
    fn recovers_two_feature_plane() {
        // y = 1 + 2*x1 + 3*x2
        let x = array![[1.0, 2.0], [2.0, 1.0], [3.0, 5.0], [4.0, 3.0], [5.0, 4.0]];
        let y: Array1<f64> = x.rows().into_iter().map(|r| 1.0 + 2.0 * r[0] + 3.0 * r[1]).collect();

        let fitted = FittedModel::fit(x.view(), y.view()).unwrap();
        let probe = array![[10.0, -2.0]];
        let pred = fitted.predict(probe.view()).unwrap();
        assert!((pred[0] - (1.0 + 20.0 - 6.0)).abs() < 1e-6);
    }

    #[test]
    fn constant_feature_gets_zero_coefficient() {
        // Every training house has three bedrooms; price = 50 + 0.1*sqft.
        let x = array![[1000.0, 3.0], [1200.0, 3.0], [1500.0, 3.0], [1800.0, 3.0]];
        let y = array![150.0, 170.0, 200.0, 230.0];

        let fitted = FittedModel::fit(x.view(), y.view()).unwrap();
        assert_eq!(fitted.model().coefficients()[1], 0.0);

        let pred = fitted.predict(array![[2000.0, 3.0], [2000.0, 5.0]].view()).unwrap();
        assert!((pred[0] - 250.0).abs() < 1e-8);
        assert!((pred[1] - 250.0).abs() < 1e-8);
    }

    #[test]
    fn all_constant_features_predict_the_mean() {
        let x = array![[5.0], [5.0], [5.0]];
        let y = array![1.0, 2.0, 3.0];
        let fitted = FittedModel::fit(x.view(), y.view()).unwrap();
        assert_eq!(fitted.model().coefficients(), &[0.0]);
        assert_eq!(fitted.predict(array![[7.0]].view()).unwrap()[0], 2.0);
    }

    #[test]
    fn collinear_features_fail_with_solver_error() {
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [4.0, 8.0]];
        let y = array![1.0, 2.0, 3.0, 4.0];
        assert!(matches!(
            FittedModel::fit(x.view(), y.view()),
            Err(FitError::Solver(_))
        ));
    }

    #[test]
    fn empty_training_set_fails_clearly() {
        let x = Array2::<f64>::zeros((0, 1));
        let y = Array1::<f64>::zeros(0);
        let err = FittedModel::fit(x.view(), y.view()).unwrap_err();
        assert!(matches!(err, FitError::EmptyInput(_)));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0];
        assert!(matches!(
            FittedModel::fit(x.view(), y.view()),
            Err(FitError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn predict_checks_feature_count() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![1.0, 2.0, 3.5];
        let fitted = FittedModel::fit(x.view(), y.view()).unwrap();
        assert!(fitted.predict(array![[1.0, 2.0]].view()).is_err());
    }
}
