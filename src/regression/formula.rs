//! Human-readable formula in original feature units.
//!
//! For standardized coefficients `b_i`, means `u_i` and scales `s_i`:
//! ```text
//! coef_i    = b_i / s_i
//! intercept = b_0 - Σ b_i · u_i / s_i
//! ```
//! which reproduces the standardized model exactly. Scales are never zero
//! (see [`StandardScaler`](super::scaler::StandardScaler)).

use std::fmt::Write as _;

use super::linear::FittedModel;

#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl Formula {
    pub fn from_model(fitted: &FittedModel) -> Self {
        let model = fitted.model();
        let scaler = fitted.scaler();

        let coefficients: Vec<f64> = model
            .coefficients()
            .iter()
            .zip(scaler.scale())
            .map(|(b, s)| b / s)
            .collect();

        let shift: f64 = coefficients
            .iter()
            .zip(scaler.mean())
            .map(|(c, u)| c * u)
            .sum();

        Self {
            intercept: model.intercept() - shift,
            coefficients,
        }
    }

    /// Evaluate the formula on one row of raw feature values.
    pub fn predict(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }

    /// `Price Thousands = 12.3456 + 0.1100 x Square Footage + 5.2000 x Bedrooms`
    pub fn render(&self, feature_names: &[String], target_name: &str) -> String {
        let mut out = format!("{} = {:.4}", humanize(target_name), self.intercept);
        for (coef, name) in self.coefficients.iter().zip(feature_names) {
            let sign = if *coef < 0.0 { '-' } else { '+' };
            let _ = write!(out, " {sign} {:.4} x {}", coef.abs(), humanize(name));
        }
        out
    }
}

/// `square_footage` → `Square Footage`
pub fn humanize(column: &str) -> String {
    column
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn descaled_formula_matches_standardized_predictions() {
        let x = array![
            [1000.0, 2.0],
            [1200.0, 3.0],
            [1500.0, 3.0],
            [1800.0, 4.0],
            [2200.0, 4.0],
            [1350.0, 2.0]
        ];
        let y = array![200.0, 230.0, 260.0, 300.0, 350.0, 240.0];
        let fitted = FittedModel::fit(x.view(), y.view()).unwrap();
        let formula = Formula::from_model(&fitted);

        let probes = array![[900.0, 1.0], [1750.0, 3.0], [4000.0, 7.0], [0.0, 0.0]];
        let standardized = fitted.predict(probes.view()).unwrap();
        for (row, expected) in probes.rows().into_iter().zip(standardized.iter()) {
            let row = row.to_vec();
            assert!((formula.predict(&row) - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn single_feature_slope_and_intercept() {
        // y = 50 + 0.1*x
        let x = array![[1000.0], [2000.0], [3000.0]];
        let y = array![150.0, 250.0, 350.0];
        let formula = Formula::from_model(&FittedModel::fit(x.view(), y.view()).unwrap());
        assert!((formula.coefficients[0] - 0.1).abs() < 1e-9);
        assert!((formula.intercept - 50.0).abs() < 1e-6);
    }

    #[test]
    fn render_uses_readable_names_and_signs() {
        let formula = Formula {
            intercept: 12.0,
            coefficients: vec![0.11, -5.2],
        };
        let text = formula.render(
            &["square_footage".into(), "bedrooms".into()],
            "price_thousands",
        );
        assert_eq!(
            text,
            "Price Thousands = 12.0000 + 0.1100 x Square Footage - 5.2000 x Bedrooms"
        );
    }

    #[test]
    fn humanize_title_cases_words() {
        assert_eq!(humanize("square_footage"), "Square Footage");
        assert_eq!(humanize("bedrooms"), "Bedrooms");
    }
}
