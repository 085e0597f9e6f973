use ndarray::{Array1, Array2};

use crate::data::NumericTable;
use crate::error::DataError;
use crate::regression::FittedModel;

/// Predict the target for every row of a cleaned table.
pub fn make_predictions(
    table: &NumericTable,
    features: &[String],
    model: &FittedModel,
) -> Result<Array1<f64>, DataError> {
    let x = table.features(features).map_err(|missing| {
        DataError::Prediction(format!("feature columns missing: {}", missing.join(", ")))
    })?;
    model
        .predict(x.view())
        .map_err(|e| DataError::Prediction(e.to_string()))
}

/// Parse `name=value,name=value` into one row ordered like `features`.
///
/// Every feature must be given exactly once and nothing else may appear.
pub fn parse_prediction_input(input: &str, features: &[String]) -> Result<Vec<f64>, DataError> {
    let mut row: Vec<Option<f64>> = vec![None; features.len()];

    for pair in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| DataError::Prediction(format!("expected name=value, got '{pair}'")))?;
        let key = key.trim();
        let idx = features
            .iter()
            .position(|f| f == key)
            .ok_or_else(|| DataError::Prediction(format!("unknown feature '{key}'")))?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| DataError::Prediction(format!("'{}' is not a number", value.trim())))?;
        if !value.is_finite() {
            return Err(DataError::Prediction(format!("'{key}' must be finite")));
        }
        if row[idx].replace(value).is_some() {
            return Err(DataError::Prediction(format!("feature '{key}' given twice")));
        }
    }

    row.iter()
        .zip(features)
        .map(|(v, name)| v.ok_or_else(|| DataError::Prediction(format!("missing feature '{name}'"))))
        .collect()
}

/// Predict a single row of raw feature values.
pub fn predict_one(model: &FittedModel, row: &[f64]) -> Result<f64, DataError> {
    let x = Array2::from_shape_vec((1, row.len()), row.to_vec())
        .map_err(|e| DataError::Prediction(e.to_string()))?;
    let prediction = model
        .predict(x.view())
        .map_err(|e| DataError::Prediction(e.to_string()))?;
    Ok(prediction[0])
}
