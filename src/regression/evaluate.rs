use ndarray::{Array1, ArrayView1, ArrayView2};

use super::linear::FittedModel;
use super::metrics::{r2_score, root_mean_squared_error};
use crate::data::SplitDataset;
use crate::error::FitError;

/// Predictions and fit quality on one partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub predictions: Array1<f64>,
    pub r2: f64,
    pub rmse: f64,
}

/// Everything produced by one fit/evaluate cycle. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResults {
    pub model: FittedModel,
    pub train: Evaluation,
    pub test: Evaluation,
}

/// Predict with the stored standardization and score against `y`.
/// Inputs are not modified.
pub fn evaluate(
    model: &FittedModel,
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
) -> Result<Evaluation, FitError> {
    if x.nrows() == 0 {
        return Err(FitError::EmptyInput("evaluate a model"));
    }
    let predictions = model.predict(x)?;
    let r2 = r2_score(y, predictions.view())?;
    let rmse = root_mean_squared_error(y, predictions.view())?;
    Ok(Evaluation {
        predictions,
        r2,
        rmse,
    })
}

/// Evaluate `model` on both partitions of `data`.
pub fn evaluate_split(data: &SplitDataset, model: FittedModel) -> Result<ModelResults, FitError> {
    let train = evaluate(&model, data.x_train.view(), data.y_train.view())?;
    let test = evaluate(&model, data.x_test.view(), data.y_test.view())?;

    log::info!(
        "Model evaluation complete: R2 (train): {:.4}, R2 (test): {:.4}",
        train.r2,
        test.r2
    );

    Ok(ModelResults { model, train, test })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn evaluation_on_training_rows() {
        let x = array![[1000.0], [1200.0], [1500.0], [1800.0], [2200.0]];
        let y = array![200.0, 230.0, 260.0, 300.0, 350.0];
        let model = FittedModel::fit(x.view(), y.view()).unwrap();

        let eval = evaluate(&model, x.view(), y.view()).unwrap();
        assert!(eval.r2 > 0.9);
        assert_eq!(eval.predictions.len(), 5);
        for (p, t) in eval.predictions.iter().zip(y.iter()) {
            assert!((p - t).abs() < 10.0, "prediction {p} too far from {t}");
        }
    }

    #[test]
    fn empty_partition_fails_clearly() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![1.0, 2.0, 3.0];
        let model = FittedModel::fit(x.view(), y.view()).unwrap();

        let split = SplitDataset {
            x_train: x.clone(),
            x_test: ndarray::Array2::zeros((0, 1)),
            y_train: y.clone(),
            y_test: Array1::zeros(0),
        };
        assert!(matches!(
            evaluate_split(&split, model),
            Err(FitError::EmptyInput(_))
        ));
    }
}
