//! Stage composition: load → clean → select → split → fit → evaluate.
//!
//! Every function returns the umbrella [`Error`] so callers can map a failure
//! to its exit code without inspecting the stage it came from.

use std::path::Path;

use ndarray::{Array1, Array2};

use crate::config::PipelineConfig;
use crate::data::{load_table, preprocess, train_test_split, NumericTable, SplitDataset};
use crate::error::{DataError, Result};
use crate::persist::{self, LoadedModel};
use crate::regression::{evaluate_split, FittedModel, ModelResults};

/// Split data together with the results computed on it.
#[derive(Debug, Clone)]
pub struct TrainingRun {
    pub split: SplitDataset,
    pub results: ModelResults,
}

/// Load `path` and clean it with the configured required columns.
pub fn load_clean(path: &Path, config: &PipelineConfig) -> Result<NumericTable> {
    let options = config.cleaning();
    let table = load_table(path, &options.required_columns)?;
    let cleaned = preprocess(&table, &options);
    if cleaned.is_empty() {
        log::warn!("No rows left after cleaning {}", path.display());
    } else {
        log::info!("{} of {} rows kept after cleaning", cleaned.len(), table.len());
    }
    Ok(cleaned)
}

/// Feature matrix and target vector for the configured columns.
pub fn select(table: &NumericTable, config: &PipelineConfig) -> Result<(Array2<f64>, Array1<f64>)> {
    let selected = table
        .select(&config.feature_columns, &config.target_column)
        .map_err(|columns| DataError::MissingColumns { columns })?;
    Ok(selected)
}

/// Split, fit a fresh model on the training partition and evaluate both partitions.
pub fn train(table: &NumericTable, config: &PipelineConfig) -> Result<TrainingRun> {
    let (x, y) = select(table, config)?;
    let split = train_test_split(&x, &y, &config.split())?;
    let model = FittedModel::fit(split.x_train.view(), split.y_train.view())?;
    let results = evaluate_split(&split, model)?;
    Ok(TrainingRun { split, results })
}

/// Load a saved model and check it was trained on the configured columns.
pub fn load_model(
    model_path: &Path,
    metadata_path: &Path,
    config: &PipelineConfig,
) -> Result<LoadedModel> {
    let loaded = persist::load_model(model_path, Some(metadata_path))?;
    loaded.ensure_columns(&config.feature_columns, &config.target_column)?;
    Ok(loaded)
}

/// Split the same way as [`train`] but evaluate an already fitted model.
pub fn evaluate_loaded(
    table: &NumericTable,
    model: FittedModel,
    config: &PipelineConfig,
) -> Result<TrainingRun> {
    let (x, y) = select(table, config)?;
    let split = train_test_split(&x, &y, &config.split())?;
    let results = evaluate_split(&split, model)?;
    Ok(TrainingRun { split, results })
}
