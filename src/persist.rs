//! Saving and loading fitted models.
//!
//! Two files are written per model:
//! * a bincode artifact holding the [`FittedModel`] (coefficients and scaler
//!   together), which is all that is needed to reload it;
//! * a pretty-printed JSON document with the de-scaled formula, column names
//!   and metrics, for people to read.
//!
//! Both are written to a sibling `.tmp` file first and renamed into place,
//! so a crash never leaves a half-written file under the final name.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::ModelError;
use crate::regression::{FittedModel, Formula, ModelResults};

const ARTIFACT_TAG: &str = "housing-regression/linear";
const ARTIFACT_VERSION: u32 = 2;

#[derive(Serialize, Deserialize)]
struct ModelArtifact {
    tag: String,
    version: u32,
    /// Column order the coefficients refer to.
    feature_names: Vec<String>,
    target_name: String,
    model: FittedModel,
}

/// Human-readable companion document. Not needed to reload a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    pub feature_names: Vec<String>,
    pub target_name: String,
    pub train_r2: f64,
    pub test_r2: f64,
    pub train_rmse: f64,
    pub test_rmse: f64,
}

impl ModelMetadata {
    pub fn from_results(results: &ModelResults, feature_names: &[String], target_name: &str) -> Self {
        let formula = Formula::from_model(&results.model);
        Self {
            intercept: formula.intercept,
            coefficients: formula.coefficients,
            feature_names: feature_names.to_vec(),
            target_name: target_name.to_string(),
            train_r2: results.train.r2,
            test_r2: results.test.r2,
            train_rmse: results.train.rmse,
            test_rmse: results.test.rmse,
        }
    }
}

/// A model read back from disk plus whatever metadata was found.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub model: FittedModel,
    pub feature_names: Vec<String>,
    pub target_name: String,
    /// Empty when no metadata file was given or it does not exist.
    pub metadata: Map<String, JsonValue>,
}

impl LoadedModel {
    /// Fail unless the model was trained on exactly these features, in this
    /// order, against this target.
    pub fn ensure_columns(&self, features: &[String], target: &str) -> Result<(), ModelError> {
        if self.feature_names == features && self.target_name == target {
            return Ok(());
        }
        Err(ModelError::ColumnMismatch {
            trained_features: self.feature_names.clone(),
            trained_target: self.target_name.clone(),
            requested_features: features.to_vec(),
            requested_target: target.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

pub fn save_model(
    results: &ModelResults,
    feature_names: &[String],
    target_name: &str,
    model_path: &Path,
    metadata_path: &Path,
) -> Result<(), ModelError> {
    let artifact = ModelArtifact {
        tag: ARTIFACT_TAG.to_string(),
        version: ARTIFACT_VERSION,
        feature_names: feature_names.to_vec(),
        target_name: target_name.to_string(),
        model: results.model.clone(),
    };
    let bytes = bincode::serialize(&artifact).map_err(ModelError::Encode)?;
    write_atomic(model_path, &bytes)?;

    let metadata = ModelMetadata::from_results(results, feature_names, target_name);
    let json = serde_json::to_vec_pretty(&metadata).map_err(ModelError::EncodeMetadata)?;
    write_atomic(metadata_path, &json)?;

    log::info!("Model saved to {}", model_path.display());
    log::info!("Model metadata saved to {}", metadata_path.display());
    Ok(())
}

/// Create parent directories, write to `<path>.tmp`, then rename over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ModelError> {
    let write_err = |source: std::io::Error| ModelError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(write_err)?;
    }

    let tmp = tmp_path(path);
    if let Err(source) = fs::write(&tmp, bytes).and_then(|_| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(write_err(source));
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load a model artifact and, optionally, its metadata.
///
/// A missing or undecodable model file is an error. A metadata path that is
/// `None` or does not exist yields empty metadata; an existing metadata file
/// that is not a JSON object is an error.
pub fn load_model(model_path: &Path, metadata_path: Option<&Path>) -> Result<LoadedModel, ModelError> {
    if !model_path.is_file() {
        return Err(ModelError::NotFound {
            path: model_path.to_path_buf(),
        });
    }

    let bytes = fs::read(model_path).map_err(|source| ModelError::Read {
        path: model_path.to_path_buf(),
        source,
    })?;
    let corrupt = |reason: String| ModelError::Corrupt {
        path: model_path.to_path_buf(),
        reason,
    };

    let artifact: ModelArtifact =
        bincode::deserialize(&bytes).map_err(|e| corrupt(e.to_string()))?;
    if artifact.tag != ARTIFACT_TAG {
        return Err(corrupt(format!("unexpected artifact tag '{}'", artifact.tag)));
    }
    if artifact.version != ARTIFACT_VERSION {
        return Err(corrupt(format!(
            "unsupported artifact version {}",
            artifact.version
        )));
    }
    artifact.model.check().map_err(corrupt)?;
    if artifact.feature_names.len() != artifact.model.n_features() {
        return Err(corrupt(format!(
            "{} feature names for {} coefficients",
            artifact.feature_names.len(),
            artifact.model.n_features()
        )));
    }
    log::info!("Model loaded from {}", model_path.display());

    let metadata = match metadata_path {
        Some(path) if path.is_file() => {
            let metadata = load_metadata(path)?;
            log::info!("Model metadata loaded from {}", path.display());
            metadata
        }
        Some(path) => {
            log::debug!("No metadata at {}", path.display());
            Map::new()
        }
        None => Map::new(),
    };

    Ok(LoadedModel {
        model: artifact.model,
        feature_names: artifact.feature_names,
        target_name: artifact.target_name,
        metadata,
    })
}

fn load_metadata(path: &Path) -> Result<Map<String, JsonValue>, ModelError> {
    let text = fs::read_to_string(path).map_err(|source| ModelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ModelError::CorruptMetadata {
        path: path.to_path_buf(),
        source,
    })
}
