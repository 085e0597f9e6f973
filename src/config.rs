//! Pipeline configuration.
//!
//! A single [`PipelineConfig`] value is built once (defaults, optionally
//! overlaid by a JSON file and command-line flags) and each stage receives
//! only the narrow view it needs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// PipelineConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Input table used when no `--file` is given.
    pub default_input: PathBuf,
    /// Columns that must exist and are coerced, de-nulled and outlier-filtered,
    /// in this order.
    pub required_columns: Vec<String>,
    pub feature_columns: Vec<String>,
    pub target_column: String,
    /// Rows further than this many standard deviations from a column mean are dropped.
    pub outlier_threshold: f64,
    pub test_size: f64,
    pub random_state: u64,
    pub default_model_path: PathBuf,
    pub default_metadata_path: PathBuf,
    pub chart_path: PathBuf,
    /// Samples per axis of the regression-plane mesh.
    pub mesh_grid_size: usize,
    /// Samples along each per-feature regression line.
    pub line_points: usize,
    /// Rows shown in the terminal sample tables.
    pub sample_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_input: PathBuf::from("house_data.csv"),
            required_columns: vec![
                "square_footage".into(),
                "bedrooms".into(),
                "price_thousands".into(),
            ],
            feature_columns: vec!["square_footage".into(), "bedrooms".into()],
            target_column: "price_thousands".into(),
            outlier_threshold: 3.0,
            test_size: 0.2,
            random_state: 42,
            default_model_path: PathBuf::from("models/housing_model.bin"),
            default_metadata_path: PathBuf::from("models/housing_model_metadata.json"),
            chart_path: PathBuf::from("housing_regression_chart.json"),
            mesh_grid_size: 50,
            line_points: 1000,
            sample_rows: 5,
        }
    }
}

/// Options consumed by the cleaner.
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningOptions {
    pub required_columns: Vec<String>,
    pub outlier_threshold: f64,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        PipelineConfig::default().cleaning()
    }
}

/// Options consumed by the splitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitOptions {
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for SplitOptions {
    fn default() -> Self {
        PipelineConfig::default().split()
    }
}

impl PipelineConfig {
    /// Read a JSON config file. Keys that are absent keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PipelineConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the feature/target selection, e.g. to run the single-feature
    /// variant. New names are appended to the required columns.
    pub fn with_features(mut self, features: Vec<String>, target: String) -> Self {
        for name in features.iter().chain(std::iter::once(&target)) {
            if !self.required_columns.contains(name) {
                self.required_columns.push(name.clone());
            }
        }
        self.feature_columns = features;
        self.target_column = target;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feature_columns.is_empty() {
            return Err(ConfigError::Invalid("at least one feature column is required".into()));
        }
        if self.feature_columns.contains(&self.target_column) {
            return Err(ConfigError::Invalid(format!(
                "target column '{}' is also listed as a feature",
                self.target_column
            )));
        }
        if let Some(missing) = self
            .feature_columns
            .iter()
            .chain(std::iter::once(&self.target_column))
            .find(|c| !self.required_columns.contains(c))
        {
            return Err(ConfigError::Invalid(format!(
                "column '{missing}' must be listed in required_columns"
            )));
        }
        if !(self.outlier_threshold > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "outlier_threshold must be positive, got {}",
                self.outlier_threshold
            )));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "test_size must lie strictly between 0 and 1, got {}",
                self.test_size
            )));
        }
        if self.mesh_grid_size < 2 || self.line_points < 2 {
            return Err(ConfigError::Invalid(
                "mesh_grid_size and line_points must both be at least 2".into(),
            ));
        }
        Ok(())
    }

    pub fn cleaning(&self) -> CleaningOptions {
        CleaningOptions {
            required_columns: self.required_columns.clone(),
            outlier_threshold: self.outlier_threshold,
        }
    }

    pub fn split(&self) -> SplitOptions {
        SplitOptions {
            test_fraction: self.test_size,
            seed: self.random_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        PipelineConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "outlier_threshold": 2.5, "random_state": 7 }"#).unwrap();

        let config = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.outlier_threshold, 2.5);
        assert_eq!(config.random_state, 7);
        assert_eq!(config.target_column, "price_thousands");
        assert_eq!(config.split().seed, 7);
    }

    #[test]
    fn target_listed_as_feature_is_rejected() {
        let config = PipelineConfig::default()
            .with_features(vec!["price_thousands".into()], "price_thousands".into());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn with_features_extends_required_columns() {
        let config = PipelineConfig::default()
            .with_features(vec!["lot_size".into()], "price_thousands".into());
        assert!(config.required_columns.contains(&"lot_size".to_string()));
        config.validate().unwrap();
    }

    #[test]
    fn fraction_out_of_range_is_rejected() {
        let config = PipelineConfig {
            test_size: 1.0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
