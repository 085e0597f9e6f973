use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::{ConfigError, PipelineConfig};

/// Linear regression analysis on housing data.
#[derive(Debug, Clone, Parser)]
#[command(name = "housing-regression", version, about)]
pub struct Cli {
    /// Path to the input table (.csv, .tsv or .json) [default: from config]
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Skip writing the chart data file (there is no interactive plot to suppress)
    #[arg(long)]
    pub no_plot: bool,

    /// Save the trained model and its metadata
    #[arg(long, conflicts_with = "load_model")]
    pub save_model: bool,

    /// Load a previously trained model instead of training a new one
    #[arg(long)]
    pub load_model: bool,

    /// Only make predictions with the loaded model, no evaluation
    #[arg(long, requires = "load_model")]
    pub predict_only: bool,

    /// Path to load/save the model [default: from config]
    #[arg(long)]
    pub model_path: Option<PathBuf>,

    /// Path to load/save the model metadata [default: from config]
    #[arg(long)]
    pub metadata_path: Option<PathBuf>,

    /// JSON file overriding the built-in configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Comma-separated feature columns, e.g. `square_footage` for a simple regression
    #[arg(long, value_delimiter = ',', requires = "target")]
    pub features: Option<Vec<String>>,

    /// Target column name
    #[arg(long, requires = "features")]
    pub target: Option<String>,

    /// Outlier threshold in standard deviations
    #[arg(long, allow_negative_numbers = true)]
    pub outlier_threshold: Option<f64>,

    /// Predict one house, e.g. `square_footage=1500,bedrooms=3`
    #[arg(long, value_name = "NAME=VALUE,...")]
    pub predict: Option<String>,
}

/// What a run does, derived from the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Train { save: bool },
    Evaluate,
    PredictOnly,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        match (self.load_model, self.predict_only) {
            (true, true) => Mode::PredictOnly,
            (true, false) => Mode::Evaluate,
            (false, _) => Mode::Train {
                save: self.save_model,
            },
        }
    }

    /// Defaults, then the config file, then flags.
    pub fn resolve_config(&self) -> Result<PipelineConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };
        if let (Some(features), Some(target)) = (&self.features, &self.target) {
            config = config.with_features(features.clone(), target.clone());
        }
        if let Some(threshold) = self.outlier_threshold {
            config.outlier_threshold = threshold;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn input_path<'a>(&'a self, config: &'a PipelineConfig) -> &'a Path {
        self.file.as_deref().unwrap_or(&config.default_input)
    }

    pub fn model_path<'a>(&'a self, config: &'a PipelineConfig) -> &'a Path {
        self.model_path.as_deref().unwrap_or(&config.default_model_path)
    }

    pub fn metadata_path<'a>(&'a self, config: &'a PipelineConfig) -> &'a Path {
        self.metadata_path
            .as_deref()
            .unwrap_or(&config.default_metadata_path)
    }
}
