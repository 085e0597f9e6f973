use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Data-processing failures (loading, cleaning, splitting, prediction input)
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DataError {
    #[error("file does not exist: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("required columns missing: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("error loading data from {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("error loading data from {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("error loading data from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("test fraction must lie strictly between 0 and 1, got {0}")]
    InvalidSplitFraction(f64),

    #[error("error making predictions: {0}")]
    Prediction(String),
}

// ---------------------------------------------------------------------------
// Model-operation failures (save / load of persisted artifacts)
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model file does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("error writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error encoding model: {0}")]
    Encode(#[source] bincode::Error),

    #[error("error encoding metadata: {0}")]
    EncodeMetadata(#[source] serde_json::Error),

    #[error("corrupt model file {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error(
        "model was trained on [{}] -> {trained_target}, but [{}] -> {requested_target} was requested",
        trained_features.join(", "),
        requested_features.join(", ")
    )]
    ColumnMismatch {
        trained_features: Vec<String>,
        trained_target: String,
        requested_features: Vec<String>,
        requested_target: String,
    },

    #[error("corrupt metadata file {}: {source}", path.display())]
    CorruptMetadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Fitting / evaluation failures
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum FitError {
    #[error("cannot {0} on an empty set of rows")]
    EmptyInput(&'static str),

    #[error("no feature columns to fit")]
    NoFeatures,

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("least-squares solver failed: {0}")]
    Solver(String),
}

// ---------------------------------------------------------------------------
// Umbrella error + process exit codes
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum Error {
    #[error("data processing error: {0}")]
    Data(#[from] DataError),

    #[error("model operation error: {0}")]
    Model(#[from] ModelError),

    #[error("model fitting error: {0}")]
    Fit(#[from] FitError),
}

/// Exit code for anything that is neither a data nor a model-operation error.
pub const EXIT_UNCLASSIFIED: u8 = 3;

impl Error {
    /// Process exit code for this error category.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Data(_) => 1,
            Error::Model(_) => 2,
            Error::Fit(_) => EXIT_UNCLASSIFIED,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_category() {
        let data = Error::from(DataError::FileNotFound {
            path: PathBuf::from("missing.csv"),
        });
        let model = Error::from(ModelError::NotFound {
            path: PathBuf::from("missing.bin"),
        });
        let fit = Error::from(FitError::NoFeatures);

        assert_eq!(data.exit_code(), 1);
        assert_eq!(model.exit_code(), 2);
        assert_eq!(fit.exit_code(), EXIT_UNCLASSIFIED);
    }

    #[test]
    fn missing_columns_message_names_columns() {
        let err = DataError::MissingColumns {
            columns: vec!["bedrooms".into(), "price_thousands".into()],
        };
        assert_eq!(
            err.to_string(),
            "required columns missing: bedrooms, price_thousands"
        );
    }
}
