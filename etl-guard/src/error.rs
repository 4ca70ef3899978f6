//! Error types for etl-guard.
//!
//! All fallible operations in the crate return [`GuardError`]. Rule-level
//! failures (a check evaluating to `false`) are never errors; they are part
//! of the returned [`CheckResults`](crate::core::CheckResults). Errors are
//! reserved for structurally malformed input and for the loading layers.

use thiserror::Error;

/// The main error type for etl-guard.
#[derive(Error, Debug)]
pub enum GuardError {
    /// The rule configuration is structurally malformed.
    ///
    /// Raised for value ranges that are not a well-formed `(min, max)` pair,
    /// null-percentage thresholds outside `[0, 100]` and unparsable
    /// configuration documents.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The dataset violates the tabular contract.
    ///
    /// Raised when columns report different row counts, when a column name
    /// appears twice, or when record batches disagree on their schema.
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from data source operations.
    #[error("Data source error: {message}")]
    DataSource {
        /// Type of data source (e.g., "CSV", "Parquet", "JSON")
        source_type: String,
        /// Detailed error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, GuardError>`.
pub type Result<T> = std::result::Result<T, GuardError>;

impl GuardError {
    /// Creates a new invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Creates a new invalid dataset error.
    pub fn invalid_dataset(message: impl Into<String>) -> Self {
        Self::InvalidDataset(message.into())
    }

    /// Creates a new data source error.
    pub fn data_source(source_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new data source error with a source error.
    pub fn data_source_with_source(
        source_type: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Returns true for errors caused by malformed caller input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            GuardError::InvalidConfiguration(_) | GuardError::InvalidDataset(_)
        )
    }
}

impl From<serde_json::Error> for GuardError {
    fn from(err: serde_json::Error) -> Self {
        GuardError::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<GuardError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.with_context(|| msg.to_string())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let msg = f();
            match e.into() {
                GuardError::InvalidConfiguration(inner) => {
                    GuardError::InvalidConfiguration(format!("{msg}: {inner}"))
                }
                GuardError::InvalidDataset(inner) => {
                    GuardError::InvalidDataset(format!("{msg}: {inner}"))
                }
                GuardError::Internal(inner) => GuardError::Internal(format!("{msg}: {inner}")),
                other => GuardError::Internal(format!("{msg}: {other}")),
            }
        })
    }
}
