//! File loaders that materialize data into an [`ArrowTable`].
//!
//! Each source registers itself with a DataFusion [`SessionContext`], so it
//! can also be used as the input of a SQL transformation before validation.
//! For the common case of "load the file, then validate it",
//! [`DataSource::load`] does both steps in one call.
//!
//! ```rust,no_run
//! use etl_guard::prelude::*;
//! use etl_guard::sources::{CsvSource, DataSource};
//!
//! # async fn example() -> Result<()> {
//! let customers = CsvSource::new("data/customers.csv")?.load().await?;
//! let rules = RuleConfiguration::from_json_file("rules.json")?;
//! let report = RuleEvaluator::new(rules)?.evaluate(&customers)?;
//! # Ok(())
//! # }
//! ```

use crate::dataset::ArrowTable;
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::arrow::datatypes::Schema;
use datafusion::prelude::SessionContext;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

mod csv;
mod json;
mod parquet;

pub use csv::{CsvOptions, CsvSource};
pub use json::{JsonFormatType, JsonOptions, JsonSource};
pub use parquet::{ParquetOptions, ParquetSource};

/// Name under which [`DataSource::load`] registers the source.
pub const DEFAULT_TABLE_NAME: &str = "data";

/// A data source that can be registered with a DataFusion context.
#[async_trait]
pub trait DataSource: Debug + Send + Sync {
    /// Registers this data source with the given session context.
    async fn register(&self, ctx: &SessionContext, table_name: &str) -> Result<()>;

    /// Returns the explicitly configured schema, if any.
    fn schema(&self) -> Option<&Arc<Schema>>;

    /// Returns a human-readable description of this data source.
    fn description(&self) -> String;

    /// Reads the whole source into memory.
    async fn load(&self) -> Result<ArrowTable> {
        let ctx = SessionContext::new();
        self.register(&ctx, DEFAULT_TABLE_NAME).await?;
        ArrowTable::from_context(&ctx, DEFAULT_TABLE_NAME).await
    }
}

/// Expands glob patterns into file paths.
pub(crate) fn expand_globs(patterns: &[String]) -> Result<Vec<String>> {
    use glob::glob;

    let mut paths = Vec::new();
    for pattern in patterns {
        let matches = glob(pattern).map_err(|e| {
            GuardError::invalid_configuration(format!("Invalid glob pattern '{pattern}': {e}"))
        })?;

        for entry in matches {
            let path = entry.map_err(|e| GuardError::Io(e.into()))?;
            if path.is_file() {
                if let Some(path_str) = path.to_str() {
                    paths.push(path_str.to_string());
                }
            }
        }
    }

    if paths.is_empty() {
        return Err(GuardError::data_source(
            "file",
            "No files found matching glob patterns",
        ));
    }

    paths.sort();
    Ok(paths)
}

/// Fails with a data source error if any of `paths` does not exist.
pub(crate) fn ensure_files_exist(source_type: &str, paths: &[String]) -> Result<()> {
    match paths.iter().find(|p| !Path::new(p).exists()) {
        Some(missing) => Err(GuardError::data_source(
            source_type,
            format!("File not found: {missing}"),
        )),
        None => Ok(()),
    }
}

/// Returns the extension of `path` including the leading dot, or an empty
/// string if it has none.
pub(crate) fn file_extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

pub(crate) fn require_paths(paths: Vec<String>) -> Result<Vec<String>> {
    if paths.is_empty() {
        return Err(GuardError::invalid_configuration(
            "At least one path must be provided",
        ));
    }
    Ok(paths)
}
