//! Parquet file source.

use super::{ensure_files_exist, expand_globs, file_extension, require_paths, DataSource};
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::arrow::datatypes::Schema;
use datafusion::prelude::{ParquetReadOptions, SessionContext};
use std::sync::Arc;
use tracing::{info, instrument};

/// Options for configuring Parquet file reading.
#[derive(Debug, Clone)]
pub struct ParquetOptions {
    /// Schema to use (if None, will be read from file metadata)
    pub schema: Option<Arc<Schema>>,
    /// Whether to use pruning based on Parquet statistics
    pub enable_pruning: bool,
}

impl Default for ParquetOptions {
    fn default() -> Self {
        Self {
            schema: None,
            enable_pruning: true,
        }
    }
}

/// A Parquet file data source.
///
/// ```rust,no_run
/// use etl_guard::sources::{DataSource, ParquetSource};
///
/// # async fn example() -> etl_guard::prelude::Result<()> {
/// let orders = ParquetSource::from_glob("warehouse/orders/*.parquet")?
///     .load()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ParquetSource {
    paths: Vec<String>,
    options: ParquetOptions,
}

impl ParquetSource {
    /// Creates a new Parquet source from a single file path.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        Self::with_options(path, ParquetOptions::default())
    }

    /// Creates a new Parquet source with custom options.
    pub fn with_options(path: impl Into<String>, options: ParquetOptions) -> Result<Self> {
        Ok(Self {
            paths: vec![path.into()],
            options,
        })
    }

    /// Creates a Parquet source from multiple file paths.
    pub fn from_paths(paths: Vec<String>) -> Result<Self> {
        Ok(Self {
            paths: require_paths(paths)?,
            options: ParquetOptions::default(),
        })
    }

    /// Creates a Parquet source from a glob pattern.
    pub fn from_glob(pattern: impl Into<String>) -> Result<Self> {
        Self::from_paths(expand_globs(&[pattern.into()])?)
    }

    /// Sets custom options for this Parquet source.
    pub fn with_custom_options(mut self, options: ParquetOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl DataSource for ParquetSource {
    #[instrument(skip(self, ctx), fields(
        table.name = %table_name,
        source.type = "parquet",
        source.files = self.paths.len()
    ))]
    async fn register(&self, ctx: &SessionContext, table_name: &str) -> Result<()> {
        info!(
            table.name = %table_name,
            source.type = "parquet",
            source.paths = ?self.paths,
            "Registering Parquet data source"
        );
        ensure_files_exist("Parquet", &self.paths)?;

        let extension = file_extension(&self.paths[0]);
        let mut read_options = ParquetReadOptions {
            file_extension: &extension,
            ..Default::default()
        }
        .parquet_pruning(self.options.enable_pruning);
        if let Some(schema) = &self.options.schema {
            read_options = read_options.schema(schema);
        }

        let df = ctx
            .read_parquet(self.paths.clone(), read_options)
            .await
            .map_err(|e| {
                GuardError::data_source_with_source(
                    "Parquet",
                    format!("Failed to read {}", self.description()),
                    Box::new(e),
                )
            })?;
        ctx.register_table(table_name, df.into_view())?;
        Ok(())
    }

    fn schema(&self) -> Option<&Arc<Schema>> {
        self.options.schema.as_ref()
    }

    fn description(&self) -> String {
        match self.paths.as_slice() {
            [path] => format!("Parquet file: {path}"),
            paths => format!("Parquet files: {} files", paths.len()),
        }
    }
}
