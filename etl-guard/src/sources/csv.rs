//! CSV file source.

use super::{ensure_files_exist, expand_globs, file_extension, require_paths, DataSource};
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::arrow::datatypes::Schema;
use datafusion::prelude::{CsvReadOptions, SessionContext};
use std::sync::Arc;
use tracing::{info, instrument};

/// Options for configuring CSV file reading.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Whether the CSV file has a header row
    pub has_header: bool,
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Escape character (default: None)
    pub escape: Option<u8>,
    /// Comment prefix (lines starting with this are ignored)
    pub comment: Option<u8>,
    /// Schema to use (if None, will be inferred)
    pub schema: Option<Arc<Schema>>,
    /// Maximum records to read for schema inference
    pub schema_infer_max_records: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            quote: b'"',
            escape: None,
            comment: None,
            schema: None,
            schema_infer_max_records: 1000,
        }
    }
}

/// A CSV file data source with schema inference.
///
/// ```rust,no_run
/// use etl_guard::sources::{CsvOptions, CsvSource};
///
/// # async fn example() -> etl_guard::prelude::Result<()> {
/// let source = CsvSource::new("data/customers.csv")?;
///
/// let options = CsvOptions {
///     delimiter: b'\t',
///     ..Default::default()
/// };
/// let source = CsvSource::with_options("data/customers.tsv", options)?;
///
/// let source = CsvSource::from_glob("data/customers_*.csv")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CsvSource {
    paths: Vec<String>,
    options: CsvOptions,
}

impl CsvSource {
    /// Creates a new CSV source from a single file path.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        Self::with_options(path, CsvOptions::default())
    }

    /// Creates a new CSV source with custom options.
    pub fn with_options(path: impl Into<String>, options: CsvOptions) -> Result<Self> {
        Ok(Self {
            paths: vec![path.into()],
            options,
        })
    }

    /// Creates a CSV source from multiple file paths.
    ///
    /// All files must share one schema.
    pub fn from_paths(paths: Vec<String>) -> Result<Self> {
        Ok(Self {
            paths: require_paths(paths)?,
            options: CsvOptions::default(),
        })
    }

    /// Creates a CSV source from a glob pattern.
    pub fn from_glob(pattern: impl Into<String>) -> Result<Self> {
        Self::from_paths(expand_globs(&[pattern.into()])?)
    }

    /// Sets custom options for this CSV source.
    pub fn with_custom_options(mut self, options: CsvOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the file paths of this source.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}

#[async_trait]
impl DataSource for CsvSource {
    #[instrument(skip(self, ctx), fields(
        table.name = %table_name,
        source.type = "csv",
        source.files = self.paths.len(),
        csv.delimiter = %self.options.delimiter as char,
        csv.has_header = self.options.has_header
    ))]
    async fn register(&self, ctx: &SessionContext, table_name: &str) -> Result<()> {
        info!(
            table.name = %table_name,
            source.type = "csv",
            source.paths = ?self.paths,
            "Registering CSV data source"
        );
        ensure_files_exist("CSV", &self.paths)?;

        let extension = file_extension(&self.paths[0]);
        let mut read_options = CsvReadOptions::new()
            .has_header(self.options.has_header)
            .delimiter(self.options.delimiter)
            .quote(self.options.quote)
            .file_extension(&extension)
            .schema_infer_max_records(self.options.schema_infer_max_records);

        if let Some(escape) = self.options.escape {
            read_options = read_options.escape(escape);
        }
        if let Some(comment) = self.options.comment {
            read_options = read_options.comment(comment);
        }
        if let Some(schema) = &self.options.schema {
            read_options = read_options.schema(schema);
        }

        let df = ctx
            .read_csv(self.paths.clone(), read_options)
            .await
            .map_err(|e| {
                GuardError::data_source_with_source(
                    "CSV",
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
            [path] => format!("CSV file: {path}"),
            paths => format!("CSV files: {} files", paths.len()),
        }
    }
}
