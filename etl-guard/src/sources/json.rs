//! JSON and NDJSON file source.

use super::{ensure_files_exist, expand_globs, file_extension, require_paths, DataSource};
use crate::prelude::*;
use arrow::json::reader::{infer_json_schema_from_iterator, ReaderBuilder};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use datafusion::arrow::datatypes::Schema;
use datafusion::prelude::{NdJsonReadOptions, SessionContext};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Format type for JSON files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonFormatType {
    /// Line-delimited JSON (one JSON object per line)
    NdJson,
    /// A single JSON array of objects
    Json,
}

impl JsonFormatType {
    /// Detects the format from the file extension.
    ///
    /// `.ndjson` and `.jsonl` are line-delimited, everything else is
    /// treated as a JSON array.
    pub fn from_path(path: &str) -> Self {
        let lower = path.to_lowercase();
        if lower.ends_with(".ndjson") || lower.ends_with(".jsonl") {
            Self::NdJson
        } else {
            Self::Json
        }
    }
}

/// Options for configuring JSON file reading.
#[derive(Debug, Clone)]
pub struct JsonOptions {
    /// JSON format type
    pub format: JsonFormatType,
    /// Schema to use (if None, will be inferred)
    pub schema: Option<Arc<Schema>>,
    /// Maximum records to read for schema inference
    pub schema_infer_max_records: usize,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            format: JsonFormatType::NdJson,
            schema: None,
            schema_infer_max_records: 1000,
        }
    }
}

/// A JSON or NDJSON file data source.
///
/// ```rust,no_run
/// use etl_guard::sources::{DataSource, JsonSource};
///
/// # async fn example() -> etl_guard::prelude::Result<()> {
/// // Format detected from the extension
/// let events = JsonSource::new("data/events.jsonl")?.load().await?;
/// let customers = JsonSource::new("data/customers.json")?.load().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JsonSource {
    paths: Vec<String>,
    options: JsonOptions,
}

impl JsonSource {
    /// Creates a new JSON source, detecting the format from the path.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let options = JsonOptions {
            format: JsonFormatType::from_path(&path),
            ..Default::default()
        };
        Self::with_options(path, options)
    }

    /// Creates a new JSON source with custom options.
    pub fn with_options(path: impl Into<String>, options: JsonOptions) -> Result<Self> {
        Ok(Self {
            paths: vec![path.into()],
            options,
        })
    }

    /// Creates a JSON source from multiple file paths.
    ///
    /// The format is detected from the first path.
    pub fn from_paths(paths: Vec<String>) -> Result<Self> {
        let paths = require_paths(paths)?;
        let options = JsonOptions {
            format: JsonFormatType::from_path(&paths[0]),
            ..Default::default()
        };
        Ok(Self { paths, options })
    }

    /// Creates a JSON source from a glob pattern.
    pub fn from_glob(pattern: impl Into<String>) -> Result<Self> {
        Self::from_paths(expand_globs(&[pattern.into()])?)
    }

    /// Sets custom options for this JSON source.
    pub fn with_custom_options(mut self, options: JsonOptions) -> Self {
        self.options = options;
        self
    }

    async fn register_ndjson(&self, ctx: &SessionContext, table_name: &str) -> Result<()> {
        let extension = file_extension(&self.paths[0]);
        let mut read_options = NdJsonReadOptions {
            schema_infer_max_records: self.options.schema_infer_max_records,
            ..Default::default()
        }
        .file_extension(&extension);
        if let Some(schema) = &self.options.schema {
            read_options = read_options.schema(schema);
        }

        let df = ctx
            .read_json(self.paths.clone(), read_options)
            .await
            .map_err(|e| self.read_error(Box::new(e)))?;
        ctx.register_table(table_name, df.into_view())?;
        Ok(())
    }

    async fn register_array(&self, ctx: &SessionContext, table_name: &str) -> Result<()> {
        let mut rows = Vec::new();
        for path in &self.paths {
            let text = tokio::fs::read_to_string(path).await?;
            let document: serde_json::Value =
                serde_json::from_str(&text).map_err(|e| self.read_error(Box::new(e)))?;
            match document {
                serde_json::Value::Array(values) => rows.extend(values),
                _ => {
                    return Err(GuardError::data_source(
                        "JSON",
                        format!("{path} does not contain a JSON array"),
                    ))
                }
            }
        }
        debug!(source.rows = rows.len(), "Parsed JSON array document");

        let schema = match &self.options.schema {
            Some(schema) => Arc::clone(schema),
            None => Arc::new(infer_json_schema_from_iterator(
                rows.iter()
                    .take(self.options.schema_infer_max_records)
                    .map(Ok),
            )?),
        };

        let mut decoder = ReaderBuilder::new(Arc::clone(&schema)).build_decoder()?;
        decoder.serialize(&rows)?;
        let batch = decoder
            .flush()?
            .unwrap_or_else(|| RecordBatch::new_empty(schema));

        ctx.register_batch(table_name, batch)?;
        Ok(())
    }

    fn read_error(&self, source: Box<dyn std::error::Error + Send + Sync>) -> GuardError {
        GuardError::data_source_with_source(
            "JSON",
            format!("Failed to read {}", self.description()),
            source,
        )
    }
}

#[async_trait]
impl DataSource for JsonSource {
    #[instrument(skip(self, ctx), fields(
        table.name = %table_name,
        source.type = "json",
        source.files = self.paths.len(),
        json.format = ?self.options.format
    ))]
    async fn register(&self, ctx: &SessionContext, table_name: &str) -> Result<()> {
        info!(
            table.name = %table_name,
            source.type = "json",
            source.paths = ?self.paths,
            "Registering JSON data source"
        );
        ensure_files_exist("JSON", &self.paths)?;

        match self.options.format {
            JsonFormatType::NdJson => self.register_ndjson(ctx, table_name).await,
            JsonFormatType::Json => self.register_array(ctx, table_name).await,
        }
    }

    fn schema(&self) -> Option<&Arc<Schema>> {
        self.options.schema.as_ref()
    }

    fn description(&self) -> String {
        match self.paths.as_slice() {
            [path] => format!("JSON file: {path}"),
            paths => format!("JSON files: {} files", paths.len()),
        }
    }
}
