//! Dataset view over arrow record batches.

use super::{Dataset, Value};
use crate::prelude::*;
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    ArrowPrimitiveType, DataType, Decimal128Type, Float32Type, Float64Type, Int16Type, Int32Type,
    Int64Type, Int8Type, SchemaRef, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use datafusion::prelude::SessionContext;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// A dataset backed by one or more arrow record batches sharing a schema.
///
/// Column values are converted to [`Value`]s on request:
///
/// - signed and unsigned integers become `Integer` (`UInt64` values beyond
///   `i64::MAX` become `Float`)
/// - `Float32`, `Float64` and `Decimal128` become `Float`
/// - `Boolean` becomes `Boolean`, string types become `Text`
/// - every other type is rendered with arrow's display formatter into `Text`
///
/// Arrow nulls become `Value::Null`.
///
/// # Examples
///
/// ```rust
/// use arrow::array::{Int64Array, StringArray};
/// use arrow::datatypes::{DataType, Field, Schema};
/// use arrow::record_batch::RecordBatch;
/// use etl_guard::dataset::{ArrowTable, Dataset};
/// use std::sync::Arc;
///
/// # fn example() -> etl_guard::prelude::Result<()> {
/// let schema = Arc::new(Schema::new(vec![
///     Field::new("customer_id", DataType::Int64, false),
///     Field::new("email", DataType::Utf8, true),
/// ]));
/// let batch = RecordBatch::try_new(
///     schema,
///     vec![
///         Arc::new(Int64Array::from(vec![1, 2])),
///         Arc::new(StringArray::from(vec![Some("a@example.com"), None])),
///     ],
/// )?;
///
/// let table = ArrowTable::from_batch(batch)?;
/// assert_eq!(table.row_count(), 2);
/// assert!(table.has_column("email"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ArrowTable {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
    index: HashMap<String, usize>,
    rows: usize,
}

impl ArrowTable {
    /// Creates a table from batches that must all match `schema`.
    ///
    /// Batches are compared with the schema by field name and data type.
    pub fn try_new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Result<Self> {
        let mut index = HashMap::with_capacity(schema.fields().len());
        for (i, field) in schema.fields().iter().enumerate() {
            if index.insert(field.name().clone(), i).is_some() {
                return Err(GuardError::invalid_dataset(format!(
                    "duplicate column '{}'",
                    field.name()
                )));
            }
        }

        for (i, batch) in batches.iter().enumerate() {
            let batch_schema = batch.schema();
            let aligned = batch_schema.fields().len() == schema.fields().len()
                && batch_schema
                    .fields()
                    .iter()
                    .zip(schema.fields().iter())
                    .all(|(a, b)| a.name() == b.name() && a.data_type() == b.data_type());
            if !aligned {
                return Err(GuardError::invalid_dataset(format!(
                    "record batch {i} does not match the table schema"
                )));
            }

            for (column, field) in batch.columns().iter().zip(schema.fields().iter()) {
                if needs_display(field.data_type()) {
                    ArrayFormatter::try_new(column.as_ref(), &display_options()).map_err(|e| {
                        GuardError::invalid_dataset(format!(
                            "column '{}' has unsupported type {}: {e}",
                            field.name(),
                            field.data_type()
                        ))
                    })?;
                }
            }
        }

        let rows = batches.iter().map(RecordBatch::num_rows).sum();
        Ok(Self {
            schema,
            batches,
            index,
            rows,
        })
    }

    /// Creates a table from a single batch.
    pub fn from_batch(batch: RecordBatch) -> Result<Self> {
        Self::try_new(batch.schema(), vec![batch])
    }

    /// Creates a table from batches, taking the schema from the first one.
    pub fn from_batches(batches: Vec<RecordBatch>) -> Result<Self> {
        let schema = batches
            .first()
            .map(RecordBatch::schema)
            .ok_or_else(|| {
                GuardError::invalid_dataset("at least one record batch is required")
            })?;
        Self::try_new(schema, batches)
    }

    /// Collects a table registered in a DataFusion session into memory.
    #[instrument(skip(ctx), fields(table.name = %table_name))]
    pub async fn from_context(ctx: &SessionContext, table_name: &str) -> Result<Self> {
        let df = ctx.table(table_name).await?;
        let schema = df.schema().inner().clone();
        let batches = df.collect().await?;

        debug!(
            table.name = %table_name,
            data.batches = batches.len(),
            data.columns = schema.fields().len(),
            "Collected table into memory"
        );

        Self::try_new(schema, batches)
    }

    /// Returns the arrow schema.
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Returns the underlying batches.
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }
}

impl Dataset for ArrowTable {
    fn column_names(&self) -> Vec<&str> {
        self.schema
            .fields()
            .iter()
            .map(|field| field.name().as_str())
            .collect()
    }

    fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn column(&self, name: &str) -> Option<Cow<'_, [Value]>> {
        let idx = *self.index.get(name)?;
        let mut values = Vec::with_capacity(self.rows);
        for batch in &self.batches {
            append_values(batch.column(idx), &mut values);
        }
        Some(Cow::Owned(values))
    }

    fn row_count(&self) -> usize {
        self.rows
    }

    // Record batches cannot hold ragged columns.
    fn column_len(&self, name: &str) -> Option<usize> {
        self.index.get(name).map(|_| self.rows)
    }
}

fn display_options() -> FormatOptions<'static> {
    FormatOptions::default().with_display_error(true)
}

fn needs_display(data_type: &DataType) -> bool {
    !matches!(
        data_type,
        DataType::Null
            | DataType::Boolean
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
            | DataType::Decimal128(_, _)
            | DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Utf8View
    )
}

fn append_values(array: &ArrayRef, out: &mut Vec<Value>) {
    match array.data_type() {
        DataType::Null => out.extend(std::iter::repeat(Value::Null).take(array.len())),
        DataType::Boolean => out.extend(
            array
                .as_boolean()
                .iter()
                .map(|v| v.map_or(Value::Null, Value::Boolean)),
        ),
        DataType::Int8 => append_primitive::<Int8Type>(array, out, |v| Value::Integer(v.into())),
        DataType::Int16 => append_primitive::<Int16Type>(array, out, |v| Value::Integer(v.into())),
        DataType::Int32 => append_primitive::<Int32Type>(array, out, |v| Value::Integer(v.into())),
        DataType::Int64 => append_primitive::<Int64Type>(array, out, Value::Integer),
        DataType::UInt8 => append_primitive::<UInt8Type>(array, out, |v| Value::Integer(v.into())),
        DataType::UInt16 => {
            append_primitive::<UInt16Type>(array, out, |v| Value::Integer(v.into()))
        }
        DataType::UInt32 => {
            append_primitive::<UInt32Type>(array, out, |v| Value::Integer(v.into()))
        }
        DataType::UInt64 => append_primitive::<UInt64Type>(array, out, |v| {
            i64::try_from(v).map_or(Value::Float(v as f64), Value::Integer)
        }),
        DataType::Float32 => {
            append_primitive::<Float32Type>(array, out, |v| Value::Float(v.into()))
        }
        DataType::Float64 => append_primitive::<Float64Type>(array, out, Value::Float),
        DataType::Decimal128(_, scale) => {
            let divisor = 10f64.powi(i32::from(*scale));
            append_primitive::<Decimal128Type>(array, out, |v| Value::Float(v as f64 / divisor))
        }
        DataType::Utf8 => out.extend(array.as_string::<i32>().iter().map(text)),
        DataType::LargeUtf8 => out.extend(array.as_string::<i64>().iter().map(text)),
        DataType::Utf8View => out.extend(array.as_string_view().iter().map(text)),
        _ => append_display(array, out),
    }
}

fn append_primitive<T: ArrowPrimitiveType>(
    array: &ArrayRef,
    out: &mut Vec<Value>,
    convert: impl Fn(T::Native) -> Value,
) {
    out.extend(
        array
            .as_primitive::<T>()
            .iter()
            .map(|v| v.map_or(Value::Null, &convert)),
    );
}

fn text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |s| Value::Text(s.to_string()))
}

fn append_display(array: &ArrayRef, out: &mut Vec<Value>) {
    let options = display_options();
    match ArrayFormatter::try_new(array.as_ref(), &options) {
        Ok(formatter) => {
            let nulls = array.logical_nulls();
            out.extend((0..array.len()).map(|row| {
                if nulls.as_ref().is_some_and(|n| n.is_null(row)) {
                    Value::Null
                } else {
                    Value::Text(formatter.value(row).to_string())
                }
            }));
        }
        Err(e) => {
            warn!(
                data.type = %array.data_type(),
                error = %e,
                "Cannot render column values, treating them as missing"
            );
            out.extend(std::iter::repeat(Value::Null).take(array.len()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{BooleanArray, Date32Array, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("score", DataType::Float64, true),
            Field::new("email", DataType::Utf8, true),
        ]))
    }

    fn batch(ids: Vec<i64>, scores: Vec<Option<f64>>, emails: Vec<Option<&str>>) -> RecordBatch {
        RecordBatch::try_new(
            schema(),
            vec![
                Arc::new(Int64Array::from(ids)),
                Arc::new(Float64Array::from(scores)),
                Arc::new(StringArray::from(emails)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_values_are_converted() {
        let table = ArrowTable::from_batch(batch(
            vec![1, 2, 3],
            vec![Some(1.5), None, Some(f64::NAN)],
            vec![Some("a@example.com"), None, Some("c@example.com")],
        ))
        .unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_names(), vec!["id", "score", "email"]);

        let ids = table.column("id").unwrap();
        assert_eq!(
            ids.to_vec(),
            vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]
        );

        let scores = table.column("score").unwrap();
        assert_eq!(scores[0], Value::Float(1.5));
        assert_eq!(scores[1], Value::Null);
        assert!(scores[2].is_missing());

        let emails = table.column("email").unwrap();
        assert_eq!(emails[1], Value::Null);
        assert!(table.column("missing").is_none());
    }

    #[test]
    fn test_multiple_batches_are_concatenated() {
        let table = ArrowTable::from_batches(vec![
            batch(vec![1, 2], vec![None, None], vec![None, None]),
            batch(vec![3], vec![Some(0.5)], vec![Some("x")]),
        ])
        .unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column("id").unwrap().len(), 3);
        assert_eq!(table.column("email").unwrap()[2], Value::Text("x".into()));
        assert!(table.ensure_consistent().is_ok());
    }

    #[test]
    fn test_mismatched_batches_rejected() {
        let other_schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Utf8, false)]));
        let other = RecordBatch::try_new(
            other_schema,
            vec![Arc::new(StringArray::from(vec!["1"]))],
        )
        .unwrap();

        let err = ArrowTable::try_new(schema(), vec![batch(vec![1], vec![None], vec![None]), other])
            .unwrap_err();
        assert!(matches!(err, GuardError::InvalidDataset(_)));
        assert!(err.to_string().contains("record batch 1"));
    }

    #[test]
    fn test_empty_batch_list_needs_schema() {
        assert!(ArrowTable::from_batches(vec![]).is_err());

        let table = ArrowTable::try_new(schema(), vec![]).unwrap();
        assert_eq!(table.row_count(), 0);
        assert!(table.has_column("id"));
        assert_eq!(table.column("id").unwrap().len(), 0);
    }

    #[test]
    fn test_boolean_and_display_types() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("active", DataType::Boolean, true),
            Field::new("created", DataType::Date32, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(BooleanArray::from(vec![Some(true), None])),
                Arc::new(Date32Array::from(vec![Some(19358), None])),
            ],
        )
        .unwrap();
        let table = ArrowTable::from_batch(batch).unwrap();

        let active = table.column("active").unwrap();
        assert_eq!(active.to_vec(), vec![Value::Boolean(true), Value::Null]);

        let created = table.column("created").unwrap();
        assert_eq!(created[0], Value::Text("2023-01-01".into()));
        assert_eq!(created[1], Value::Null);
    }

    #[tokio::test]
    async fn test_from_context() {
        let ctx = SessionContext::new();
        ctx.register_batch(
            "customers",
            batch(vec![1, 2], vec![Some(10.0), Some(20.0)], vec![Some("a"), Some("b")]),
        )
        .unwrap();

        let table = ArrowTable::from_context(&ctx, "customers").await.unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("score").unwrap()[1], Value::Float(20.0));

        assert!(ArrowTable::from_context(&ctx, "missing").await.is_err());
    }
}
