//! In-memory tabular data as seen by the rule checkers.
//!
//! The checkers never touch a concrete storage format. They see a dataset
//! through the [`Dataset`] trait: an ordered set of named columns, each an
//! ordered sequence of scalar [`Value`]s, all columns sharing one row count.
//!
//! Two implementations ship with the crate:
//!
//! - [`Table`]: owned columns, built by hand or from JSON rows
//! - [`ArrowTable`]: a thin view over arrow record batches, typically the
//!   output of a DataFusion query or one of the [`sources`](crate::sources)
//!
//! ```rust
//! use etl_guard::dataset::{Dataset, Table, Value};
//!
//! # fn example() -> etl_guard::prelude::Result<()> {
//! let table = Table::builder()
//!     .column("customer_id", vec![1, 2, 3])
//!     .column("email", vec![Some("a@example.com"), None, Some("c@example.com")])
//!     .build()?;
//!
//! assert!(table.has_column("email"));
//! assert_eq!(table.row_count(), 3);
//! assert_eq!(table.column("email").unwrap()[1], Value::Null);
//! # Ok(())
//! # }
//! ```

use crate::prelude::*;
use std::borrow::Cow;
use std::fmt::{self, Debug};

mod record_batch;
mod table;

pub use record_batch::ArrowTable;
pub use table::{Table, TableBuilder};

/// A single cell of a dataset.
///
/// `Null` is the missing-value marker. A floating point `NaN` is treated as
/// missing as well, since dataframe producers commonly encode absent floats
/// that way.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Signed integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
}

impl Value {
    /// Returns true if this cell counts as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Returns the numeric view of this value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Returns a short name of the value's kind, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }

    /// Converts a JSON scalar into a cell.
    ///
    /// Arrays and objects are kept as their JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            other => Value::Text(other.to_string()),
        }
    }

    /// Returns the key under which this value is compared for uniqueness.
    ///
    /// Missing values have no key. Integral floats share the key of the
    /// equivalent integer, and `-0.0` shares the key of `0.0`.
    pub(crate) fn distinct_key(&self) -> Option<DistinctKey<'_>> {
        match self {
            Value::Null => None,
            Value::Boolean(b) => Some(DistinctKey::Boolean(*b)),
            Value::Integer(i) => Some(DistinctKey::Integer(*i)),
            Value::Float(f) if f.is_nan() => None,
            Value::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(DistinctKey::Integer(*f as i64))
                } else {
                    Some(DistinctKey::Float(f.to_bits()))
                }
            }
            Value::Text(s) => Some(DistinctKey::Text(s)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Hashable identity of a non-missing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum DistinctKey<'a> {
    Boolean(bool),
    Integer(i64),
    Float(u64),
    Text(&'a str),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Read-only access to a tabular dataset.
///
/// Implementations must offer constant-time lookup of a column by name and
/// linear-time access to a column's values. The checkers never mutate a
/// dataset, and the caller must not mutate it while a check is in flight.
pub trait Dataset: Debug + Send + Sync {
    /// Returns the column names in schema order.
    fn column_names(&self) -> Vec<&str>;

    /// Returns true if a column with this name exists.
    fn has_column(&self, name: &str) -> bool;

    /// Returns the values of a column, or `None` if it does not exist.
    fn column(&self, name: &str) -> Option<Cow<'_, [Value]>>;

    /// Returns the number of rows.
    fn row_count(&self) -> usize;

    /// Returns the number of values stored for a column.
    ///
    /// The default implementation materializes the column. Implementations
    /// that know the length up front should override it.
    fn column_len(&self, name: &str) -> Option<usize> {
        self.column(name).map(|values| values.len())
    }

    /// Verifies that every column has exactly [`row_count`](Self::row_count) values.
    fn ensure_consistent(&self) -> Result<()> {
        let expected = self.row_count();
        for name in self.column_names() {
            let actual = self.column_len(name).ok_or_else(|| {
                GuardError::invalid_dataset(format!(
                    "column '{name}' is listed in the schema but cannot be read"
                ))
            })?;
            if actual != expected {
                return Err(GuardError::invalid_dataset(format!(
                    "column '{name}' has {actual} rows, expected {expected}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct RaggedDataset;

    impl Dataset for RaggedDataset {
        fn column_names(&self) -> Vec<&str> {
            vec!["a", "b"]
        }

        fn has_column(&self, name: &str) -> bool {
            name == "a" || name == "b"
        }

        fn column(&self, name: &str) -> Option<Cow<'_, [Value]>> {
            match name {
                "a" => Some(Cow::Owned(vec![Value::Integer(1), Value::Integer(2)])),
                "b" => Some(Cow::Owned(vec![Value::Integer(1)])),
                _ => None,
            }
        }

        fn row_count(&self) -> usize {
            2
        }
    }

    #[test]
    fn test_missing_values() {
        assert!(Value::Null.is_missing());
        assert!(Value::Float(f64::NAN).is_missing());
        assert!(!Value::Float(0.0).is_missing());
        assert!(!Value::Text(String::new()).is_missing());
        assert!(!Value::Boolean(false).is_missing());
    }

    #[test]
    fn test_numeric_view() {
        assert_eq!(Value::Integer(42).as_f64(), Some(42.0));
        assert_eq!(Value::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::Float(f64::NAN).as_f64(), None);
        assert_eq!(Value::Text("42".into()).as_f64(), None);
        assert_eq!(Value::Boolean(true).as_f64(), None);
    }

    #[test]
    fn test_distinct_keys() {
        assert_eq!(
            Value::Integer(5).distinct_key(),
            Value::Float(5.0).distinct_key()
        );
        assert_eq!(
            Value::Float(-0.0).distinct_key(),
            Value::Float(0.0).distinct_key()
        );
        assert_ne!(
            Value::Float(5.5).distinct_key(),
            Value::Integer(5).distinct_key()
        );
        assert_ne!(
            Value::Text("5".into()).distinct_key(),
            Value::Integer(5).distinct_key()
        );
        assert_eq!(Value::Null.distinct_key(), None);
        assert_eq!(Value::Float(f64::NAN).distinct_key(), None);
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from_json(&serde_json::json!(null)), Value::Null);
        assert_eq!(Value::from_json(&serde_json::json!(7)), Value::Integer(7));
        assert_eq!(Value::from_json(&serde_json::json!(7.25)), Value::Float(7.25));
        assert_eq!(
            Value::from_json(&serde_json::json!("x")),
            Value::Text("x".into())
        );
        assert_eq!(
            Value::from_json(&serde_json::json!([1, 2])),
            Value::Text("[1,2]".into())
        );
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(Some(3)), Value::Integer(3));
        assert_eq!(Value::from(None::<&str>), Value::Null);
    }

    #[test]
    fn test_default_consistency_check_rejects_ragged_columns() {
        let err = RaggedDataset.ensure_consistent().unwrap_err();
        assert!(matches!(err, GuardError::InvalidDataset(_)));
        assert!(err.to_string().contains("column 'b' has 1 rows, expected 2"));
    }
}
