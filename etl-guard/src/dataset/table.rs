//! Owned, column-oriented table.

use super::{Dataset, Value};
use crate::prelude::*;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// A dataset that owns its columns.
///
/// Columns keep their insertion order. Lookup by name goes through a hash
/// index, so `has_column` and `column` are constant time. Construction
/// rejects ragged columns and duplicate names, so a `Table` is always
/// consistent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Vec<Value>>,
    index: HashMap<String, usize>,
    rows: usize,
}

impl Table {
    /// Creates a builder for assembling a table column by column.
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    /// Creates a table with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a table from `(name, values)` pairs.
    pub fn try_new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut values = Vec::new();
        let mut index = HashMap::new();
        let mut rows = None;

        for (name, column) in columns {
            let name = name.into();
            match rows {
                None => rows = Some(column.len()),
                Some(expected) if expected != column.len() => {
                    return Err(GuardError::invalid_dataset(format!(
                        "column '{name}' has {} rows, expected {expected}",
                        column.len()
                    )));
                }
                Some(_) => {}
            }
            if index.insert(name.clone(), names.len()).is_some() {
                return Err(GuardError::invalid_dataset(format!(
                    "duplicate column '{name}'"
                )));
            }
            names.push(name);
            values.push(column);
        }

        Ok(Self {
            names,
            columns: values,
            index,
            rows: rows.unwrap_or(0),
        })
    }

    /// Creates a table from rows of JSON objects.
    ///
    /// Columns appear in the order their keys are first seen. A key that is
    /// absent from a row yields a missing value in that row.
    pub fn from_json_rows(rows: &[serde_json::Value]) -> Result<Self> {
        let mut names: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for (i, row) in rows.iter().enumerate() {
            let object = row.as_object().ok_or_else(|| {
                GuardError::invalid_dataset(format!("row {i} is not a JSON object"))
            })?;
            for key in object.keys() {
                if seen.insert(key.as_str()) {
                    names.push(key.clone());
                }
            }
        }

        let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); names.len()];
        for row in rows {
            // Every row was checked to be an object above.
            if let Some(object) = row.as_object() {
                for (name, column) in names.iter().zip(columns.iter_mut()) {
                    column.push(object.get(name).map_or(Value::Null, Value::from_json));
                }
            }
        }

        let mut table = Self::try_new(names.into_iter().zip(columns))?;
        table.rows = rows.len();
        Ok(table)
    }

    /// Returns the number of columns.
    pub fn num_columns(&self) -> usize {
        self.names.len()
    }

    /// Returns a copy of this table with one more column.
    pub fn with_column(&self, name: impl Into<String>, values: Vec<Value>) -> Result<Self> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(GuardError::invalid_dataset(format!(
                "duplicate column '{name}'"
            )));
        }
        let unshaped = self.names.is_empty() && self.rows == 0;
        if !unshaped && values.len() != self.rows {
            return Err(GuardError::invalid_dataset(format!(
                "column '{name}' has {} rows, expected {}",
                values.len(),
                self.rows
            )));
        }

        let mut table = self.clone();
        table.rows = values.len();
        table.index.insert(name.clone(), table.names.len());
        table.names.push(name);
        table.columns.push(values);
        Ok(table)
    }

    /// Returns a copy of this table without the named column.
    ///
    /// The row count is kept even when the last column is removed.
    pub fn without_column(&self, name: &str) -> Self {
        let mut table = self.clone();
        if let Some(i) = table.index.remove(name) {
            table.names.remove(i);
            table.columns.remove(i);
            table.index = table
                .names
                .iter()
                .enumerate()
                .map(|(i, n)| (n.clone(), i))
                .collect();
        }
        table
    }
}

impl Dataset for Table {
    fn column_names(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn column(&self, name: &str) -> Option<Cow<'_, [Value]>> {
        self.index
            .get(name)
            .map(|&i| Cow::Borrowed(self.columns[i].as_slice()))
    }

    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_len(&self, name: &str) -> Option<usize> {
        self.index.get(name).map(|&i| self.columns[i].len())
    }
}

/// Builder for [`Table`].
#[derive(Debug, Default)]
pub struct TableBuilder {
    columns: Vec<(String, Vec<Value>)>,
}

impl TableBuilder {
    /// Appends a column.
    pub fn column<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.columns
            .push((name.into(), values.into_iter().map(Into::into).collect()));
        self
    }

    /// Builds the table, validating that all columns have the same length.
    pub fn build(self) -> Result<Table> {
        Table::try_new(self.columns)
    }
}
