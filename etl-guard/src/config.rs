//! Declarative business rules.
//!
//! A [`RuleConfiguration`] describes what a dataset must satisfy. It is built
//! once by the caller, validated, and then shared read-only by every
//! evaluation that uses it.
//!
//! Configurations can be assembled in code:
//!
//! ```rust
//! use etl_guard::config::RuleConfiguration;
//!
//! # fn example() -> etl_guard::prelude::Result<()> {
//! let rules = RuleConfiguration::builder()
//!     .required_columns(["customer_id", "name", "email"])
//!     .critical_columns(["customer_id", "email"])
//!     .min_row_count(100)
//!     .max_null_percentage("email", 2.0)
//!     .value_range("age", 18.0, 120.0)
//!     .unique_columns(["customer_id", "email"])
//!     .build()?;
//!
//! assert_eq!(rules.null_threshold("email"), 2.0);
//! assert_eq!(rules.null_threshold("customer_id"), 0.0);
//! # Ok(())
//! # }
//! ```
//!
//! or loaded from JSON, where every field is optional:
//!
//! ```rust
//! use etl_guard::config::RuleConfiguration;
//!
//! # fn example() -> etl_guard::prelude::Result<()> {
//! let rules = RuleConfiguration::from_json_str(
//!     r#"{
//!         "required_columns": ["customer_id"],
//!         "value_ranges": {"age": [18, 120], "total_spent": [0, 50000]}
//!     }"#,
//! )?;
//! assert_eq!(rules.min_row_count(), 0);
//! # Ok(())
//! # }
//! ```

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use tracing::{debug, instrument};

/// An inclusive numeric interval `[min, max]`.
///
/// Serialized as a two element array, `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    /// Creates a range, rejecting NaN bounds and `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        let range = Self { min, max };
        range.validate("range")?;
        Ok(range)
    }

    /// Returns the lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Returns the upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Returns true if `value` lies within the bounds, both ends included.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, column: &str) -> Result<()> {
        if self.min.is_nan() || self.max.is_nan() {
            return Err(GuardError::invalid_configuration(format!(
                "value range for '{column}' has a NaN bound"
            )));
        }
        if self.min > self.max {
            return Err(GuardError::invalid_configuration(format!(
                "value range for '{column}' has min {} greater than max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl From<(f64, f64)> for ValueRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

impl From<ValueRange> for (f64, f64) {
    fn from(range: ValueRange) -> Self {
        (range.min, range.max)
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// The complete set of business rules applied to a dataset.
///
/// Sets and maps are ordered, so every walk over the rules (and therefore
/// logging and report output) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfiguration {
    required_columns: BTreeSet<String>,
    critical_columns: BTreeSet<String>,
    min_row_count: usize,
    max_null_percentage: BTreeMap<String, f64>,
    value_ranges: BTreeMap<String, ValueRange>,
    unique_columns: BTreeSet<String>,
}

impl RuleConfiguration {
    /// Creates a builder.
    pub fn builder() -> RuleConfigurationBuilder {
        RuleConfigurationBuilder::default()
    }

    /// Parses and validates a JSON rule document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            GuardError::invalid_configuration(format!("cannot parse rule configuration: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON rule document from disk.
    #[instrument(skip_all)]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config =
            Self::from_json_str(&text).with_context(|| format!("{}", path.display()))?;

        debug!(
            config.path = %path.display(),
            config.rules = config.rule_count(),
            "Loaded rule configuration"
        );
        Ok(config)
    }

    /// Checks the configuration for structural errors.
    ///
    /// Fails with [`GuardError::InvalidConfiguration`] if a value range is not a
    /// well-formed `(min, max)` pair or a null percentage lies outside `[0, 100]`.
    pub fn validate(&self) -> Result<()> {
        for (column, range) in &self.value_ranges {
            range.validate(column)?;
        }
        for (column, pct) in &self.max_null_percentage {
            if pct.is_nan() || !(0.0..=100.0).contains(pct) {
                return Err(GuardError::invalid_configuration(format!(
                    "max null percentage for '{column}' must lie in [0, 100], got {pct}"
                )));
            }
        }
        Ok(())
    }

    /// Columns that must exist.
    pub fn required_columns(&self) -> &BTreeSet<String> {
        &self.required_columns
    }

    /// Columns subject to null-rate checks.
    pub fn critical_columns(&self) -> &BTreeSet<String> {
        &self.critical_columns
    }

    /// Lower bound on the number of rows.
    pub fn min_row_count(&self) -> usize {
        self.min_row_count
    }

    /// Explicit null-percentage thresholds.
    pub fn max_null_percentage(&self) -> &BTreeMap<String, f64> {
        &self.max_null_percentage
    }

    /// Returns the null-percentage threshold for a column, 0 when unspecified.
    pub fn null_threshold(&self, column: &str) -> f64 {
        self.max_null_percentage.get(column).copied().unwrap_or(0.0)
    }

    /// Inclusive value ranges per column.
    pub fn value_ranges(&self) -> &BTreeMap<String, ValueRange> {
        &self.value_ranges
    }

    /// Columns that must not contain duplicates.
    pub fn unique_columns(&self) -> &BTreeSet<String> {
        &self.unique_columns
    }

    /// Upper bound on the number of checks this configuration can produce.
    pub fn rule_count(&self) -> usize {
        self.required_columns.len()
            + 1
            + self.critical_columns.len()
            + self.value_ranges.len()
            + self.unique_columns.len()
    }
}

/// Builder for [`RuleConfiguration`].
#[derive(Debug, Default)]
pub struct RuleConfigurationBuilder {
    config: RuleConfiguration,
}

impl RuleConfigurationBuilder {
    /// Adds a required column.
    pub fn required_column(mut self, column: impl Into<String>) -> Self {
        self.config.required_columns.insert(column.into());
        self
    }

    /// Adds several required columns.
    pub fn required_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .required_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Adds a critical column.
    pub fn critical_column(mut self, column: impl Into<String>) -> Self {
        self.config.critical_columns.insert(column.into());
        self
    }

    /// Adds several critical columns.
    pub fn critical_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .critical_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Sets the minimum row count.
    pub fn min_row_count(mut self, rows: usize) -> Self {
        self.config.min_row_count = rows;
        self
    }

    /// Sets the null-percentage threshold of a column.
    pub fn max_null_percentage(mut self, column: impl Into<String>, percentage: f64) -> Self {
        self.config
            .max_null_percentage
            .insert(column.into(), percentage);
        self
    }

    /// Sets the inclusive value range of a column.
    pub fn value_range(mut self, column: impl Into<String>, min: f64, max: f64) -> Self {
        self.config
            .value_ranges
            .insert(column.into(), ValueRange { min, max });
        self
    }

    /// Adds a unique column.
    pub fn unique_column(mut self, column: impl Into<String>) -> Self {
        self.config.unique_columns.insert(column.into());
        self
    }

    /// Adds several unique columns.
    pub fn unique_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .unique_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<RuleConfiguration> {
        self.config.validate()?;
        Ok(self.config)
    }
}
