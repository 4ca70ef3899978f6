//! Value-level quality checks.
//!
//! - `<col>_range_check`: every non-missing value of the column lies within
//!   its configured inclusive range
//! - `<col>_uniqueness_check`: no non-missing value of the column occurs
//!   twice
//!
//! Missing values never fail either check. Columns named in the
//! configuration but absent from the dataset are skipped without an entry.
//! Booleans are compared as 0 and 1. A range column holding any other
//! non-numeric value fails its range check.

use crate::config::{RuleConfiguration, ValueRange};
use crate::core::{CheckKey, CheckResults, RuleChecker};
use crate::dataset::{Dataset, Value};
use crate::logging::LogConfig;
use crate::prelude::*;
use std::collections::HashSet;
use tracing::{instrument, warn, Level};

/// Checks value ranges and uniqueness.
#[derive(Debug, Clone, Default)]
pub struct QualityChecker {
    log_config: LogConfig,
}

impl QualityChecker {
    /// Creates a checker with the default logging configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a checker with a custom logging configuration.
    pub fn with_log_config(log_config: LogConfig) -> Self {
        Self { log_config }
    }

    fn check_range(&self, column: &str, values: &[Value], range: &ValueRange) -> bool {
        let scan = RangeScan::run(values, range);

        let warn_enabled = self.log_config.enabled(Level::WARN);
        if let Some(value) = scan.first_non_numeric.filter(|_| warn_enabled) {
            warn!(
                checker.name = %self.name(),
                check.column = %column,
                value.kind = value.kind(),
                value.sample = %self.log_config.truncate(&value.to_string()),
                result.non_numeric = scan.non_numeric,
                "Non-numeric value in range-checked column"
            );
        }

        let passed = scan.out_of_range == 0 && scan.non_numeric == 0;
        crate::log_check!(
            self.log_config,
            check.key = %CheckKey::RangeCheck(column),
            check.passed = passed,
            rules.range = %range,
            result.out_of_range = scan.out_of_range,
            "Range check"
        );
        passed
    }

    fn check_uniqueness(&self, column: &str, values: &[Value]) -> bool {
        let duplicate = first_duplicate(values);
        let passed = duplicate.is_none();
        crate::log_check!(
            self.log_config,
            check.key = %CheckKey::UniquenessCheck(column),
            check.passed = passed,
            result.duplicate = %duplicate
                .map(|v| self.log_config.truncate(&v.to_string()))
                .unwrap_or_default(),
            "Uniqueness check"
        );
        passed
    }
}

/// Outcome of scanning a column against a range.
#[derive(Debug, Default)]
struct RangeScan<'a> {
    out_of_range: usize,
    non_numeric: usize,
    first_non_numeric: Option<&'a Value>,
}

impl<'a> RangeScan<'a> {
    fn run(values: &'a [Value], range: &ValueRange) -> Self {
        let mut scan = Self::default();
        for value in values.iter().filter(|v| !v.is_missing()) {
            match range_operand(value) {
                Some(v) if range.contains(v) => {}
                Some(_) => scan.out_of_range += 1,
                None => {
                    scan.non_numeric += 1;
                    scan.first_non_numeric.get_or_insert(value);
                }
            }
        }
        scan
    }
}

/// Numeric view of a cell for range comparison.
fn range_operand(value: &Value) -> Option<f64> {
    match value {
        Value::Boolean(b) => Some(f64::from(u8::from(*b))),
        other => other.as_f64(),
    }
}

/// Returns the first value that repeats an earlier non-missing value.
fn first_duplicate(values: &[Value]) -> Option<&Value> {
    let mut seen = HashSet::with_capacity(values.len());
    for value in values {
        if let Some(key) = value.distinct_key() {
            if !seen.insert(key) {
                return Some(value);
            }
        }
    }
    None
}

impl RuleChecker for QualityChecker {
    fn name(&self) -> &str {
        "quality"
    }

    #[instrument(skip(self, dataset, config), fields(
        checker.name = %self.name(),
        data.rows = dataset.row_count(),
        rules.ranges = config.value_ranges().len(),
        rules.unique = config.unique_columns().len()
    ))]
    fn check(&self, dataset: &dyn Dataset, config: &RuleConfiguration) -> Result<CheckResults> {
        let mut results = CheckResults::new();

        for (column, range) in config.value_ranges() {
            let Some(values) = dataset.column(column) else {
                crate::perf_debug!(
                    self.log_config,
                    checker.name = %self.name(),
                    check.column = %column,
                    skip.reason = "Column not present",
                    "Skipping range check"
                );
                continue;
            };
            let passed = self.check_range(column, &values, range);
            results.record(CheckKey::RangeCheck(column), passed);
        }

        for column in config.unique_columns() {
            let Some(values) = dataset.column(column) else {
                crate::perf_debug!(
                    self.log_config,
                    checker.name = %self.name(),
                    check.column = %column,
                    skip.reason = "Column not present",
                    "Skipping uniqueness check"
                );
                continue;
            };
            let passed = self.check_uniqueness(column, &values);
            results.record(CheckKey::UniquenessCheck(column), passed);
        }

        crate::perf_debug!(
            self.log_config,
            checker.name = %self.name(),
            checks.total = results.len(),
            checks.failed = results.failed().len(),
            "Quality checks evaluated"
        );
        Ok(results)
    }
}
