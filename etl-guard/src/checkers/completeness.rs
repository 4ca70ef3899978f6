//! Structural completeness checks.
//!
//! Three kinds of checks, all driven by the [`RuleConfiguration`]:
//!
//! - `has_column_<col>`: every required column is present
//! - `meets_min_row_count`: the dataset has at least `min_row_count` rows
//! - `<col>_null_check`: the share of missing values in a critical column
//!   stays at or below its threshold (0% when none is configured)
//!
//! A critical column that the dataset does not have produces no null check
//! entry. If the column is also required, its absence already shows up as a
//! failing `has_column_<col>` entry.

use crate::config::RuleConfiguration;
use crate::core::{CheckKey, CheckResults, RuleChecker};
use crate::dataset::{Dataset, Value};
use crate::logging::LogConfig;
use crate::prelude::*;
use tracing::instrument;

/// Checks column presence, row count and null percentages.
#[derive(Debug, Clone, Default)]
pub struct CompletenessChecker {
    log_config: LogConfig,
}

impl CompletenessChecker {
    /// Creates a checker with the default logging configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a checker with a custom logging configuration.
    pub fn with_log_config(log_config: LogConfig) -> Self {
        Self { log_config }
    }
}

/// Percentage of missing values over `rows`.
///
/// An empty dataset has no missing values.
pub(crate) fn null_percentage(values: &[Value], rows: usize) -> f64 {
    if rows == 0 {
        return 0.0;
    }
    let missing = values.iter().filter(|v| v.is_missing()).count();
    missing as f64 * 100.0 / rows as f64
}

impl RuleChecker for CompletenessChecker {
    fn name(&self) -> &str {
        "completeness"
    }

    #[instrument(skip(self, dataset, config), fields(
        checker.name = %self.name(),
        data.rows = dataset.row_count(),
        rules.required = config.required_columns().len(),
        rules.critical = config.critical_columns().len()
    ))]
    fn check(&self, dataset: &dyn Dataset, config: &RuleConfiguration) -> Result<CheckResults> {
        let mut results = CheckResults::new();

        for column in config.required_columns() {
            let key = CheckKey::HasColumn(column);
            let present = dataset.has_column(column);
            crate::log_check!(
                self.log_config,
                check.key = %key,
                check.passed = present,
                "Required column check"
            );
            results.record(key, present);
        }

        let rows = dataset.row_count();
        let enough_rows = rows >= config.min_row_count();
        crate::log_check!(
            self.log_config,
            check.key = %CheckKey::MinRowCount,
            check.passed = enough_rows,
            data.rows = rows,
            rules.min_row_count = config.min_row_count(),
            "Row count check"
        );
        results.record(CheckKey::MinRowCount, enough_rows);

        for column in config.critical_columns() {
            let Some(values) = dataset.column(column) else {
                crate::perf_debug!(
                    self.log_config,
                    checker.name = %self.name(),
                    check.column = %column,
                    skip.reason = "Column not present",
                    "Skipping null check"
                );
                continue;
            };

            let key = CheckKey::NullCheck(column);
            let percentage = null_percentage(&values, rows);
            let threshold = config.null_threshold(column);
            let passed = percentage <= threshold;
            crate::log_check!(
                self.log_config,
                check.key = %key,
                check.passed = passed,
                result.null_percentage = %format!("{percentage:.4}"),
                rules.max_null_percentage = threshold,
                "Null percentage check"
            );
            results.record(key, passed);
        }

        crate::perf_debug!(
            self.log_config,
            checker.name = %self.name(),
            checks.total = results.len(),
            checks.failed = results.failed().len(),
            "Completeness checks evaluated"
        );
        Ok(results)
    }
}
