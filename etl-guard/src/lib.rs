//! # etl-guard - Business-Rule Validation for ETL Outputs
//!
//! etl-guard checks a tabular dataset against a declarative set of business
//! rules and reports, per rule, whether the data passed. It is meant to sit
//! at the end of an ETL stage: load or transform your data, hand it to a
//! [`RuleEvaluator`](core::RuleEvaluator), and decide what to do with the
//! [`ValidationReport`](core::ValidationReport).
//!
//! ## Quick Start
//!
//! ```rust
//! use etl_guard::prelude::*;
//!
//! # fn example() -> Result<()> {
//! let rules = RuleConfiguration::from_json_str(r#"{
//!     "required_columns": ["customer_id", "email"],
//!     "critical_columns": ["customer_id", "email"],
//!     "min_row_count": 2,
//!     "max_null_percentage": {"email": 50.0},
//!     "value_ranges": {"age": [18, 80]},
//!     "unique_columns": ["customer_id"]
//! }"#)?;
//!
//! let customers = Table::builder()
//!     .column("customer_id", vec![1, 2, 3])
//!     .column("email", vec![Some("a@example.com"), None, Some("c@example.com")])
//!     .column("age", vec![34, 51, 27])
//!     .build()?;
//!
//! let report = RuleEvaluator::new(rules)?.evaluate(&customers)?;
//! assert!(report.is_success());
//! assert_eq!(report.completeness.get("email_null_check"), Some(true));
//! # Ok(())
//! # }
//! ```
//!
//! ## Rules
//!
//! | Rule | Check key | Passes when |
//! |---|---|---|
//! | `required_columns` | `has_column_<col>` | the column exists |
//! | `min_row_count` | `meets_min_row_count` | rows >= minimum |
//! | `critical_columns` + `max_null_percentage` | `<col>_null_check` | missing % <= threshold (default 0) |
//! | `value_ranges` | `<col>_range_check` | every non-missing value is in `[min, max]` |
//! | `unique_columns` | `<col>_uniqueness_check` | no non-missing value repeats |
//!
//! Rules that name a column the dataset does not have are skipped, except
//! `required_columns`, whose whole point is to report absence.
//!
//! ## Architecture
//!
//! - **`dataset`**: the [`Dataset`](dataset::Dataset) trait plus an owned
//!   table and an arrow-backed table
//! - **`config`**: rule configuration, loadable from JSON
//! - **`core`**: evaluator, check keys, results and reports
//! - **`checkers`**: the completeness and quality checkers
//! - **`sources`**: CSV, Parquet and JSON loaders built on DataFusion
//! - **`formatters`**: JSON and human-readable report output
//! - **`logging`**: `tracing` configuration and subscriber setup

pub mod checkers;
pub mod config;
pub mod core;
pub mod dataset;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod sources;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;
