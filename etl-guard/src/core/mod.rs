//! Core evaluation types.
//!
//! ## Overview
//!
//! - **[`RuleEvaluator`]**: runs a validated [`RuleConfiguration`](crate::config::RuleConfiguration)
//!   against datasets
//! - **[`RuleChecker`]**: a group of checks; the crate ships a completeness
//!   and a quality checker in [`checkers`](crate::checkers)
//! - **[`CheckResults`]**: check key to pass/fail map produced by one checker
//! - **[`CheckKey`]**: the stable names of individual checks
//! - **[`ValidationReport`]**: both result groups plus [`ValidationMetrics`]
//!
//! ## Architecture
//!
//! ```text
//! RuleEvaluator (Arc<RuleConfiguration>)
//!     ├── CompletenessChecker ── has_column_*, meets_min_row_count, *_null_check
//!     └── QualityChecker ─────── *_range_check, *_uniqueness_check
//!                 │
//!                 ▼
//!         ValidationReport
//! ```

mod check;
mod checker;
mod evaluator;
mod report;
mod result;

pub use check::CheckKey;
pub use checker::RuleChecker;
pub use evaluator::RuleEvaluator;
pub use report::{ValidationMetrics, ValidationReport};
pub use result::CheckResults;
