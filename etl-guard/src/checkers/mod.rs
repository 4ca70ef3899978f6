//! Rule checkers and their one-shot entry points.
//!
//! [`validate_completeness`] and [`validate_data_quality`] validate both the
//! configuration and the dataset before running, so they are safe to call
//! with untrusted input. [`RuleEvaluator`](crate::core::RuleEvaluator) does
//! the configuration part once at construction instead.
//!
//! ```rust
//! use etl_guard::checkers::validate_completeness;
//! use etl_guard::config::RuleConfiguration;
//! use etl_guard::dataset::Table;
//!
//! # fn example() -> etl_guard::prelude::Result<()> {
//! let table = Table::builder()
//!     .column("customer_id", vec![1, 2, 3])
//!     .build()?;
//! let rules = RuleConfiguration::builder()
//!     .required_columns(["customer_id", "email"])
//!     .min_row_count(3)
//!     .build()?;
//!
//! let results = validate_completeness(&table, &rules)?;
//! assert!(results["has_column_customer_id"]);
//! assert!(!results["has_column_email"]);
//! assert!(results["meets_min_row_count"]);
//! # Ok(())
//! # }
//! ```

mod completeness;
mod quality;

pub use completeness::CompletenessChecker;
pub use quality::QualityChecker;

use crate::config::RuleConfiguration;
use crate::core::{CheckResults, RuleChecker};
use crate::dataset::Dataset;
use crate::prelude::*;

/// Runs the completeness checks: required columns, row count and null
/// percentages of critical columns.
pub fn validate_completeness(
    dataset: &dyn Dataset,
    config: &RuleConfiguration,
) -> Result<CheckResults> {
    run_checked(&CompletenessChecker::new(), dataset, config)
}

/// Runs the quality checks: value ranges and uniqueness.
pub fn validate_data_quality(
    dataset: &dyn Dataset,
    config: &RuleConfiguration,
) -> Result<CheckResults> {
    run_checked(&QualityChecker::new(), dataset, config)
}

fn run_checked(
    checker: &dyn RuleChecker,
    dataset: &dyn Dataset,
    config: &RuleConfiguration,
) -> Result<CheckResults> {
    config.validate()?;
    dataset.ensure_consistent()?;
    checker.check(dataset, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Table, Value};
    use std::borrow::Cow;

    #[derive(Debug)]
    struct ShortColumn;

    impl Dataset for ShortColumn {
        fn column_names(&self) -> Vec<&str> {
            vec!["id", "email"]
        }

        fn has_column(&self, name: &str) -> bool {
            matches!(name, "id" | "email")
        }

        fn column(&self, name: &str) -> Option<Cow<'_, [Value]>> {
            match name {
                "id" => Some(Cow::Owned(vec![Value::Integer(1), Value::Integer(2)])),
                "email" => Some(Cow::Owned(vec![Value::Null])),
                _ => None,
            }
        }

        fn row_count(&self) -> usize {
            2
        }
    }

    #[test]
    fn test_ragged_dataset_is_rejected() {
        let config = RuleConfiguration::builder()
            .critical_column("email")
            .build()
            .unwrap();

        let err = validate_completeness(&ShortColumn, &config).unwrap_err();
        assert!(matches!(err, GuardError::InvalidDataset(_)));

        let err = validate_data_quality(&ShortColumn, &config).unwrap_err();
        assert!(matches!(err, GuardError::InvalidDataset(_)));
    }

    #[test]
    fn test_malformed_configuration_is_rejected() {
        let config: RuleConfiguration = serde_json::from_value(serde_json::json!({
            "value_ranges": {"age": [80.0, 18.0]}
        }))
        .unwrap();
        let table = Table::builder().column("age", vec![30]).build().unwrap();

        let err = validate_data_quality(&table, &config).unwrap_err();
        assert!(matches!(err, GuardError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_empty_configuration() {
        let config = RuleConfiguration::default();
        let table = Table::builder().column("age", vec![30]).build().unwrap();

        let completeness = validate_completeness(&table, &config).unwrap();
        assert_eq!(completeness.len(), 1);
        assert!(completeness["meets_min_row_count"]);

        assert!(validate_data_quality(&table, &config).unwrap().is_empty());
    }
}
