//! Property-based tests for the business-rule checks.
//!
//! Each property generates a small table with a controlled shape (row count,
//! number of missing values, value spread), computes the expected outcome
//! independently and compares it with what the checkers report.

use etl_guard::checkers::{validate_completeness, validate_data_quality};
use etl_guard::config::RuleConfiguration;
use etl_guard::core::RuleEvaluator;
use etl_guard::dataset::{Dataset, Table, Value};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

/// A single integer column of `rows` values with the first `nulls` missing.
fn column_with_nulls(name: &str, rows: usize, nulls: usize) -> Table {
    let values: Vec<Value> = (0..rows)
        .map(|i| {
            if i < nulls {
                Value::Null
            } else {
                Value::Integer(i as i64)
            }
        })
        .collect();
    Table::try_new([(name, values)]).unwrap()
}

fn arb_cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Null),
        4 => (-50i64..50).prop_map(Value::Integer),
        2 => (-50.0f64..50.0).prop_map(Value::Float),
        2 => "[a-c]{1,2}".prop_map(Value::Text),
    ]
}

fn arb_table() -> impl Strategy<Value = Table> {
    (0usize..40).prop_flat_map(|rows| {
        (
            prop::collection::vec(arb_cell(), rows),
            prop::collection::vec(arb_cell(), rows),
        )
            .prop_map(|(a, b)| Table::try_new([("a", a), ("b", b)]).unwrap())
    })
}

fn arb_rules() -> impl Strategy<Value = RuleConfiguration> {
    (0usize..50, 0.0f64..=100.0, -10.0f64..10.0, 0.0f64..40.0).prop_map(
        |(min_rows, threshold, low, width)| {
            RuleConfiguration::builder()
                .required_columns(["a", "b", "c"])
                .critical_columns(["a", "c"])
                .min_row_count(min_rows)
                .max_null_percentage("a", threshold)
                .value_range("a", low, low + width)
                .unique_columns(["a", "b"])
                .build()
                .unwrap()
        },
    )
}

proptest! {
    /// A critical column passes its null check exactly when the missing share,
    /// as a percentage of all rows, is at or below the threshold.
    #[test]
    fn test_null_check_threshold_property(
        rows in 1usize..500,
        null_share in 0.0f64..=1.0,
        threshold in 0.0f64..=100.0,
    ) {
        let nulls = (rows as f64 * null_share).round() as usize;
        let table = column_with_nulls("v", rows, nulls);
        let config = RuleConfiguration::builder()
            .critical_column("v")
            .max_null_percentage("v", threshold)
            .build()
            .unwrap();

        let results = validate_completeness(&table, &config).unwrap();
        let expected = nulls as f64 * 100.0 / rows as f64 <= threshold;
        prop_assert_eq!(results.get("v_null_check"), Some(expected));
    }

    /// Raising the threshold never turns a passing null check into a failure.
    #[test]
    fn test_null_check_monotonic_in_threshold(
        rows in 1usize..300,
        nulls in 0usize..300,
        low in 0.0f64..=100.0,
        extra in 0.0f64..=100.0,
    ) {
        let nulls = nulls.min(rows);
        let high = (low + extra).min(100.0);
        let table = column_with_nulls("v", rows, nulls);
        let check = |threshold: f64| {
            let config = RuleConfiguration::builder()
                .critical_column("v")
                .max_null_percentage("v", threshold)
                .build()
                .unwrap();
            validate_completeness(&table, &config).unwrap()["v_null_check"]
        };

        if check(low) {
            prop_assert!(check(high));
        }
    }

    /// A fully populated column passes even the strictest threshold.
    #[test]
    fn test_populated_column_passes_at_zero(rows in 0usize..500) {
        let table = column_with_nulls("v", rows, 0);
        let config = RuleConfiguration::builder()
            .critical_column("v")
            .build()
            .unwrap();

        let results = validate_completeness(&table, &config).unwrap();
        prop_assert!(results["v_null_check"]);
    }

    /// The row count check compares the row count with the minimum, inclusively.
    #[test]
    fn test_min_row_count_property(rows in 0usize..300, min_rows in 0usize..300) {
        let table = column_with_nulls("v", rows, 0);
        let config = RuleConfiguration::builder().min_row_count(min_rows).build().unwrap();

        let results = validate_completeness(&table, &config).unwrap();
        prop_assert_eq!(results.len(), 1);
        prop_assert_eq!(results["meets_min_row_count"], rows >= min_rows);
    }

    /// Both range endpoints are accepted, anything strictly outside is not.
    #[test]
    fn test_range_bounds_are_inclusive(
        min in -1000.0f64..1000.0,
        width in 0.0f64..1000.0,
        outside in 0.001f64..100.0,
        below in any::<bool>(),
    ) {
        let max = min + width;
        let config = RuleConfiguration::builder()
            .value_range("x", min, max)
            .build()
            .unwrap();

        let on_bounds = Table::builder().column("x", vec![min, max]).build().unwrap();
        prop_assert!(validate_data_quality(&on_bounds, &config).unwrap()["x_range_check"]);

        let stray = if below { min - outside } else { max + outside };
        let off_bounds = Table::builder().column("x", vec![min, stray]).build().unwrap();
        prop_assert!(!validate_data_quality(&off_bounds, &config).unwrap()["x_range_check"]);
    }

    /// Missing values never affect a range check.
    #[test]
    fn test_range_ignores_missing_values(
        values in prop::collection::vec(prop::option::of(0i64..=10), 0..60),
    ) {
        let config = RuleConfiguration::builder()
            .value_range("x", 0.0, 10.0)
            .build()
            .unwrap();
        let table = Table::builder().column("x", values).build().unwrap();

        prop_assert!(validate_data_quality(&table, &config).unwrap()["x_range_check"]);
    }

    /// The uniqueness check agrees with a set of the non-missing values.
    #[test]
    fn test_uniqueness_matches_distinct_count(
        values in prop::collection::vec(prop::option::of(0i64..30), 0..40),
    ) {
        let present: Vec<i64> = values.iter().flatten().copied().collect();
        let distinct: HashSet<i64> = present.iter().copied().collect();
        let expected = distinct.len() == present.len();

        let config = RuleConfiguration::builder().unique_column("id").build().unwrap();
        let table = Table::builder().column("id", values).build().unwrap();

        let results = validate_data_quality(&table, &config).unwrap();
        prop_assert_eq!(results["id_uniqueness_check"], expected);
    }

    /// Evaluating the same table twice yields identical results.
    #[test]
    fn test_evaluation_is_idempotent(table in arb_table(), rules in arb_rules()) {
        let first_completeness = validate_completeness(&table, &rules).unwrap();
        let first_quality = validate_data_quality(&table, &rules).unwrap();

        prop_assert_eq!(first_completeness, validate_completeness(&table, &rules).unwrap());
        prop_assert_eq!(first_quality, validate_data_quality(&table, &rules).unwrap());
    }

    /// Every configured rule that applies to a present column yields exactly
    /// one entry, and absent columns only show up as presence checks.
    #[test]
    fn test_result_keys_follow_the_rules(table in arb_table(), rules in arb_rules()) {
        let completeness = validate_completeness(&table, &rules).unwrap();
        let quality = validate_data_quality(&table, &rules).unwrap();

        prop_assert!(!completeness["has_column_c"]);
        prop_assert!(completeness["has_column_a"]);
        prop_assert!(completeness.contains_key("a_null_check"));
        prop_assert!(!completeness.contains_key("c_null_check"));
        prop_assert_eq!(completeness.len(), 5);

        let keys: Vec<&str> = quality.iter().map(|(k, _)| k).collect();
        prop_assert_eq!(keys, vec!["a_range_check", "a_uniqueness_check", "b_uniqueness_check"]);
    }

    /// The concurrent evaluation reports the same checks as the sequential one.
    #[test]
    fn test_concurrent_matches_sequential(table in arb_table(), rules in arb_rules()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let evaluator = RuleEvaluator::new(rules).unwrap();
        let sequential = evaluator.evaluate(&table).unwrap();

        let dataset: Arc<dyn Dataset> = Arc::new(table);
        let concurrent = rt
            .block_on(evaluator.evaluate_concurrent(dataset))
            .unwrap();

        prop_assert_eq!(sequential.completeness, concurrent.completeness);
        prop_assert_eq!(sequential.quality, concurrent.quality);
        prop_assert_eq!(sequential.metrics.total_checks, concurrent.metrics.total_checks);
    }
}

#[cfg(test)]
mod edge_case_tests {
    use super::*;

    #[test]
    fn test_empty_rules_yield_only_row_count() {
        let table = column_with_nulls("v", 10, 3);
        let config = RuleConfiguration::default();

        let completeness = validate_completeness(&table, &config).unwrap();
        assert_eq!(completeness.len(), 1);
        assert!(completeness["meets_min_row_count"]);
        assert!(validate_data_quality(&table, &config).unwrap().is_empty());
    }

    #[test]
    fn test_empty_table_null_check_passes() {
        let table = Table::try_new([("v", Vec::<Value>::new())]).unwrap();
        let config = RuleConfiguration::builder()
            .critical_column("v")
            .min_row_count(1)
            .build()
            .unwrap();

        let results = validate_completeness(&table, &config).unwrap();
        assert!(results["v_null_check"]);
        assert!(!results["meets_min_row_count"]);
    }

    #[test]
    fn test_all_null_column() {
        let table = column_with_nulls("v", 20, 20);
        let config = RuleConfiguration::builder()
            .critical_column("v")
            .max_null_percentage("v", 100.0)
            .value_range("v", 0.0, 1.0)
            .unique_column("v")
            .build()
            .unwrap();

        assert!(validate_completeness(&table, &config).unwrap()["v_null_check"]);
        let quality = validate_data_quality(&table, &config).unwrap();
        assert!(quality["v_range_check"]);
        assert!(quality["v_uniqueness_check"]);
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let table = Table::builder()
            .column("v", vec![1.0, f64::NAN, 3.0, 4.0])
            .build()
            .unwrap();
        let config = RuleConfiguration::builder()
            .critical_column("v")
            .max_null_percentage("v", 25.0)
            .value_range("v", 0.0, 5.0)
            .build()
            .unwrap();

        assert!(validate_completeness(&table, &config).unwrap()["v_null_check"]);
        assert!(validate_data_quality(&table, &config).unwrap()["v_range_check"]);
    }

    #[test]
    fn test_integral_float_duplicates_integer() {
        let table = Table::try_new([("id", vec![Value::Integer(7), Value::Float(7.0)])]).unwrap();
        let config = RuleConfiguration::builder().unique_column("id").build().unwrap();

        assert!(!validate_data_quality(&table, &config).unwrap()["id_uniqueness_check"]);
    }
}
