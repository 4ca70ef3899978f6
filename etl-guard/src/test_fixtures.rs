//! Seeded sample data and the reference rule set.
//!
//! The customer dataset is deterministic: the same seed always produces the
//! same 1000 rows, and every row satisfies [`business_rules_config`].

use crate::config::RuleConfiguration;
use crate::dataset::{ArrowTable, Table, Value};
use crate::error::Result;
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;
use std::sync::Arc;

/// Number of rows in the sample customer dataset.
pub const CUSTOMER_ROWS: usize = 1000;

/// Seed used for the sample customer dataset.
pub const CUSTOMER_SEED: u64 = 42;

/// The reference rule set, as JSON.
pub const BUSINESS_RULES_JSON: &str = r#"{
    "required_columns": ["customer_id", "name", "email"],
    "critical_columns": ["customer_id", "email"],
    "min_row_count": 100,
    "max_null_percentage": {"customer_id": 0, "name": 1, "email": 2},
    "value_ranges": {"age": [18, 120], "total_spent": [0, 50000]},
    "unique_columns": ["customer_id", "email"]
}"#;

const COUNTRIES: [&str; 5] = ["US", "CA", "UK", "DE", "FR"];
const STATUSES: [&str; 3] = ["ACTIVE", "INACTIVE", "PENDING"];

/// One generated customer row.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub customer_id: i64,
    pub name: String,
    pub email: String,
    pub created_date: NaiveDate,
    pub country: &'static str,
    pub age: i64,
    pub status: &'static str,
    pub total_spent: f64,
}

/// Generates `rows` customers from `seed`.
///
/// Ages are uniform in `18..80`. Total spent is normally distributed around
/// 500 with a standard deviation of 200, clipped to `[0, 10000]` and rounded
/// to cents. `created_date` advances one day per row from 2023-01-01.
pub fn generate_customers(rows: usize, seed: u64) -> Vec<Customer> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default();

    (1..=rows as i64)
        .map(|id| Customer {
            customer_id: id,
            name: format!("Customer {id}"),
            email: format!("customer{id}@example.com"),
            created_date: start
                .checked_add_days(Days::new(id as u64 - 1))
                .unwrap_or(start),
            country: COUNTRIES[rng.random_range(0..COUNTRIES.len())],
            age: rng.random_range(18..80),
            status: STATUSES[rng.random_range(0..STATUSES.len())],
            total_spent: round_cents(normal(&mut rng, 500.0, 200.0).clamp(0.0, 10_000.0)),
        })
        .collect()
}

/// Box-Muller transform over two uniform samples.
fn normal(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.random_range(f64::EPSILON..1.0);
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Returns the 1000-row sample customer dataset as a [`Table`].
pub fn sample_customer_data() -> Table {
    customers_table(&generate_customers(CUSTOMER_ROWS, CUSTOMER_SEED))
}

/// Builds a [`Table`] from generated customers.
pub fn customers_table(customers: &[Customer]) -> Table {
    let column = |f: fn(&Customer) -> Value| customers.iter().map(f).collect::<Vec<_>>();

    // Every column is built from the same slice, so the lengths always agree.
    Table::try_new([
        ("customer_id", column(|c| c.customer_id.into())),
        ("name", column(|c| c.name.clone().into())),
        ("email", column(|c| c.email.clone().into())),
        (
            "created_date",
            column(|c| c.created_date.format("%Y-%m-%d").to_string().into()),
        ),
        ("country", column(|c| c.country.into())),
        ("age", column(|c| c.age.into())),
        ("status", column(|c| c.status.into())),
        ("total_spent", column(|c| c.total_spent.into())),
    ])
    .unwrap_or_default()
}

/// Returns the sample customer dataset as an arrow record batch.
///
/// `created_date` is a `Date32` column here.
pub fn sample_customer_batch() -> Result<RecordBatch> {
    let customers = generate_customers(CUSTOMER_ROWS, CUSTOMER_SEED);
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();

    let schema = Arc::new(Schema::new(vec![
        Field::new("customer_id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("email", DataType::Utf8, true),
        Field::new("created_date", DataType::Date32, false),
        Field::new("country", DataType::Utf8, false),
        Field::new("age", DataType::Int64, true),
        Field::new("status", DataType::Utf8, false),
        Field::new("total_spent", DataType::Float64, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(
            customers.iter().map(|c| c.customer_id),
        )),
        Arc::new(StringArray::from_iter_values(customers.iter().map(|c| &c.name))),
        Arc::new(StringArray::from_iter_values(customers.iter().map(|c| &c.email))),
        Arc::new(Date32Array::from_iter_values(
            customers
                .iter()
                .map(|c| (c.created_date - epoch).num_days() as i32),
        )),
        Arc::new(StringArray::from_iter_values(customers.iter().map(|c| c.country))),
        Arc::new(Int64Array::from_iter_values(customers.iter().map(|c| c.age))),
        Arc::new(StringArray::from_iter_values(customers.iter().map(|c| c.status))),
        Arc::new(Float64Array::from_iter_values(
            customers.iter().map(|c| c.total_spent),
        )),
    ];

    Ok(RecordBatch::try_new(schema, columns)?)
}

/// Returns the sample customer dataset as an [`ArrowTable`].
pub fn sample_customer_arrow() -> Result<ArrowTable> {
    ArrowTable::from_batch(sample_customer_batch()?)
}

/// Returns the reference rule set.
///
/// # Panics
///
/// Panics if [`BUSINESS_RULES_JSON`] is not a valid rule configuration.
pub fn business_rules_config() -> RuleConfiguration {
    RuleConfiguration::from_json_str(BUSINESS_RULES_JSON)
        .expect("BUSINESS_RULES_JSON must be a valid rule configuration")
}

/// Returns a copy of `table` with `column` replaced by `replace` applied to
/// each row index in `rows`.
///
/// The replaced column moves to the end of the column order.
pub fn with_values(
    table: &Table,
    column: &str,
    rows: Range<usize>,
    replace: impl Fn(usize) -> Value,
) -> Result<Table> {
    use crate::dataset::Dataset;

    let mut values = table
        .column(column)
        .map(|v| v.into_owned())
        .unwrap_or_else(|| vec![Value::Null; table.row_count()]);
    for i in rows {
        if let Some(slot) = values.get_mut(i) {
            *slot = replace(i);
        }
    }
    table.without_column(column).with_column(column, values)
}

/// Returns a copy of `table` with the values of `column` in `rows` set to null.
pub fn with_nulls(table: &Table, column: &str, rows: Range<usize>) -> Result<Table> {
    with_values(table, column, rows, |_| Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    #[test]
    fn test_sample_data_shape() {
        let table = sample_customer_data();
        assert_eq!(table.row_count(), CUSTOMER_ROWS);
        assert_eq!(
            table.column_names(),
            vec![
                "customer_id",
                "name",
                "email",
                "created_date",
                "country",
                "age",
                "status",
                "total_spent"
            ]
        );
        assert_eq!(
            table.column("created_date").unwrap()[0],
            Value::Text("2023-01-01".into())
        );
    }

    #[test]
    fn test_sample_data_is_deterministic() {
        assert_eq!(
            generate_customers(50, CUSTOMER_SEED),
            generate_customers(50, CUSTOMER_SEED)
        );
        assert_ne!(generate_customers(50, 1), generate_customers(50, 2));
    }

    #[test]
    fn test_generated_values_stay_in_bounds() {
        for customer in generate_customers(CUSTOMER_ROWS, CUSTOMER_SEED) {
            assert!((18..80).contains(&customer.age));
            assert!((0.0..=10_000.0).contains(&customer.total_spent));
            assert!(COUNTRIES.contains(&customer.country));
            assert!(STATUSES.contains(&customer.status));
        }
    }

    #[test]
    fn test_arrow_and_owned_tables_agree() {
        let owned = sample_customer_data();
        let arrow = sample_customer_arrow().unwrap();
        for name in owned.column_names() {
            assert_eq!(owned.column(name), arrow.column(name), "column {name}");
        }
    }

    #[test]
    fn test_business_rules_config() {
        let config = business_rules_config();
        assert_eq!(config.min_row_count(), 100);
        assert_eq!(config.null_threshold("email"), 2.0);
        assert_eq!(config.value_ranges()["age"].max(), 120.0);
        assert_eq!(config.rule_count(), 10);
        assert_ne!(config, RuleConfiguration::default());
    }

    #[test]
    fn test_with_nulls() {
        let table = with_nulls(&sample_customer_data(), "email", 0..15).unwrap();
        let email = table.column("email").unwrap();
        assert_eq!(email.iter().filter(|v| v.is_missing()).count(), 15);
        assert_eq!(table.row_count(), CUSTOMER_ROWS);
    }
}
