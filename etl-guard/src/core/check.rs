//! Names of individual checks.

use std::fmt;

/// Identifies a single check in a [`CheckResults`](super::CheckResults) map.
///
/// The string form is the key callers see in the results map and in
/// serialized reports, so it is stable:
///
/// | Variant | Key |
/// |---|---|
/// | `HasColumn("email")` | `has_column_email` |
/// | `MinRowCount` | `meets_min_row_count` |
/// | `NullCheck("email")` | `email_null_check` |
/// | `RangeCheck("age")` | `age_range_check` |
/// | `UniquenessCheck("customer_id")` | `customer_id_uniqueness_check` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKey<'a> {
    /// A required column is present
    HasColumn(&'a str),
    /// The dataset has at least the configured number of rows
    MinRowCount,
    /// A critical column stays within its null-percentage threshold
    NullCheck(&'a str),
    /// Every non-missing value of a column falls within its range
    RangeCheck(&'a str),
    /// A column contains no repeated non-missing value
    UniquenessCheck(&'a str),
}

impl CheckKey<'_> {
    /// Returns the column this check is about, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            CheckKey::HasColumn(c)
            | CheckKey::NullCheck(c)
            | CheckKey::RangeCheck(c)
            | CheckKey::UniquenessCheck(c) => Some(c),
            CheckKey::MinRowCount => None,
        }
    }
}

impl fmt::Display for CheckKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKey::HasColumn(column) => write!(f, "has_column_{column}"),
            CheckKey::MinRowCount => write!(f, "meets_min_row_count"),
            CheckKey::NullCheck(column) => write!(f, "{column}_null_check"),
            CheckKey::RangeCheck(column) => write!(f, "{column}_range_check"),
            CheckKey::UniquenessCheck(column) => write!(f, "{column}_uniqueness_check"),
        }
    }
}

impl From<CheckKey<'_>> for String {
    fn from(key: CheckKey<'_>) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_strings() {
        assert_eq!(CheckKey::HasColumn("email").to_string(), "has_column_email");
        assert_eq!(CheckKey::MinRowCount.to_string(), "meets_min_row_count");
        assert_eq!(CheckKey::NullCheck("email").to_string(), "email_null_check");
        assert_eq!(CheckKey::RangeCheck("age").to_string(), "age_range_check");
        assert_eq!(
            CheckKey::UniquenessCheck("customer_id").to_string(),
            "customer_id_uniqueness_check"
        );
    }

    #[test]
    fn test_key_column() {
        assert_eq!(CheckKey::RangeCheck("age").column(), Some("age"));
        assert_eq!(CheckKey::MinRowCount.column(), None);
    }
}
