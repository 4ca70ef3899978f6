//! Check result types.

use super::CheckKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Index;

/// Outcome of a group of checks, keyed by check name.
///
/// Keys iterate in sorted order and serialize as a flat JSON object:
///
/// ```json
/// {"email_null_check": true, "has_column_email": true, "meets_min_row_count": false}
/// ```
///
/// A check that was skipped (for example a null check on a column the
/// dataset does not have) has no entry at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckResults {
    checks: BTreeMap<String, bool>,
}

impl CheckResults {
    /// Creates an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of a check, returning the previous outcome if any.
    pub fn insert(&mut self, key: impl Into<String>, passed: bool) -> Option<bool> {
        self.checks.insert(key.into(), passed)
    }

    /// Records the outcome of a named check.
    pub fn record(&mut self, key: CheckKey<'_>, passed: bool) {
        self.checks.insert(key.to_string(), passed);
    }

    /// Returns the outcome of a check, or `None` if it was not evaluated.
    pub fn get(&self, key: &str) -> Option<bool> {
        self.checks.get(key).copied()
    }

    /// Returns true if a check with this key was evaluated.
    pub fn contains_key(&self, key: &str) -> bool {
        self.checks.contains_key(key)
    }

    /// Returns the number of evaluated checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns true if no check was evaluated.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Iterates over `(key, passed)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.checks.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Returns true if every evaluated check passed.
    ///
    /// An empty result set counts as passing.
    pub fn all_passed(&self) -> bool {
        self.checks.values().all(|passed| *passed)
    }

    /// Returns the keys of the checks that passed.
    pub fn passed(&self) -> Vec<&str> {
        self.filter(true)
    }

    /// Returns the keys of the checks that failed.
    pub fn failed(&self) -> Vec<&str> {
        self.filter(false)
    }

    /// Merges another result set into this one. Entries of `other` win.
    pub fn extend(&mut self, other: CheckResults) {
        self.checks.extend(other.checks);
    }

    /// Consumes the results and returns the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, bool> {
        self.checks
    }

    fn filter(&self, outcome: bool) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|(_, passed)| **passed == outcome)
            .map(|(key, _)| key.as_str())
            .collect()
    }
}

impl Index<&str> for CheckResults {
    type Output = bool;

    /// Panics if the check was not evaluated.
    fn index(&self, key: &str) -> &bool {
        &self.checks[key]
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for CheckResults {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self {
            checks: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl IntoIterator for CheckResults {
    type Item = (String, bool);
    type IntoIter = std::collections::btree_map::IntoIter<String, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.checks.into_iter()
    }
}
