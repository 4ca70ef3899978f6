//! The checker trait.

use super::CheckResults;
use crate::config::RuleConfiguration;
use crate::dataset::Dataset;
use crate::prelude::*;
use std::fmt::Debug;

/// A group of checks evaluated against a dataset.
///
/// A checker reads the parts of the configuration it is responsible for and
/// returns one entry per evaluated check. A failing check is reported as
/// `false` in the results, never as an error. Implementations assume the
/// configuration and the dataset have already been validated.
pub trait RuleChecker: Debug + Send + Sync {
    /// Returns the name of this checker, used in logs.
    fn name(&self) -> &str;

    /// Evaluates the checks against `dataset`.
    fn check(&self, dataset: &dyn Dataset, config: &RuleConfiguration) -> Result<CheckResults>;
}
