//! Prelude for commonly used types and traits in etl-guard.

pub use crate::config::{RuleConfiguration, ValueRange};
pub use crate::core::{CheckResults, RuleChecker, RuleEvaluator, ValidationReport};
pub use crate::dataset::{Dataset, Table, Value};
pub use crate::error::{ErrorContext, GuardError, Result};
pub use crate::formatters::{FormatterConfig, ResultFormatter};
pub use crate::logging::LogConfig;
