//! Validation report types.

use super::CheckResults;
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Metrics collected during an evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    /// Total number of checks executed
    pub total_checks: usize,
    /// Number of checks that passed
    pub passed_checks: usize,
    /// Number of checks that failed
    pub failed_checks: usize,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
}

impl ValidationMetrics {
    /// Creates new validation metrics with all counts set to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the counts for a set of result groups.
    pub fn from_results<'a>(
        groups: impl IntoIterator<Item = &'a CheckResults>,
        elapsed: Duration,
    ) -> Self {
        let mut metrics = Self {
            execution_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            ..Self::default()
        };
        for group in groups {
            for (_, passed) in group.iter() {
                metrics.total_checks += 1;
                if passed {
                    metrics.passed_checks += 1;
                } else {
                    metrics.failed_checks += 1;
                }
            }
        }
        metrics
    }

    /// Returns the success rate as a percentage (0.0 to 100.0).
    pub fn success_rate(&self) -> f64 {
        if self.total_checks == 0 {
            100.0
        } else {
            (self.passed_checks as f64 / self.total_checks as f64) * 100.0
        }
    }
}

/// The combined outcome of a completeness run and a quality run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// The name of the rule suite that was run
    pub suite_name: String,
    /// Timestamp when the evaluation was run (RFC 3339)
    pub timestamp: String,
    /// Results of the completeness checks
    pub completeness: CheckResults,
    /// Results of the data quality checks
    pub quality: CheckResults,
    /// Overall metrics
    pub metrics: ValidationMetrics,
}

impl ValidationReport {
    /// Creates a report stamped with the current time.
    pub fn new(
        suite_name: impl Into<String>,
        completeness: CheckResults,
        quality: CheckResults,
        elapsed: Duration,
    ) -> Self {
        let metrics = ValidationMetrics::from_results([&completeness, &quality], elapsed);
        Self {
            suite_name: suite_name.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            completeness,
            quality,
            metrics,
        }
    }

    /// Returns true if every check passed.
    pub fn is_success(&self) -> bool {
        self.metrics.failed_checks == 0
    }

    /// Returns the keys of all failed checks, completeness first.
    pub fn failed_checks(&self) -> Vec<&str> {
        let mut failed = self.completeness.failed();
        failed.extend(self.quality.failed());
        failed
    }

    /// Returns both result groups merged into one map.
    pub fn all_results(&self) -> CheckResults {
        let mut all = self.completeness.clone();
        all.extend(self.quality.clone());
        all
    }

    /// Serializes the report to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the report to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Formats the report with the given formatter.
    pub fn format_with<F: crate::formatters::ResultFormatter>(&self, formatter: &F) -> Result<String> {
        formatter.format(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(entries: &[(&str, bool)]) -> CheckResults {
        entries.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_metrics_counts() {
        let completeness = results(&[("has_column_id", true), ("meets_min_row_count", false)]);
        let quality = results(&[("id_uniqueness_check", true)]);
        let report = ValidationReport::new(
            "customers",
            completeness,
            quality,
            Duration::from_millis(12),
        );

        assert_eq!(report.metrics.total_checks, 3);
        assert_eq!(report.metrics.passed_checks, 2);
        assert_eq!(report.metrics.failed_checks, 1);
        assert_eq!(report.metrics.execution_time_ms, 12);
        assert!(!report.is_success());
        assert_eq!(report.failed_checks(), vec!["meets_min_row_count"]);
        assert_eq!(report.all_results().len(), 3);
    }

    #[test]
    fn test_success_rate() {
        let metrics = ValidationMetrics {
            total_checks: 4,
            passed_checks: 3,
            failed_checks: 1,
            execution_time_ms: 0,
        };
        assert_eq!(metrics.success_rate(), 75.0);
        assert_eq!(ValidationMetrics::new().success_rate(), 100.0);
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let report = ValidationReport::new(
            "s",
            CheckResults::new(),
            CheckResults::new(),
            Duration::ZERO,
        );
        assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
        assert!(report.is_success());
    }

    #[test]
    fn test_json_round_trip() {
        let report = ValidationReport::new(
            "customers",
            results(&[("has_column_id", true)]),
            results(&[("age_range_check", false)]),
            Duration::from_millis(3),
        );
        let json = report.to_json().unwrap();
        assert!(json.contains(r#""completeness":{"has_column_id":true}"#));
        let back: ValidationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
