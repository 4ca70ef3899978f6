//! The rule evaluator.

use super::{CheckResults, RuleChecker, ValidationReport};
use crate::checkers::{CompletenessChecker, QualityChecker};
use crate::config::RuleConfiguration;
use crate::dataset::Dataset;
use crate::logging::LogConfig;
use crate::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

const DEFAULT_SUITE_NAME: &str = "business_rules";

/// Evaluates a fixed rule configuration against any number of datasets.
///
/// The configuration is validated once, at construction. The evaluator
/// holds it behind an `Arc` and never mutates it, so one evaluator can be
/// cloned freely and shared across threads and tasks.
///
/// ```rust
/// use etl_guard::config::RuleConfiguration;
/// use etl_guard::core::RuleEvaluator;
/// use etl_guard::dataset::Table;
///
/// # fn example() -> etl_guard::prelude::Result<()> {
/// let rules = RuleConfiguration::builder()
///     .required_column("customer_id")
///     .unique_column("customer_id")
///     .value_range("age", 18.0, 80.0)
///     .build()?;
/// let evaluator = RuleEvaluator::new(rules)?;
///
/// let table = Table::builder()
///     .column("customer_id", vec![1, 2, 3])
///     .column("age", vec![25, 40, 95])
///     .build()?;
///
/// let report = evaluator.evaluate(&table)?;
/// assert!(!report.is_success());
/// assert_eq!(report.failed_checks(), vec!["age_range_check"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RuleEvaluator {
    config: Arc<RuleConfiguration>,
    suite_name: String,
    log_config: LogConfig,
}

impl RuleEvaluator {
    /// Creates an evaluator, validating the configuration.
    pub fn new(config: RuleConfiguration) -> Result<Self> {
        Self::with_shared(Arc::new(config))
    }

    /// Creates an evaluator over an already shared configuration.
    pub fn with_shared(config: Arc<RuleConfiguration>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            suite_name: DEFAULT_SUITE_NAME.to_string(),
            log_config: LogConfig::default(),
        })
    }

    /// Sets the suite name reported in [`ValidationReport`]s.
    pub fn with_suite_name(mut self, name: impl Into<String>) -> Self {
        self.suite_name = name.into();
        self
    }

    /// Sets the logging configuration for this evaluator and its checkers.
    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// Returns the rule configuration.
    pub fn config(&self) -> &RuleConfiguration {
        &self.config
    }

    /// Returns the suite name.
    pub fn suite_name(&self) -> &str {
        &self.suite_name
    }

    /// Runs the completeness checks against `dataset`.
    pub fn validate_completeness(&self, dataset: &dyn Dataset) -> Result<CheckResults> {
        dataset.ensure_consistent()?;
        self.completeness_checker().check(dataset, &self.config)
    }

    /// Runs the quality checks against `dataset`.
    pub fn validate_data_quality(&self, dataset: &dyn Dataset) -> Result<CheckResults> {
        dataset.ensure_consistent()?;
        self.quality_checker().check(dataset, &self.config)
    }

    /// Runs both check groups and summarizes them in a report.
    #[instrument(skip(self, dataset), fields(
        suite.name = %self.suite_name,
        data.rows = dataset.row_count(),
        rules.count = self.config.rule_count()
    ))]
    pub fn evaluate(&self, dataset: &dyn Dataset) -> Result<ValidationReport> {
        let start = Instant::now();
        dataset.ensure_consistent()?;

        let completeness = self.completeness_checker().check(dataset, &self.config)?;
        let quality = self.quality_checker().check(dataset, &self.config)?;

        Ok(self.finish(completeness, quality, start))
    }

    /// Runs both check groups on the blocking thread pool, in parallel.
    ///
    /// The dataset is shared with the worker threads, so it must be owned
    /// by an `Arc`. Produces the same results as [`evaluate`](Self::evaluate).
    #[instrument(skip(self, dataset), fields(
        suite.name = %self.suite_name,
        data.rows = dataset.row_count(),
        rules.count = self.config.rule_count()
    ))]
    pub async fn evaluate_concurrent(&self, dataset: Arc<dyn Dataset>) -> Result<ValidationReport> {
        let start = Instant::now();
        dataset.ensure_consistent()?;

        let completeness = self.spawn_checker(self.completeness_checker(), Arc::clone(&dataset));
        let quality = self.spawn_checker(self.quality_checker(), dataset);

        let (completeness, quality) = tokio::try_join!(completeness, quality)
            .map_err(|e| GuardError::Internal(format!("rule checker task failed: {e}")))?;

        Ok(self.finish(completeness?, quality?, start))
    }

    fn completeness_checker(&self) -> CompletenessChecker {
        CompletenessChecker::with_log_config(self.log_config.clone())
    }

    fn quality_checker(&self) -> QualityChecker {
        QualityChecker::with_log_config(self.log_config.clone())
    }

    fn spawn_checker<C>(
        &self,
        checker: C,
        dataset: Arc<dyn Dataset>,
    ) -> tokio::task::JoinHandle<Result<CheckResults>>
    where
        C: RuleChecker + 'static,
    {
        let config = Arc::clone(&self.config);
        tokio::task::spawn_blocking(move || checker.check(dataset.as_ref(), &config))
    }

    fn finish(
        &self,
        completeness: CheckResults,
        quality: CheckResults,
        start: Instant,
    ) -> ValidationReport {
        let report =
            ValidationReport::new(&self.suite_name, completeness, quality, start.elapsed());

        if self.log_config.log_metrics {
            info!(
                suite.name = %report.suite_name,
                suite.passed = report.is_success(),
                checks.total = report.metrics.total_checks,
                checks.passed = report.metrics.passed_checks,
                checks.failed = report.metrics.failed_checks,
                suite.duration_ms = report.metrics.execution_time_ms,
                "Rule evaluation completed"
            );
        }
        report
    }
}
