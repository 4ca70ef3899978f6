//! Report formatting.
//!
//! Two formatters ship with the crate: [`JsonFormatter`] for machines and
//! [`HumanFormatter`] for consoles and CI logs. Both take a
//! [`FormatterConfig`] controlling how much of the report is shown.
//!
//! ```rust
//! use etl_guard::formatters::{FormatterConfig, HumanFormatter, ResultFormatter};
//! use etl_guard::prelude::*;
//!
//! # fn example() -> Result<()> {
//! let rules = RuleConfiguration::builder().min_row_count(10).build()?;
//! let table = Table::builder().column("id", vec![1, 2]).build()?;
//! let report = RuleEvaluator::new(rules)?.evaluate(&table)?;
//!
//! let output = HumanFormatter::with_config(FormatterConfig::ci()).format(&report)?;
//! assert!(output.contains("Validation FAILED"));
//! assert!(output.contains("meets_min_row_count"));
//! # Ok(())
//! # }
//! ```

use crate::core::ValidationReport;
use crate::prelude::*;
use std::fmt::Write;

/// Configuration options for formatting validation reports.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include the metrics summary
    pub include_metrics: bool,
    /// List passing checks as well as failing ones
    pub include_passed: bool,
    /// Maximum number of failing checks to list (`None` for all)
    pub max_failures: Option<usize>,
    /// Whether to use colorized output (human formatter only)
    pub use_colors: bool,
    /// Whether to include the report timestamp
    pub include_timestamps: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_metrics: true,
            include_passed: true,
            max_failures: None,
            use_colors: true,
            include_timestamps: true,
        }
    }
}

impl FormatterConfig {
    /// Creates a minimal configuration showing only the summary.
    pub fn minimal() -> Self {
        Self {
            include_metrics: true,
            include_passed: false,
            max_failures: Some(0),
            use_colors: false,
            include_timestamps: false,
        }
    }

    /// Creates a configuration suitable for CI/CD environments.
    pub fn ci() -> Self {
        Self {
            include_metrics: true,
            include_passed: false,
            max_failures: Some(50),
            use_colors: false,
            include_timestamps: true,
        }
    }

    /// Sets whether to include the metrics summary.
    pub fn with_metrics(mut self, include: bool) -> Self {
        self.include_metrics = include;
        self
    }

    /// Sets whether to list passing checks.
    pub fn with_passed(mut self, include: bool) -> Self {
        self.include_passed = include;
        self
    }

    /// Sets the maximum number of failing checks to list.
    pub fn with_max_failures(mut self, max: usize) -> Self {
        self.max_failures = Some(max);
        self
    }

    /// Sets whether to use colorized output.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn failures_shown(&self, total: usize) -> usize {
        self.max_failures.map_or(total, |max| max.min(total))
    }
}

/// Trait for turning a validation report into text.
///
/// ```rust
/// use etl_guard::core::ValidationReport;
/// use etl_guard::formatters::ResultFormatter;
///
/// struct OneLine;
///
/// impl ResultFormatter for OneLine {
///     fn format(&self, report: &ValidationReport) -> etl_guard::prelude::Result<String> {
///         Ok(format!("{}: {:.0}%", report.suite_name, report.metrics.success_rate()))
///     }
/// }
/// ```
pub trait ResultFormatter {
    /// Formats a report with the formatter's own configuration.
    fn format(&self, report: &ValidationReport) -> Result<String>;

    /// Formats a report with an explicit configuration.
    ///
    /// The default implementation ignores `config`.
    fn format_with_config(
        &self,
        report: &ValidationReport,
        _config: &FormatterConfig,
    ) -> Result<String> {
        self.format(report)
    }
}

/// Formats reports as JSON.
///
/// The output keeps the shape of the serialized [`ValidationReport`]:
/// `suite_name`, `timestamp`, `completeness`, `quality` and `metrics`. The
/// configuration can drop the timestamp, the metrics and passing checks.
/// `max_failures` does not apply to JSON.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            pretty: true,
        }
    }

    /// Creates a new JSON formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: true,
        }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for JsonFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(
        &self,
        report: &ValidationReport,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut value = serde_json::to_value(report)?;
        if let Some(object) = value.as_object_mut() {
            if !config.include_timestamps {
                object.remove("timestamp");
            }
            if !config.include_metrics {
                object.remove("metrics");
            }
            if !config.include_passed {
                for group in ["completeness", "quality"] {
                    if let Some(checks) = object.get_mut(group).and_then(|g| g.as_object_mut()) {
                        checks.retain(|_, passed| passed.as_bool() == Some(false));
                    }
                }
            }
        }

        let output = if self.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        output.map_err(|e| GuardError::Internal(format!("Failed to serialize report to JSON: {e}")))
    }
}

/// Formats reports for console output.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    /// Creates a new human formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
        }
    }

    /// Creates a new human formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    fn render(
        &self,
        output: &mut String,
        report: &ValidationReport,
        config: &FormatterConfig,
    ) -> std::fmt::Result {
        let paint = |text: &str, color: &str| {
            if config.use_colors {
                format!("\x1b[{color}m{text}\x1b[0m")
            } else {
                text.to_string()
            }
        };

        writeln!(output)?;
        if report.is_success() {
            writeln!(output, "✅ {}", paint("Validation PASSED", "32"))?;
        } else {
            writeln!(output, "❌ {}", paint("Validation FAILED", "31"))?;
        }

        writeln!(output)?;
        writeln!(output, "Suite: {}", report.suite_name)?;
        if config.include_timestamps {
            writeln!(output, "Timestamp: {}", report.timestamp)?;
        }

        if config.include_metrics {
            let metrics = &report.metrics;
            writeln!(output)?;
            writeln!(output, "📊 Summary Statistics:")?;
            writeln!(output, "   Total Checks: {}", metrics.total_checks)?;
            writeln!(
                output,
                "   ✅ Passed: {}",
                paint(&metrics.passed_checks.to_string(), "32")
            )?;
            writeln!(
                output,
                "   ❌ Failed: {}",
                paint(&metrics.failed_checks.to_string(), "31")
            )?;
            writeln!(output, "   Success Rate: {:.1}%", metrics.success_rate())?;
            writeln!(output, "   Execution Time: {}ms", metrics.execution_time_ms)?;
        }

        let failed = report.failed_checks();
        let shown = config.failures_shown(failed.len());
        if shown > 0 {
            writeln!(output)?;
            writeln!(output, "🔍 Failed Checks:")?;
            for key in &failed[..shown] {
                writeln!(output, "   {} {key}", paint("✗", "31"))?;
            }
        }
        if shown < failed.len() {
            writeln!(output, "   ... and {} more failed checks", failed.len() - shown)?;
        }

        if config.include_passed {
            let mut passed = report.completeness.passed();
            passed.extend(report.quality.passed());
            if !passed.is_empty() {
                writeln!(output)?;
                writeln!(output, "Passed Checks:")?;
                for key in passed {
                    writeln!(output, "   {} {key}", paint("✓", "32"))?;
                }
            }
        }

        Ok(())
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for HumanFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(
        &self,
        report: &ValidationReport,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();
        self.render(&mut output, report, config)
            .map_err(|e| GuardError::Internal(format!("Failed to format report: {e}")))?;
        Ok(output)
    }
}
