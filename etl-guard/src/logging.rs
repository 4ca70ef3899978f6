//! Logging configuration for rule evaluation.
//!
//! The checkers emit one `debug!` event per check when check details are
//! enabled, skip and summary events when the base level admits `DEBUG`, and
//! the evaluator emits one `info!` summary per run when
//! metrics logging is enabled. Everything goes through `tracing`; install a
//! subscriber with [`setup::init_logging`] or bring your own.

use tracing::Level;

/// Logging configuration for the evaluator and the checkers.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Base log level for etl-guard components
    pub base_level: Level,
    /// Whether to log the outcome of every individual check
    pub log_check_details: bool,
    /// Whether to log a summary with check counts and timing per run
    pub log_metrics: bool,
    /// Maximum length for logged field values
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_check_details: false,
            log_metrics: true,
            max_field_length: 256,
        }
    }
}

impl LogConfig {
    /// Creates a verbose configuration suitable for debugging rule sets.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_check_details: true,
            log_metrics: true,
            max_field_length: 1024,
        }
    }

    /// Creates a quiet configuration for production pipelines.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_check_details: false,
            log_metrics: false,
            max_field_length: 128,
        }
    }

    /// Returns true if events at `level` pass the configured base level.
    pub fn enabled(&self, level: Level) -> bool {
        level <= self.base_level
    }

    /// Truncates a value for logging according to `max_field_length`.
    pub fn truncate(&self, value: &str) -> String {
        truncate_field(value, self.max_field_length)
    }
}

/// Logs a single check outcome when check details are enabled.
///
/// ```rust
/// use etl_guard::logging::LogConfig;
///
/// let config = LogConfig::verbose();
/// etl_guard::log_check!(config, check.key = "age_range_check", check.passed = true, "Check evaluated");
/// ```
#[macro_export]
macro_rules! log_check {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_check_details {
            tracing::debug!($($arg)*);
        }
    };
}

/// Debug logging gated on the configured base level.
///
/// Arguments are only evaluated when the base level admits debug events.
#[macro_export]
macro_rules! perf_debug {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled(tracing::Level::DEBUG) {
            tracing::debug!($($arg)*);
        }
    };
}

/// Truncates a string to the maximum field length if needed.
///
/// The cut always lands on a character boundary.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }
    let mut end = max_length;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &value[..end])
}

/// Helpers for installing a `tracing` subscriber.
pub mod setup {
    use tracing::Level;

    /// Configuration for the global subscriber.
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Log level for the application
        pub level: Level,
        /// Log level for etl-guard components specifically
        pub guard_level: Level,
        /// Whether to use JSON output format
        pub json_format: bool,
        /// Environment filter override
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                guard_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }
    }

    impl LoggingConfig {
        /// Creates a configuration for production use.
        pub fn production() -> Self {
            Self {
                level: Level::WARN,
                guard_level: Level::INFO,
                json_format: true,
                env_filter: None,
            }
        }

        /// Creates a configuration for development use.
        pub fn development() -> Self {
            Self {
                level: Level::DEBUG,
                guard_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }

        /// Sets the log level for the application.
        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        /// Sets the log level for etl-guard components.
        pub fn with_guard_level(mut self, level: Level) -> Self {
            self.guard_level = level;
            self
        }

        /// Sets whether to use JSON output format.
        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        /// Sets a custom environment filter.
        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// Builds the environment filter string.
        pub fn env_filter(&self) -> String {
            match &self.env_filter {
                Some(filter) => filter.clone(),
                None => format!(
                    "{},etl_guard={}",
                    self.level.as_str().to_lowercase(),
                    self.guard_level.as_str().to_lowercase()
                ),
            }
        }
    }

    /// Installs a global subscriber.
    ///
    /// `RUST_LOG` takes precedence over the configured filter. Fails if a
    /// global subscriber is already installed.
    ///
    /// ```rust,no_run
    /// use etl_guard::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(LoggingConfig::development().with_json_format(true)).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

        let fmt_layer = if config.json_format {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::setup::LoggingConfig;
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.base_level, Level::INFO);
        assert!(!config.log_check_details);
        assert!(config.log_metrics);
        assert_eq!(config.max_field_length, 256);
    }

    #[test]
    fn test_log_config_verbose() {
        let config = LogConfig::verbose();
        assert_eq!(config.base_level, Level::DEBUG);
        assert!(config.log_check_details);
        assert_eq!(config.max_field_length, 1024);
    }

    #[test]
    fn test_log_config_production() {
        let config = LogConfig::production();
        assert_eq!(config.base_level, Level::WARN);
        assert!(!config.log_check_details);
        assert!(!config.log_metrics);
        assert_eq!(config.max_field_length, 128);
    }

    #[test]
    fn test_base_level_gates_events() {
        let verbose = LogConfig::verbose();
        assert!(verbose.enabled(Level::DEBUG));
        assert!(!verbose.enabled(Level::TRACE));

        let default = LogConfig::default();
        assert!(default.enabled(Level::INFO));
        assert!(!default.enabled(Level::DEBUG));

        let production = LogConfig::production();
        assert!(production.enabled(Level::WARN));
        assert!(production.enabled(Level::ERROR));
        assert!(!production.enabled(Level::INFO));
    }

    #[test]
    fn test_truncate_field() {
        assert_eq!(truncate_field("hello", 10), "hello");
        assert_eq!(
            truncate_field("this is a very long text that should be truncated", 10),
            "this is a ...(truncated)"
        );
        assert_eq!(truncate_field("añb", 2), "a...(truncated)");
    }

    #[test]
    fn test_env_filter() {
        assert_eq!(LoggingConfig::default().env_filter(), "info,etl_guard=debug");
        assert_eq!(
            LoggingConfig::production().env_filter(),
            "warn,etl_guard=info"
        );
        assert_eq!(
            LoggingConfig::default()
                .with_env_filter("etl_guard=trace")
                .env_filter(),
            "etl_guard=trace"
        );
    }
}
