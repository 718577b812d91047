//! Logging setup using tracing.
//!
//! Command output goes to stdout; diagnostics from this module go to stderr
//! so the two never interleave in a pipe.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration.
pub struct LogConfig {
    /// Whether to print logs to stderr.
    pub print: bool,
    /// Log level.
    pub level: LogLevel,
    /// Whether to include file/line info in logs.
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            print: true,
            level: LogLevel::Warn,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Configuration used by the CLI for a given verbosity flag.
    pub fn for_verbosity(verbose: bool) -> Self {
        Self {
            level: if verbose {
                LogLevel::Debug
            } else {
                LogLevel::Warn
            },
            include_location: verbose,
            ..Self::default()
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
    }
}

/// Initialize logging with the given configuration.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over the configured level.
pub fn init(config: LogConfig) {
    let subscriber = tracing_subscriber::registry().with(config.filter());

    if config.print {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.include_location)
            .with_level(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location);

        subscriber.with(fmt_layer).init();
    } else {
        subscriber.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_as_str() {
        assert_eq!(LogLevel::Trace.as_str(), "trace");
        assert_eq!(LogLevel::Warn.as_str(), "warn");
    }

    #[test]
    fn test_default_log_config_is_quiet() {
        let config = LogConfig::default();
        assert!(config.print);
        assert_eq!(config.level, LogLevel::Warn);
    }

    #[test]
    fn test_verbose_config_enables_debug() {
        let config = LogConfig::for_verbosity(true);
        assert_eq!(config.level, LogLevel::Debug);
        assert!(config.include_location);

        let quiet = LogConfig::for_verbosity(false);
        assert_eq!(quiet.level, LogLevel::Warn);
    }
}
