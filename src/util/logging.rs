//! Structured logging setup for figma-qa
//!
//! Logs are written to stderr. Standard output is reserved for command
//! results and for the MCP transport, so a log line never corrupts a
//! JSON-RPC response or a piped report.
//!
//! `RUST_LOG` is honored when set. Otherwise the crate logs at the
//! configured level and the HTTP stack (`hyper`, `reqwest`, `h2`) is capped
//! at `warn`.
//!
//! # Example
//!
//! ```no_run
//! use figma_qa::util::logging;
//! use tracing::info;
//!
//! logging::init_from_env();
//! info!(file_id = "abc123", "Fetching design");
//! ```

use std::env;
use std::io;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

const CRATE_TARGET: &str = "figma_qa";
const QUIET_DEPENDENCIES: [&str; 3] = ["h2=warn", "hyper=warn", "reqwest=warn"];

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level for this crate
    pub level: Level,

    /// Emit one JSON object per event instead of formatted text
    pub use_json: bool,

    /// Include the module target (e.g. `figma_qa::figma::client`)
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,

    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON output with source locations and thread ids, for log collectors
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
            include_thread_ids: true,
        }
    }

    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            include_location: true,
            ..Default::default()
        }
    }

    /// Reads `FIGMA_QA_LOG_LEVEL` and `FIGMA_QA_LOG_JSON`
    pub fn from_env() -> Self {
        let level = env::var("FIGMA_QA_LOG_LEVEL")
            .map(|v| parse_level(&v))
            .unwrap_or(Level::INFO);

        let use_json = env::var("FIGMA_QA_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level,
            use_json,
            ..Default::default()
        }
    }
}

/// Parses a log level (case-insensitive), falling back to `INFO`
///
/// ```
/// use figma_qa::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("Debug"), Level::DEBUG);
/// assert_eq!(parse_level("verbose"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Builds the event filter for `level`.
///
/// With `rust_log_set`, the directives from `RUST_LOG` win for dependencies.
pub fn build_filter(level: Level, rust_log_set: bool) -> EnvFilter {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("{}={}", CRATE_TARGET, level).parse() {
        filter = filter.add_directive(directive);
    }

    if !rust_log_set {
        for quiet in QUIET_DEPENDENCIES {
            if let Ok(directive) = quiet.parse() {
                filter = filter.add_directive(directive);
            }
        }
    }
    filter
}

/// Installs the global subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level, env::var("RUST_LOG").is_ok());

        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_thread_ids(config.include_thread_ids)
            .with_thread_names(config.include_thread_ids);

        // try_init: a subscriber installed by the host process is left alone
        let result = if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json())
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        };

        if let Err(e) = result {
            eprintln!("Logging already initialized: {}", e);
        }
    });
}

pub fn init_default() {
    init_logging(LoggingConfig::default());
}

pub fn init_from_env() {
    init_logging(LoggingConfig::from_env());
}

/// Initializes logging at the level named by `level_str`
pub fn with_level(level_str: &str) {
    init_logging(LoggingConfig::with_level(parse_level(level_str)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use yare::parameterized;

    #[parameterized(
        trace = { "trace", Level::TRACE },
        debug_mixed_case = { "Debug", Level::DEBUG },
        info_upper = { "INFO", Level::INFO },
        warn = { "warn", Level::WARN },
        warning_alias = { "warning", Level::WARN },
        error_padded = { " error ", Level::ERROR },
        invalid = { "verbose", Level::INFO },
        empty = { "", Level::INFO },
    )]
    fn test_parse_level(input: &str, expected: Level) {
        assert_eq!(parse_level(input), expected);
    }

    #[test]
    fn test_presets() {
        let default = LoggingConfig::default();
        assert_eq!(default.level, Level::INFO);
        assert!(!default.use_json);
        assert!(default.include_target);

        let production = LoggingConfig::production();
        assert!(production.use_json);
        assert!(production.include_thread_ids);

        let development = LoggingConfig::development();
        assert_eq!(development.level, Level::DEBUG);
        assert!(development.include_location);
        assert!(!development.use_json);

        assert_eq!(LoggingConfig::with_level(Level::WARN).level, Level::WARN);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("FIGMA_QA_LOG_LEVEL", "trace");
        std::env::set_var("FIGMA_QA_LOG_JSON", "true");
        let config = LoggingConfig::from_env();
        std::env::remove_var("FIGMA_QA_LOG_LEVEL");
        std::env::remove_var("FIGMA_QA_LOG_JSON");

        assert_eq!(config.level, Level::TRACE);
        assert!(config.use_json);

        let config = LoggingConfig::from_env();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.use_json);
    }

    #[test]
    #[serial]
    fn test_filter_directives() {
        std::env::remove_var("RUST_LOG");

        let filter = build_filter(Level::DEBUG, false).to_string().to_lowercase();
        assert!(filter.contains("figma_qa=debug"));
        assert!(filter.contains("reqwest=warn"));

        let filter = build_filter(Level::INFO, true).to_string().to_lowercase();
        assert!(filter.contains("figma_qa=info"));
        assert!(!filter.contains("hyper=warn"));
    }
}
