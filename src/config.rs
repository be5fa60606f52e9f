//! Configuration management for figma-qa
//!
//! Settings are loaded from environment variables with sensible defaults.
//! A `.env` file in the working directory is read at startup, so the same
//! variables can live there.
//!
//! # Environment Variables
//!
//! - `FIGMA_TOKEN`: Figma personal access token - **required** for API access
//! - `FIGMA_QA_API_BASE`: REST API base URL - default: "https://api.figma.com/v1"
//! - `FIGMA_QA_REQUEST_TIMEOUT`: Timeout in seconds - default: "30"
//! - `FIGMA_QA_LOG_LEVEL`: Logging level - default: "info"
//! - `FIGMA_QA_RULES_PATH`: Rules file overriding the built-in rules - optional
//! - `FIGMA_QA_OUTPUT_DIR`: Directory for generated files - default: "output"
//! - `FIGMA_QA_FIXTURE`: Recorded `/files` or `/nodes` response served instead
//!   of the live API - optional, for offline runs
//!
//! # Example
//!
//! ```no_run
//! use figma_qa::FigmaQaConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FigmaQaConfig::default();
//! config.validate()?;
//!
//! let client = config.create_client()?;
//! let rules = config.load_rules()?;
//! # Ok(())
//! # }
//! ```

use crate::figma::{FigmaClient, FigmaError, FigmaSource, FixtureSource};
use crate::testcase::{RulesConfig, RulesError};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_API_BASE: &str = "https://api.figma.com/v1";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_OUTPUT_DIR: &str = "output";
const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No Figma token available
    #[error("Figma token not set. Set the FIGMA_TOKEN environment variable or add it to .env")]
    MissingToken,

    #[error("Invalid configuration: {0}")]
    ValidationFailed(String),

    /// A variable is set but its value is unusable
    #[error("{field} is malformed: {error}")]
    ParseError { field: String, error: String },

    /// HTTP client could not be built
    #[error("Figma client initialization failed: {0}")]
    ClientInitError(#[from] FigmaError),

    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// Main configuration structure for figma-qa
///
/// Construct it with `Default::default()`, which reads the environment.
#[derive(Debug, Clone)]
pub struct FigmaQaConfig {
    /// Figma personal access token
    pub figma_token: Option<String>,

    /// Figma REST API base URL
    pub api_base: String,

    /// Per-request timeout for API calls, in seconds
    pub request_timeout_secs: u64,

    /// Lower-cased tracing level name
    pub log_level: String,

    /// Rules file; the built-in rules are used when unset
    pub rules_path: Option<PathBuf>,

    /// Directory for generated files
    pub output_dir: PathBuf,

    /// Recorded API response used instead of the live API
    pub fixture_path: Option<PathBuf>,
}

impl Default for FigmaQaConfig {
    fn default() -> Self {
        let figma_token = env::var("FIGMA_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let api_base = env::var("FIGMA_QA_API_BASE")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let request_timeout_secs = env::var("FIGMA_QA_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let log_level = env::var("FIGMA_QA_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let rules_path = env::var("FIGMA_QA_RULES_PATH")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let output_dir = env::var("FIGMA_QA_OUTPUT_DIR")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let fixture_path = env::var("FIGMA_QA_FIXTURE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            figma_token,
            api_base,
            request_timeout_secs,
            log_level,
            rules_path,
            output_dir,
            fixture_path,
        }
    }
}

impl FigmaQaConfig {
    /// Checks timeout, API base and log level.
    ///
    /// The token is not checked here; commands that work offline do not
    /// need one. [`create_client`](Self::create_client) reports it instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ConfigError::ValidationFailed(format!(
                "FIGMA_QA_REQUEST_TIMEOUT must be between 1 and {} seconds, got {}",
                MAX_REQUEST_TIMEOUT_SECS, self.request_timeout_secs
            )));
        }

        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(ConfigError::ParseError {
                field: "FIGMA_QA_API_BASE".to_string(),
                error: format!("'{}' is not an http(s) URL", self.api_base),
            });
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "unknown log level '{}', expected one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Creates a Figma API client from the token, base URL and timeout
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingToken` when no token is configured.
    pub fn create_client(&self) -> Result<FigmaClient, ConfigError> {
        let token = self.figma_token.clone().ok_or(ConfigError::MissingToken)?;
        let client = FigmaClient::new(
            self.api_base.clone(),
            token,
            Duration::from_secs(self.request_timeout_secs),
        )?;
        Ok(client)
    }

    /// The fixture when one is configured, otherwise the live API client
    pub fn create_source(&self) -> Result<Box<dyn FigmaSource>, ConfigError> {
        match &self.fixture_path {
            Some(path) => Ok(Box::new(FixtureSource::from_file(path)?)),
            None => Ok(Box::new(self.create_client()?)),
        }
    }

    /// Loads the configured rules file, or the built-in rules
    pub fn load_rules(&self) -> Result<RulesConfig, ConfigError> {
        Ok(RulesConfig::load(self.rules_path.as_deref())?)
    }

    /// Key/value view used by `figma-qa config`, with the token masked
    pub fn to_display_map(&self) -> HashMap<String, String> {
        let rules = match &self.rules_path {
            Some(path) => path.display().to_string(),
            None => "(built-in)".to_string(),
        };

        let mut entries = vec![
            ("figma_token", self.masked_token()),
            ("api_base", self.api_base.clone()),
            ("request_timeout_secs", self.request_timeout_secs.to_string()),
            ("log_level", self.log_level.clone()),
            ("rules_path", rules),
            ("output_dir", self.output_dir.display().to_string()),
        ];
        if let Some(fixture) = &self.fixture_path {
            entries.push(("fixture_path", fixture.display().to_string()));
        }

        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }

    fn masked_token(&self) -> String {
        match &self.figma_token {
            None => "(not set)".to_string(),
            Some(token) if token.chars().count() > 8 => {
                let head: String = token.chars().take(4).collect();
                let tail: String = token
                    .chars()
                    .rev()
                    .take(4)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                format!("{}****{}", head, tail)
            }
            Some(_) => "****".to_string(),
        }
    }
}

impl fmt::Display for FigmaQaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let map = self.to_display_map();
        let get = |key: &str| map.get(key).cloned().unwrap_or_default();

        writeln!(f, "Figma QA Configuration:")?;
        writeln!(f, "  Token:      {}", get("figma_token"))?;
        writeln!(f, "  API:        {}", self.api_base)?;
        writeln!(f, "  Timeout:    {}s", self.request_timeout_secs)?;
        writeln!(f, "  Logging:    {}", self.log_level)?;
        writeln!(f, "  Rules:      {}", get("rules_path"))?;
        writeln!(f, "  Output:     {}", self.output_dir.display())?;
        if let Some(ref fixture) = self.fixture_path {
            writeln!(f, "  Fixture:    {}", fixture.display())?;
        }
        Ok(())
    }
}
