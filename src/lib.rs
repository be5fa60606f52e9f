//! figma-qa - QA test case generation from Figma designs
//!
//! This library reads a design through the Figma REST API, recognizes UI
//! patterns and user flows by matching layer names and copy against keyword
//! tables, and turns the findings into templated test cases that can be
//! exported for QA tooling.
//!
//! # Core Concepts
//!
//! - **Design source**: anything implementing [`FigmaSource`]; the live
//!   [`FigmaClient`] or a recorded [`FixtureSource`]
//! - **Analysis**: requirement extraction, pattern and flow detection, UI
//!   structure and complexity, recommendations
//! - **Generation**: templates per pattern, flow and requirement, shaped by a
//!   [`RulesConfig`]
//! - **Export**: Excel, TestRail CSV, CSV and JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use figma_qa::{FigmaAnalyzer, FigmaQaConfig, TestCaseGenerator};
//! use figma_qa::export::{export, ExportFormat, ExportOptions};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FigmaQaConfig::default();
//! let analyzer = FigmaAnalyzer::new(config.create_client()?);
//! let generator = TestCaseGenerator::new(config.load_rules()?);
//!
//! let report = analyzer
//!     .enhanced_analysis("https://www.figma.com/design/abc123/App?node-id=1-2", true)
//!     .await?;
//! let cases = generator.generate_from_analysis(&report, &[])?;
//!
//! export(
//!     &cases,
//!     ExportFormat::Excel,
//!     Path::new("output/testcases.xlsx"),
//!     &ExportOptions::from_rules(generator.rules()),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`figma`]: URL parsing and REST API access
//! - [`analysis`]: design analyzers
//! - [`testcase`]: test case model, rules and generator
//! - [`export`]: file writers
//! - [`pipeline`]: five-step checklist pipeline
//! - [`mcp`]: MCP server exposing the tools over stdio

pub mod analysis;
pub mod cli;
pub mod config;
pub mod export;
pub mod figma;
pub mod mcp;
pub mod pipeline;
pub mod progress;
pub mod testcase;
pub mod util;

pub use analysis::{AnalysisReport, FigmaAnalyzer};
pub use config::{ConfigError, FigmaQaConfig};
pub use export::{ExportError, ExportFormat};
pub use figma::{FigmaClient, FigmaError, FigmaSource, FixtureSource};
pub use pipeline::{Pipeline, PipelineError, PipelineResult};
pub use testcase::{RulesConfig, TestCase, TestCaseGenerator};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
