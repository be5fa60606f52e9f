//! Subcommand handlers
//!
//! Each handler returns the process exit code. Failures are logged and a
//! troubleshooting hint is printed to stderr when one is available.

use super::commands::{
    AnalysisMode, AnalyzeArgs, CompareArgs, ConfigArgs, GenerateArgs, MissingArgs, PipelineArgs,
    ScenariosArgs, ServeArgs,
};
use super::output::{OutputFormat, OutputFormatter, TestCaseStatistics};
use crate::analysis::FigmaAnalyzer;
use crate::config::{ConfigError, FigmaQaConfig};
use crate::export::{export, ExportFormat, ExportOptions};
use crate::figma::{FigmaError, FigmaSource};
use crate::mcp::{self, McpServer, ToolContext};
use crate::pipeline::{Pipeline, PipelineError};
use crate::testcase::{CustomScenario, FeatureScenarios, TestCase, TestCaseGenerator};
use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

pub async fn handle_generate(args: &GenerateArgs, quiet: bool, verbose: bool) -> i32 {
    exit_code(run_generate(args, quiet, verbose).await)
}

pub async fn handle_analyze(args: &AnalyzeArgs) -> i32 {
    exit_code(run_analyze(args).await)
}

pub async fn handle_compare(args: &CompareArgs) -> i32 {
    exit_code(run_compare(args).await)
}

pub async fn handle_pipeline(args: &PipelineArgs) -> i32 {
    exit_code(run_pipeline(args).await)
}

pub async fn handle_missing(args: &MissingArgs, quiet: bool) -> i32 {
    exit_code(run_missing(args, quiet).await)
}

pub fn handle_scenarios(args: &ScenariosArgs, quiet: bool) -> i32 {
    exit_code(run_scenarios(args, quiet))
}

pub async fn handle_serve(args: &ServeArgs) -> i32 {
    exit_code(run_serve(args).await)
}

pub fn handle_config(args: &ConfigArgs) -> i32 {
    let config = FigmaQaConfig::default();
    if let Err(e) = config.validate() {
        warn!("Configuration error: {}", e);
    }
    let formatter = OutputFormatter::new(args.format.into());
    exit_code(formatter.format_config(&config).map(|out| print!("{}", out)))
}

fn exit_code(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            match figma_error(&e) {
                Some(figma) => eprintln!("\n{}", figma.help_message()),
                None => eprintln!("Error: {:#}", e),
            }
            1
        }
    }
}

static MISSING_TOKEN: FigmaError = FigmaError::MissingToken;

/// Finds a Figma error behind the wrappers used by the handlers
fn figma_error(e: &anyhow::Error) -> Option<&FigmaError> {
    if let Some(figma) = e.downcast_ref::<FigmaError>() {
        return Some(figma);
    }
    match e.downcast_ref::<ConfigError>() {
        Some(ConfigError::MissingToken) => return Some(&MISSING_TOKEN),
        Some(ConfigError::ClientInitError(figma)) => return Some(figma),
        _ => {}
    }
    match e.downcast_ref::<PipelineError>() {
        Some(PipelineError::Figma(figma)) => Some(figma),
        _ => None,
    }
}

fn load_config() -> Result<FigmaQaConfig> {
    let config = FigmaQaConfig::default();
    config.validate()?;
    Ok(config)
}

fn setup(config: &FigmaQaConfig) -> Result<(FigmaAnalyzer<Box<dyn FigmaSource>>, TestCaseGenerator)> {
    let source = config.create_source()?;
    debug!(source = source.name(), "Using design source");
    let rules = config.load_rules()?;
    Ok((FigmaAnalyzer::new(source), TestCaseGenerator::new(rules)))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn default_output(config: &FigmaQaConfig, stem: &str, format: ExportFormat) -> PathBuf {
    config
        .output_dir
        .join(format!("{}.{}", stem, format.extension()))
}

async fn run_generate(args: &GenerateArgs, quiet: bool, verbose: bool) -> Result<()> {
    let config = load_config()?;
    let (analyzer, generator) = setup(&config)?;
    let format: ExportFormat = args.format.into();

    let custom: Vec<CustomScenario> = match &args.scenarios {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };

    let mut cases = match args.analysis {
        AnalysisMode::Basic => {
            let report = analyzer.basic_analysis(&args.url).await?;
            if verbose {
                eprintln!("Requirements found: {}", report.requirements.len());
            }
            if !custom.is_empty() {
                warn!("Custom scenarios are only applied with enhanced analysis");
            }
            generator.from_requirements(&report.requirements, args.test_type)
        }
        AnalysisMode::Enhanced => {
            let report = analyzer
                .enhanced_analysis(&args.url, !args.no_screenshot)
                .await?;
            if verbose {
                let summary = OutputFormatter::new(OutputFormat::Human).format_analysis(&report)?;
                eprintln!("{}", summary);
            }
            generator.generate_from_analysis(&report, &custom)?
        }
    };

    if let Some(min) = args.priority {
        cases.retain(|c| c.priority <= min);
        debug!(min = %min, remaining = cases.len(), "Applied priority filter");
    }

    if cases.is_empty() {
        bail!("No test cases were generated for {}", args.url);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&config, "testcases", format));
    let path = export(
        &cases,
        format,
        &output,
        &ExportOptions::from_rules(generator.rules()),
    )?;

    info!(count = cases.len(), path = %path.display(), "Test cases written");
    if !quiet {
        println!(
            "\u{2713} Generated {} test cases \u{2192} {}",
            cases.len(),
            path.display()
        );
    }
    if verbose {
        print_statistics(&cases)?;
    }
    Ok(())
}

fn print_statistics(cases: &[TestCase]) -> Result<()> {
    let stats = TestCaseStatistics::from_cases(cases);
    let text = OutputFormatter::new(OutputFormat::Human).format_statistics(&stats)?;
    println!("\n{}", text);
    Ok(())
}

async fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = load_config()?;
    let (analyzer, _) = setup(&config)?;
    let formatter = OutputFormatter::new(args.format.into());

    let output = match args.analysis {
        AnalysisMode::Basic => formatter.format_basic(&analyzer.basic_analysis(&args.url).await?)?,
        AnalysisMode::Enhanced => {
            let report = analyzer
                .enhanced_analysis(&args.url, !args.no_screenshot)
                .await?;
            formatter.format_analysis(&report)?
        }
    };
    println!("{}", output);
    Ok(())
}

async fn run_compare(args: &CompareArgs) -> Result<()> {
    let config = load_config()?;
    let (analyzer, _) = setup(&config)?;

    let comparison = analyzer.compare_screens(&args.as_is, &args.to_be).await?;
    println!(
        "{}",
        OutputFormatter::new(args.format.into()).format_comparison(&comparison)?
    );
    Ok(())
}

async fn run_pipeline(args: &PipelineArgs) -> Result<()> {
    let config = load_config()?;
    let source = config.create_source()?;
    let rules = config.load_rules()?;
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());

    let result = Pipeline::new(source, rules, output_dir)
        .run(&args.url, &args.domain, &args.feature)
        .await?;
    println!(
        "{}",
        OutputFormatter::new(args.format.into()).format_pipeline(&result)?
    );
    Ok(())
}

async fn run_missing(args: &MissingArgs, quiet: bool) -> Result<()> {
    let config = load_config()?;
    let (analyzer, generator) = setup(&config)?;

    let existing = generator.parse_records(read_json(&args.existing)?)?;
    let report = analyzer
        .enhanced_analysis(&args.url, !args.no_screenshot)
        .await?;
    let missing = generator.identify_missing_tests(&existing, &report)?;

    if missing.is_empty() {
        if !quiet {
            println!(
                "\u{2713} All generated test cases are covered by {} existing cases",
                existing.len()
            );
        }
        return Ok(());
    }

    if !quiet {
        println!("{} missing test cases:", missing.len());
        for case in &missing {
            println!("  - [{}] {}", case.priority, case.title);
        }
    }

    if let Some(output) = &args.output {
        let path = export(
            &missing,
            args.format.into(),
            output,
            &ExportOptions::from_rules(generator.rules()),
        )?;
        if !quiet {
            println!("\u{2713} Missing cases written to {}", path.display());
        }
    }
    Ok(())
}

fn run_scenarios(args: &ScenariosArgs, quiet: bool) -> Result<()> {
    let config = load_config()?;
    let generator = TestCaseGenerator::new(config.load_rules()?);
    let format: ExportFormat = args.format.into();

    let feature: FeatureScenarios = read_json(&args.config)?;
    let cases = generator.generate_scenarios(&feature);
    if cases.is_empty() {
        bail!("{} lists no scenarios", args.config.display());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&config, "scenario_testcases", format));
    let path = export(
        &cases,
        format,
        &output,
        &ExportOptions::from_rules(generator.rules()),
    )?;
    if !quiet {
        println!(
            "\u{2713} Generated {} scenario test cases for '{}' \u{2192} {}",
            cases.len(),
            feature.feature_name,
            path.display()
        );
    }
    Ok(())
}

async fn run_serve(args: &ServeArgs) -> Result<()> {
    let config = load_config()?;
    let source = config.create_source()?;
    let generator = TestCaseGenerator::new(config.load_rules()?);
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());

    mcp::serve(McpServer::new(ToolContext::new(source, generator, output_dir))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_figma_error_found_through_context() {
        let err = anyhow::Error::new(FigmaError::Api {
            status: 404,
            message: "Not found".to_string(),
        })
        .context("Analysis failed");
        assert!(matches!(
            figma_error(&err),
            Some(FigmaError::Api { status: 404, .. })
        ));
    }

    #[test]
    fn test_figma_error_behind_wrappers() {
        let err = anyhow::Error::new(ConfigError::MissingToken);
        assert!(matches!(figma_error(&err), Some(FigmaError::MissingToken)));

        let err = anyhow::Error::new(PipelineError::Figma(FigmaError::NodeIdRequired));
        assert!(matches!(figma_error(&err), Some(FigmaError::NodeIdRequired)));

        assert!(figma_error(&anyhow!("plain failure")).is_none());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(Ok(())), 0);
        assert_eq!(exit_code(Err(anyhow!("boom"))), 1);
    }

    #[test]
    fn test_default_output_uses_format_extension() {
        let config = FigmaQaConfig {
            figma_token: None,
            api_base: "https://api.figma.com/v1".to_string(),
            request_timeout_secs: 30,
            log_level: "info".to_string(),
            rules_path: None,
            output_dir: PathBuf::from("out"),
            fixture_path: None,
        };
        assert_eq!(
            default_output(&config, "testcases", ExportFormat::Testrail),
            PathBuf::from("out/testcases.csv")
        );
    }
}
