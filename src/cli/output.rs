//! Output formatting for reports printed by the CLI
//!
//! Every report can be rendered as JSON, YAML or human-readable text. The
//! human format uses the same header rule and tree connectors throughout.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::analysis::{AnalysisReport, BasicReport, ScreenComparison, ScreenshotAnalysis};
use crate::config::FigmaQaConfig;
use crate::pipeline::PipelineResult;
use crate::testcase::{Priority, TestCase};

const RULE_WIDTH: usize = 42;
const BRANCH: &str = "\u{251C}\u{2500}";
const LAST: &str = "\u{2514}\u{2500}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Counts of generated test cases
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TestCaseStatistics {
    pub total: usize,
    /// Only priorities that occur, P1 first
    pub by_priority: BTreeMap<Priority, usize>,
    pub by_type: BTreeMap<String, usize>,
    pub by_domain: BTreeMap<String, usize>,
}

impl TestCaseStatistics {
    pub fn from_cases(cases: &[TestCase]) -> Self {
        let mut stats = Self {
            total: cases.len(),
            ..Default::default()
        };
        for case in cases {
            *stats.by_priority.entry(case.priority).or_default() += 1;
            *stats
                .by_type
                .entry(case.test_type.as_str().to_string())
                .or_default() += 1;
            *stats.by_domain.entry(case.domain.clone()).or_default() += 1;
        }
        stats
    }
}

/// Output formatter for CLI reports
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_analysis(&self, report: &AnalysisReport) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(analysis_human(report)),
            _ => self.serialize(report, "analysis report"),
        }
    }

    pub fn format_basic(&self, report: &BasicReport) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(basic_human(report)),
            _ => self.serialize(report, "requirement report"),
        }
    }

    pub fn format_comparison(&self, comparison: &ScreenComparison) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(comparison_human(comparison)),
            _ => self.serialize(comparison, "screen comparison"),
        }
    }

    pub fn format_pipeline(&self, result: &PipelineResult) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(pipeline_human(result)),
            _ => self.serialize(result, "pipeline result"),
        }
    }

    pub fn format_statistics(&self, stats: &TestCaseStatistics) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(statistics_human(stats)),
            _ => self.serialize(stats, "statistics"),
        }
    }

    /// Formats configuration display
    pub fn format_config(&self, config: &FigmaQaConfig) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(config.to_string()),
            _ => {
                let map: BTreeMap<_, _> = config.to_display_map().into_iter().collect();
                self.serialize(&map, "config")
            }
        }
    }

    fn serialize<T: Serialize>(&self, value: &T, what: &str) -> Result<String> {
        match self.format {
            OutputFormat::Yaml => serde_yaml::to_string(value)
                .with_context(|| format!("Failed to serialize {} to YAML", what)),
            _ => serde_json::to_string_pretty(value)
                .with_context(|| format!("Failed to serialize {} to JSON", what)),
        }
    }
}

fn header(out: &mut String, title: &str) {
    out.push_str(&format!("\u{2713} {}\n", title));
    out.push_str(&"\u{2501}".repeat(RULE_WIDTH));
    out.push_str("\n\n");
}

/// Tree rows; the last row gets the closing connector
fn tree(out: &mut String, title: &str, rows: &[(&str, String)]) {
    out.push_str(title);
    out.push_str(":\n");
    for (i, (label, value)) in rows.iter().enumerate() {
        let connector = if i + 1 == rows.len() { LAST } else { BRANCH };
        out.push_str(&format!("{} {:<15}{}\n", connector, format!("{}:", label), value));
    }
    out.push('\n');
}

fn join_or_none<T: ToString>(items: &[T]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items
            .iter()
            .map(T::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn analysis_human(report: &AnalysisReport) -> String {
    let mut out = String::new();
    header(&mut out, "Figma Design Analysis");

    out.push_str(&format!("File:  {}\n", report.file.file_id));
    out.push_str(&format!(
        "Node:  {}\n\n",
        report.file.node_id.as_deref().unwrap_or("(whole file)")
    ));

    let summary = &report.summary;
    tree(
        &mut out,
        "Summary",
        &[
            ("Total elements", summary.total_elements.to_string()),
            ("Complexity", summary.ui_complexity.to_string()),
            (
                "Primary flow",
                format!("{} ({}%)", summary.flow_type, summary.confidence),
            ),
            ("UI patterns", join_or_none(&summary.ui_patterns)),
        ],
    );

    let elements = &report.ui_structure.ui_elements;
    tree(
        &mut out,
        "UI Elements",
        &[
            ("Buttons", elements.buttons.len().to_string()),
            ("Inputs", elements.inputs.len().to_string()),
            ("Navigation", elements.navigation.len().to_string()),
            ("Containers", elements.containers.len().to_string()),
        ],
    );

    if !report.user_flow.flow_steps.is_empty() {
        out.push_str("User Flow:\n");
        for (i, step) in report.user_flow.flow_steps.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, step));
        }
        out.push('\n');
    }

    out.push_str(&format!("Requirements: {}\n", report.requirements.len()));

    let recs = &report.recommendations;
    let lines: Vec<String> = recs
        .ui_improvements
        .iter()
        .cloned()
        .chain(recs.testing_priorities.iter().map(|p| p.to_string()))
        .chain(recs.user_experience.iter().cloned())
        .collect();
    if !lines.is_empty() {
        out.push_str("\nRecommendations:\n");
        for line in lines {
            out.push_str(&format!("  - {}\n", line));
        }
    }

    match &report.screenshot {
        Some(ScreenshotAnalysis::Rendered(image)) => out.push_str(&format!(
            "\nScreenshot: {} ({} bytes, {} complexity)\n",
            image.image_url, image.byte_size, image.complexity
        )),
        Some(ScreenshotAnalysis::Failed { error }) => {
            out.push_str(&format!("\n\u{26A0} Screenshot skipped: {}\n", error))
        }
        None => {}
    }

    out
}

fn basic_human(report: &BasicReport) -> String {
    let mut out = String::new();
    header(&mut out, "Figma Requirements");
    out.push_str(&format!("File:  {}\n", report.file.file_id));
    out.push_str(&format!("Requirements: {}\n\n", report.requirements.len()));
    for req in &report.requirements {
        out.push_str(&format!("  - {} [{}]\n", req.text, req.source));
    }
    out
}

fn comparison_human(comparison: &ScreenComparison) -> String {
    let mut out = String::new();
    header(&mut out, "Screen Comparison (AS-IS \u{2192} TO-BE)");

    let diff = &comparison.differences;
    tree(
        &mut out,
        "Differences",
        &[
            ("New patterns", join_or_none(&diff.new_patterns)),
            ("Removed", join_or_none(&diff.removed_patterns)),
            (
                "Complexity",
                format!(
                    "{} \u{2192} {}",
                    diff.ui_complexity_change.from, diff.ui_complexity_change.to
                ),
            ),
            (
                "Flow type",
                format!(
                    "{} \u{2192} {}",
                    diff.flow_type_change.from, diff.flow_type_change.to
                ),
            ),
        ],
    );

    if comparison.recommendations.is_empty() {
        out.push_str("No test changes recommended\n");
    } else {
        out.push_str("Recommendations:\n");
        for rec in &comparison.recommendations {
            out.push_str(&format!("  - {}\n", rec));
        }
    }
    out
}

fn pipeline_human(result: &PipelineResult) -> String {
    let mut out = String::new();
    header(&mut out, "Checklist Pipeline Complete");

    let validation = &result.validation;
    tree(
        &mut out,
        "Validation",
        &[
            ("Result", validation.validation_result.to_string()),
            ("Completeness", format!("{}%", validation.completeness_score)),
            ("Approved", validation.approved.to_string()),
        ],
    );
    tree(
        &mut out,
        "Output",
        &[
            ("Test cases", result.testcase_count.to_string()),
            ("CSV", result.output_files.csv_path.display().to_string()),
            ("Excel", result.output_files.excel_path.display().to_string()),
            ("Directory", result.output_directory.display().to_string()),
        ],
    );

    for issue in &validation.issues {
        out.push_str(&format!("\u{26A0} {}\n", issue));
    }
    if !validation.clarification_questions.is_empty() {
        out.push_str("\nQuestions for the designer:\n");
        for question in &validation.clarification_questions {
            out.push_str(&format!("  - {}\n", question));
        }
    }
    out
}

fn statistics_human(stats: &TestCaseStatistics) -> String {
    let mut out = String::new();
    out.push_str(&format!("Test case statistics ({} total)\n", stats.total));

    out.push_str("By priority:\n");
    for (priority, count) in &stats.by_priority {
        out.push_str(&format!("  {}: {}\n", priority, count));
    }
    out.push_str("By type:\n");
    for (test_type, count) in &stats.by_type {
        out.push_str(&format!("  {}: {}\n", test_type, count));
    }
    out.push_str("By domain:\n");
    for (domain, count) in &stats.by_domain {
        out.push_str(&format!("  {}: {}\n", domain, count));
    }
    out
}
