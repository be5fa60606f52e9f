use super::checklist::{build_checklist, checklist_cases, collect_requirements, PipelineRequirement};
use super::validation::{cross_validate, ValidationResult};
use super::PipelineError;
use crate::analysis::{AnalysisReport, FigmaAnalyzer};
use crate::export::{export, ExportFormat, ExportOptions};
use crate::figma::FigmaSource;
use crate::progress::{LoggingHandler, PipelineStep, ProgressEvent, ProgressHandler};
use crate::testcase::RulesConfig;
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub const ANALYSIS_ARTIFACT: &str = "figma_analysis.json";
pub const CHECKLIST_ARTIFACT: &str = "checklist.json";
pub const DRAFT_ARTIFACT: &str = "testcases_draft.json";
pub const VALIDATION_ARTIFACT: &str = "validation_result.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputFiles {
    pub csv_path: PathBuf,
    pub excel_path: PathBuf,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    pub testcase_count: usize,
    pub validation: ValidationResult,
    pub output_files: OutputFiles,
    pub output_directory: PathBuf,
    /// Intermediate JSON files, in step order
    pub artifacts: Vec<PathBuf>,
}

#[derive(Serialize)]
struct AnalysisArtifact<'a> {
    figma_url: &'a str,
    analysis: &'a AnalysisReport,
    requirements: &'a [PipelineRequirement],
    requirements_count: usize,
}

/// Five-step checklist pipeline: analyze, checklist, draft, validate, export
pub struct Pipeline<S: FigmaSource> {
    analyzer: FigmaAnalyzer<S>,
    rules: RulesConfig,
    output_dir: PathBuf,
    progress: Arc<dyn ProgressHandler>,
}

impl<S: FigmaSource> Pipeline<S> {
    pub fn new(source: S, rules: RulesConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            analyzer: FigmaAnalyzer::new(source),
            rules,
            output_dir: output_dir.into(),
            progress: Arc::new(LoggingHandler),
        }
    }

    pub fn with_progress(mut self, handler: Arc<dyn ProgressHandler>) -> Self {
        self.progress = handler;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn run(
        &self,
        url: &str,
        domain: &str,
        feature: &str,
    ) -> Result<PipelineResult, PipelineError> {
        let start = Instant::now();
        self.progress.on_progress(&ProgressEvent::Started {
            url: url.to_string(),
        });

        let mut current = PipelineStep::Analyze;
        match self.run_steps(url, domain, feature, &mut current).await {
            Ok(result) => {
                self.progress.on_progress(&ProgressEvent::Completed {
                    testcases: result.testcase_count,
                    completeness: result.validation.completeness_score,
                    total_time: start.elapsed(),
                });
                Ok(result)
            }
            Err(e) => {
                self.progress.on_progress(&ProgressEvent::Failed {
                    step: current,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run_steps(
        &self,
        url: &str,
        domain: &str,
        feature: &str,
        current: &mut PipelineStep,
    ) -> Result<PipelineResult, PipelineError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| PipelineError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        let mut artifacts = Vec::with_capacity(4);

        *current = PipelineStep::Analyze;
        let step_start = self.begin(*current);
        let report = self.analyzer.enhanced_analysis(url, false).await?;
        let requirements = collect_requirements(&report);
        let path = self.write_artifact(
            ANALYSIS_ARTIFACT,
            &AnalysisArtifact {
                figma_url: url,
                analysis: &report,
                requirements: &requirements,
                requirements_count: requirements.len(),
            },
        )?;
        self.finish(*current, step_start, Some(&path));
        artifacts.push(path);

        *current = PipelineStep::Checklist;
        let step_start = self.begin(*current);
        let checklist = build_checklist(&requirements, &self.rules, domain, feature);
        debug!(
            ui_elements = checklist.ui_elements.len(),
            items = checklist.item_count(),
            "Checklist built"
        );
        let path = self.write_artifact(CHECKLIST_ARTIFACT, &checklist)?;
        self.finish(*current, step_start, Some(&path));
        artifacts.push(path);

        *current = PipelineStep::TestCases;
        let step_start = self.begin(*current);
        let cases = checklist_cases(&checklist, &self.rules);
        let path = self.write_artifact(DRAFT_ARTIFACT, &cases)?;
        self.finish(*current, step_start, Some(&path));
        artifacts.push(path);

        *current = PipelineStep::Validate;
        let step_start = self.begin(*current);
        let validation = cross_validate(&checklist, &cases, &report.user_flow, &self.rules);
        let path = self.write_artifact(VALIDATION_ARTIFACT, &validation)?;
        self.finish(*current, step_start, Some(&path));
        artifacts.push(path);

        *current = PipelineStep::Export;
        let step_start = self.begin(*current);
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        // An empty draft still yields header-only files
        let options = ExportOptions::from_rules(&self.rules).allowing_empty();
        let csv_path = export(
            &cases,
            ExportFormat::Csv,
            &self.output_dir.join(format!("TestCases_{}.csv", timestamp)),
            &options,
        )?;
        let excel_path = export(
            &cases,
            ExportFormat::Excel,
            &self.output_dir.join(format!("TestCases_{}.xlsx", timestamp)),
            &options,
        )?;
        self.finish(*current, step_start, None);

        info!(
            testcases = cases.len(),
            completeness = validation.completeness_score,
            status = %validation.validation_result,
            "Checklist pipeline finished"
        );

        Ok(PipelineResult {
            testcase_count: cases.len(),
            validation,
            output_files: OutputFiles {
                csv_path,
                excel_path,
                count: cases.len(),
            },
            output_directory: self.output_dir.clone(),
            artifacts,
        })
    }

    fn begin(&self, step: PipelineStep) -> Instant {
        self.progress.on_progress(&ProgressEvent::StepStarted { step });
        Instant::now()
    }

    fn finish(&self, step: PipelineStep, started: Instant, artifact: Option<&Path>) {
        self.progress.on_progress(&ProgressEvent::StepComplete {
            step,
            duration: started.elapsed(),
            artifact: artifact.map(Path::to_path_buf),
        });
    }

    fn write_artifact<T: Serialize>(
        &self,
        name: &'static str,
        value: &T,
    ) -> Result<PathBuf, PipelineError> {
        let path = self.output_dir.join(name);
        let json = serde_json::to_string_pretty(value)
            .map_err(|source| PipelineError::Serialize { artifact: name, source })?;
        fs::write(&path, json).map_err(|source| PipelineError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
