//! Progress handler trait and events

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// The five checklist pipeline steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    Analyze,
    Checklist,
    TestCases,
    Validate,
    Export,
}

impl PipelineStep {
    pub const ALL: [PipelineStep; 5] = [
        PipelineStep::Analyze,
        PipelineStep::Checklist,
        PipelineStep::TestCases,
        PipelineStep::Validate,
        PipelineStep::Export,
    ];

    pub fn number(self) -> usize {
        match self {
            PipelineStep::Analyze => 1,
            PipelineStep::Checklist => 2,
            PipelineStep::TestCases => 3,
            PipelineStep::Validate => 4,
            PipelineStep::Export => 5,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PipelineStep::Analyze => "Figma analysis and requirement extraction",
            PipelineStep::Checklist => "Checklist generation",
            PipelineStep::TestCases => "Test case generation",
            PipelineStep::Validate => "Cross-validation",
            PipelineStep::Export => "Export",
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5 {}", self.number(), self.title())
    }
}

/// Events emitted while the pipeline runs
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Pipeline started
    Started { url: String },

    StepStarted { step: PipelineStep },

    /// Step finished; `artifact` is the file it wrote, if any
    StepComplete {
        step: PipelineStep,
        duration: Duration,
        artifact: Option<PathBuf>,
    },

    /// Pipeline completed successfully
    Completed {
        testcases: usize,
        completeness: u32,
        total_time: Duration,
    },

    /// Pipeline failed
    Failed { step: PipelineStep, error: String },
}

/// Trait for handling progress events during a pipeline run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
