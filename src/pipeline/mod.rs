//! Five-step checklist pipeline writing intermediate JSON artifacts and the
//! final CSV/Excel test case files

pub mod checklist;
mod orchestrator;
pub mod validation;

use crate::export::ExportError;
use crate::figma::FigmaError;
use std::path::PathBuf;
use thiserror::Error;

pub use checklist::{Checklist, PipelineRequirement, RequirementKind};
pub use orchestrator::{
    OutputFiles, Pipeline, PipelineResult, ANALYSIS_ARTIFACT, CHECKLIST_ARTIFACT, DRAFT_ARTIFACT,
    VALIDATION_ARTIFACT,
};
pub use validation::{ValidationResult, ValidationStatus, APPROVAL_THRESHOLD};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Figma(#[from] FigmaError),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {artifact}: {source}")]
    Serialize {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Export(#[from] ExportError),
}
