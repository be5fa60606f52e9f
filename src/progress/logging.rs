//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { url } => {
                info!(url = %url, "Starting pipeline");
            }
            ProgressEvent::StepStarted { step } => {
                info!(step = %step, "Starting step");
            }
            ProgressEvent::StepComplete {
                step,
                duration,
                artifact,
            } => match artifact {
                Some(path) => info!(
                    step = %step,
                    duration_ms = duration.as_millis(),
                    artifact = %path.display(),
                    "Step complete"
                ),
                None => debug!(
                    step = %step,
                    duration_ms = duration.as_millis(),
                    "Step complete"
                ),
            },
            ProgressEvent::Completed {
                testcases,
                completeness,
                total_time,
            } => {
                info!(
                    testcases,
                    completeness,
                    total_time_ms = total_time.as_millis(),
                    "Pipeline complete"
                );
            }
            ProgressEvent::Failed { step, error } => {
                warn!(step = %step, error = %error, "Pipeline failed");
            }
        }
    }
}
