//! Progress reporting for pipeline runs

mod handler;
mod logging;

pub use handler::{NoOpHandler, PipelineStep, ProgressEvent, ProgressHandler};
pub use logging::LoggingHandler;
