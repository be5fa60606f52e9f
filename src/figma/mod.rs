//! Figma REST API access: link parsing, document fetching and image rendering

pub mod client;
pub mod error;
pub mod types;
pub mod url;

pub use client::{FigmaClient, FigmaSource, FixtureSource};
pub use error::FigmaError;
pub use types::{Complexity, FigmaFile, FigmaNode, NodeKind, RenderedImage};
pub use url::{parse_figma_url, to_api_node_id, FigmaLink};
