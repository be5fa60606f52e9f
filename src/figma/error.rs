//! Errors raised while talking to the Figma REST API

use thiserror::Error;

/// Errors that can occur while resolving links or fetching design data
#[derive(Debug, Error)]
pub enum FigmaError {
    /// The URL does not point at a Figma design/file
    #[error("Not a valid Figma URL: {0}")]
    InvalidUrl(String),

    /// No access token was configured
    #[error("FIGMA_TOKEN is not set")]
    MissingToken,

    /// The API answered with a non-success status or an error body
    #[error("Figma API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Request could not be sent or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Request timed out after the specified duration (in seconds)
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The response body was not the JSON we expected
    #[error("Failed to decode Figma response: {0}")]
    Decode(String),

    /// Image rendering needs a node id in the link
    #[error("Rendering an image requires a node id")]
    NodeIdRequired,

    /// The images endpoint returned no usable URL
    #[error("Figma did not render an image for node {0}")]
    ImageNotRendered(String),
}

impl FigmaError {
    /// Returns a user-friendly error message with troubleshooting hints
    pub fn help_message(&self) -> String {
        match self {
            FigmaError::MissingToken => "Error: Figma access token missing\n\n\
                 Help: Create a personal access token in Figma \
                 (Settings > Security > Personal access tokens) and export it:\n\
                 export FIGMA_TOKEN=your-token\n\
                 A .env file in the working directory is also read."
                .to_string(),
            FigmaError::Api { status: 403, message } => format!(
                "Error: Figma rejected the token\n\n\
                 Help: Check that FIGMA_TOKEN is valid and has access to this file.\n\n\
                 Details: {}",
                message
            ),
            FigmaError::Api { status: 404, message } => format!(
                "Error: Figma file or node not found\n\n\
                 Help: Check the file id and node-id in the URL.\n\n\
                 Details: {}",
                message
            ),
            FigmaError::InvalidUrl(url) => format!(
                "Error: Not a Figma URL\nURL: {}\n\n\
                 Help: Expected a link such as \
                 https://www.figma.com/design/<FILE_ID>/<NAME>?node-id=1-2",
                url
            ),
            other => format!("Error: {}", other),
        }
    }
}

impl From<reqwest::Error> for FigmaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FigmaError::Decode(err.to_string())
        } else {
            FigmaError::Network(err.to_string())
        }
    }
}
