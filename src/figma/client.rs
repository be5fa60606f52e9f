//! HTTP client for the Figma REST API
//!
//! The analyzers only need two things from Figma: the node tree of a file
//! (or of one node inside it) and a rendered PNG of a node. Both are exposed
//! through the [`FigmaSource`] trait so the rest of the crate can run
//! against recorded fixtures as well as the live API.
//!
//! # Example
//!
//! ```no_run
//! use figma_qa::figma::{FigmaClient, FigmaSource};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FigmaClient::new(
//!     "https://api.figma.com/v1".to_string(),
//!     "figd_token".to_string(),
//!     Duration::from_secs(30),
//! )?;
//!
//! let file = client.fetch_file("iZNsaQjAyHxElK9mNXKqXB", Some("2:4")).await?;
//! println!("{} top-level nodes", file.document.children.len());
//! # Ok(())
//! # }
//! ```

use super::error::FigmaError;
use super::types::{FigmaFile, FigmaNode, RenderedImage};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const TOKEN_HEADER: &str = "X-Figma-Token";

/// Source of Figma design data
#[async_trait]
pub trait FigmaSource: Send + Sync {
    /// Fetches a whole file, or only `node_id` (API form, `1:2`) when given
    async fn fetch_file(&self, file_id: &str, node_id: Option<&str>)
        -> Result<FigmaFile, FigmaError>;

    /// Renders `node_id` to PNG and downloads it
    async fn render_image(&self, file_id: &str, node_id: &str)
        -> Result<RenderedImage, FigmaError>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Live Figma API client
pub struct FigmaClient {
    base_url: String,
    token: String,
    http_client: Client,
    timeout: Duration,
}

impl FigmaClient {
    pub fn new(base_url: String, token: String, timeout: Duration) -> Result<Self, FigmaError> {
        if token.trim().is_empty() {
            return Err(FigmaError::MissingToken);
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FigmaError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http_client,
            timeout,
        })
    }

    pub fn file_url(&self, file_id: &str, node_id: Option<&str>) -> String {
        match node_id {
            Some(node) => format!("{}/files/{}/nodes?ids={}", self.base_url, file_id, node),
            None => format!("{}/files/{}", self.base_url, file_id),
        }
    }

    pub fn image_url(&self, file_id: &str, node_id: &str) -> String {
        format!(
            "{}/images/{}?ids={}&format=png&scale=1",
            self.base_url, file_id, node_id
        )
    }

    async fn get_json(&self, url: &str) -> Result<Value, FigmaError> {
        debug!(url, "GET Figma API");
        let start = Instant::now();

        let response = self
            .http_client
            .get(url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) if status.is_success() => return Err(FigmaError::Decode(e.to_string())),
            Err(_) => Value::Null,
        };

        debug!(
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Figma API responded"
        );

        if let Some(message) = api_error_message(&body) {
            return Err(FigmaError::Api {
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            return Err(FigmaError::Api {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            });
        }

        Ok(body)
    }

    async fn download(&self, url: &str) -> Result<Response, FigmaError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(FigmaError::Api {
                status: response.status().as_u16(),
                message: format!("Image download failed: {}", url),
            });
        }
        Ok(response)
    }

    fn map_send_error(&self, e: reqwest::Error) -> FigmaError {
        if e.is_timeout() {
            warn!("Figma request timed out after {:?}", self.timeout);
            FigmaError::Timeout(self.timeout.as_secs())
        } else {
            warn!("Figma request failed: {}", e);
            FigmaError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl FigmaSource for FigmaClient {
    async fn fetch_file(
        &self,
        file_id: &str,
        node_id: Option<&str>,
    ) -> Result<FigmaFile, FigmaError> {
        let body = self.get_json(&self.file_url(file_id, node_id)).await?;
        let file = match node_id {
            Some(_) => parse_nodes_response(body)?,
            None => parse_file_response(body)?,
        };
        info!(
            file_id,
            top_level_nodes = file.document.children.len(),
            "Fetched Figma document"
        );
        Ok(file)
    }

    async fn render_image(
        &self,
        file_id: &str,
        node_id: &str,
    ) -> Result<RenderedImage, FigmaError> {
        let body = self.get_json(&self.image_url(file_id, node_id)).await?;
        let image_url = first_image_url(&body)
            .ok_or_else(|| FigmaError::ImageNotRendered(node_id.to_string()))?;

        let bytes = self.download(&image_url).await?.bytes().await?;
        debug!(node_id, byte_size = bytes.len(), "Downloaded rendered image");

        Ok(RenderedImage::new(image_url, bytes.len()))
    }

    fn name(&self) -> &str {
        "figma-api"
    }
}

#[async_trait]
impl FigmaSource for Box<dyn FigmaSource> {
    async fn fetch_file(
        &self,
        file_id: &str,
        node_id: Option<&str>,
    ) -> Result<FigmaFile, FigmaError> {
        (**self).fetch_file(file_id, node_id).await
    }

    async fn render_image(
        &self,
        file_id: &str,
        node_id: &str,
    ) -> Result<RenderedImage, FigmaError> {
        (**self).render_image(file_id, node_id).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Extracts an error message from a Figma error body (`err` or `error` key)
fn api_error_message(body: &Value) -> Option<String> {
    if let Some(err) = body.get("err").and_then(Value::as_str) {
        return Some(err.to_string());
    }
    match body.get("error") {
        Some(Value::String(message)) => Some(message.clone()),
        Some(Value::Bool(true)) => Some(
            body.get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        ),
        _ => None,
    }
}

pub fn parse_file_response(body: Value) -> Result<FigmaFile, FigmaError> {
    serde_json::from_value(body).map_err(|e| FigmaError::Decode(e.to_string()))
}

#[derive(Deserialize)]
struct NodesResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    nodes: HashMap<String, Option<NodeEntry>>,
}

#[derive(Deserialize)]
struct NodeEntry {
    document: FigmaNode,
}

/// Normalizes a `/nodes` response into a file whose document children are
/// the requested nodes, ordered by node id.
pub fn parse_nodes_response(body: Value) -> Result<FigmaFile, FigmaError> {
    let response: NodesResponse =
        serde_json::from_value(body).map_err(|e| FigmaError::Decode(e.to_string()))?;

    let mut entries: Vec<(String, NodeEntry)> = response
        .nodes
        .into_iter()
        .filter_map(|(id, entry)| entry.map(|e| (id, e)))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let document = FigmaNode::new("DOCUMENT", "Document")
        .with_children(entries.into_iter().map(|(_, e)| e.document).collect());

    Ok(FigmaFile {
        name: response.name,
        document,
    })
}

fn first_image_url(body: &Value) -> Option<String> {
    body.get("images")?
        .as_object()?
        .values()
        .find_map(|v| v.as_str().filter(|s| !s.is_empty()))
        .map(str::to_string)
}

/// In-memory source serving a pre-loaded file, used for offline runs and tests
pub struct FixtureSource {
    file: FigmaFile,
    image: Option<RenderedImage>,
}

impl FixtureSource {
    pub fn new(file: FigmaFile) -> Self {
        Self { file, image: None }
    }

    /// Parses either a `/files` or a `/nodes` payload
    pub fn from_json(json: &str) -> Result<Self, FigmaError> {
        let body: Value =
            serde_json::from_str(json).map_err(|e| FigmaError::Decode(e.to_string()))?;
        let file = if body.get("nodes").is_some() {
            parse_nodes_response(body)?
        } else {
            parse_file_response(body)?
        };
        Ok(Self::new(file))
    }

    /// Reads a recorded API response from disk
    pub fn from_file(path: &Path) -> Result<Self, FigmaError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| FigmaError::Decode(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn with_image(mut self, image: RenderedImage) -> Self {
        self.image = Some(image);
        self
    }
}

#[async_trait]
impl FigmaSource for FixtureSource {
    async fn fetch_file(
        &self,
        _file_id: &str,
        _node_id: Option<&str>,
    ) -> Result<FigmaFile, FigmaError> {
        Ok(self.file.clone())
    }

    async fn render_image(
        &self,
        _file_id: &str,
        node_id: &str,
    ) -> Result<RenderedImage, FigmaError> {
        self.image
            .clone()
            .ok_or_else(|| FigmaError::ImageNotRendered(node_id.to_string()))
    }

    fn name(&self) -> &str {
        "fixture"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_requires_token() {
        let result = FigmaClient::new(
            "https://api.figma.com/v1".to_string(),
            "  ".to_string(),
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(FigmaError::MissingToken)));
    }

    #[test]
    fn test_request_urls() {
        let client = FigmaClient::new(
            "https://api.figma.com/v1/".to_string(),
            "token".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            client.file_url("abc", None),
            "https://api.figma.com/v1/files/abc"
        );
        assert_eq!(
            client.file_url("abc", Some("2:4")),
            "https://api.figma.com/v1/files/abc/nodes?ids=2:4"
        );
        assert_eq!(
            client.image_url("abc", "2:4"),
            "https://api.figma.com/v1/images/abc?ids=2:4&format=png&scale=1"
        );
    }

    #[test]
    fn test_api_error_message_variants() {
        assert_eq!(
            api_error_message(&json!({"status": 403, "err": "Invalid token"})),
            Some("Invalid token".to_string())
        );
        assert_eq!(
            api_error_message(&json!({"error": "Invalid token"})),
            Some("Invalid token".to_string())
        );
        assert_eq!(
            api_error_message(&json!({"error": true, "status": 404, "message": "Not found"})),
            Some("Not found".to_string())
        );
        assert_eq!(api_error_message(&json!({"error": false})), None);
        assert_eq!(api_error_message(&json!({"document": {}})), None);
    }

    #[test]
    fn test_parse_nodes_response_orders_children() {
        let body = json!({
            "name": "Checkout",
            "nodes": {
                "2:4": {"document": {"id": "2:4", "type": "FRAME", "name": "Pay"}},
                "1:1": {"document": {"id": "1:1", "type": "FRAME", "name": "Cart"}},
                "9:9": null
            }
        });

        let file = parse_nodes_response(body).unwrap();
        assert_eq!(file.name.as_deref(), Some("Checkout"));
        let names: Vec<_> = file.document.children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Cart", "Pay"]);
    }

    #[test]
    fn test_first_image_url_skips_null() {
        let body = json!({"images": {"1:2": null}});
        assert!(first_image_url(&body).is_none());

        let body = json!({"images": {"1:2": "https://cdn/img.png"}});
        assert_eq!(first_image_url(&body).as_deref(), Some("https://cdn/img.png"));
    }

    #[tokio::test]
    async fn test_fixture_source_serves_file() {
        let source = FixtureSource::from_json(
            r#"{"document": {"children": [{"type": "TEXT", "characters": "Login"}]}}"#,
        )
        .unwrap();

        let file = source.fetch_file("any", None).await.unwrap();
        assert_eq!(file.document.children.len(), 1);
        assert!(source.render_image("any", "1:1").await.is_err());
    }

    #[tokio::test]
    async fn test_boxed_source_delegates() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nodes.json");
        std::fs::write(
            &path,
            r#"{"nodes": {"1:2": {"document": {"id": "1:2", "type": "FRAME", "name": "Home"}}}}"#,
        )
        .unwrap();

        let source: Box<dyn FigmaSource> = Box::new(FixtureSource::from_file(&path).unwrap());
        assert_eq!(source.name(), "fixture");
        let file = source.fetch_file("any", Some("1:2")).await.unwrap();
        assert_eq!(file.document.children[0].name, "Home");

        assert!(FixtureSource::from_file(&dir.path().join("missing.json")).is_err());
    }
}
