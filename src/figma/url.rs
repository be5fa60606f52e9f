use super::error::FigmaError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// File and node reference extracted from a Figma share link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigmaLink {
    pub file_id: String,
    pub node_id: Option<String>,
    pub url: String,
}

impl FigmaLink {
    /// Node id in the form the REST API expects (`2-4` becomes `2:4`)
    pub fn api_node_id(&self) -> Option<String> {
        self.node_id.as_deref().map(to_api_node_id)
    }
}

pub fn to_api_node_id(node_id: &str) -> String {
    node_id.replace('-', ":")
}

fn file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"figma\.com/(?:design|file|proto|board)/([A-Za-z0-9]+)")
            .expect("valid regex")
    })
}

fn node_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[?&]node-id=([^&#]+)").expect("valid regex"))
}

/// Extracts the file id and optional node id from a Figma URL
pub fn parse_figma_url(url: &str) -> Result<FigmaLink, FigmaError> {
    let url = url.trim();
    let file_id = file_regex()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| FigmaError::InvalidUrl(url.to_string()))?;

    let node_id = node_regex()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace("%3A", ":").replace("%3a", ":"))
        .filter(|id| !id.is_empty());

    Ok(FigmaLink {
        file_id,
        node_id,
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[test]
    fn test_parse_design_url_with_node() {
        let link = parse_figma_url(
            "https://www.figma.com/design/iZNsaQjAyHxElK9mNXKqXB/X-OAuth?node-id=2-4",
        )
        .unwrap();

        assert_eq!(link.file_id, "iZNsaQjAyHxElK9mNXKqXB");
        assert_eq!(link.node_id.as_deref(), Some("2-4"));
        assert_eq!(link.api_node_id().as_deref(), Some("2:4"));
    }

    #[test]
    fn test_parse_url_without_node() {
        let link = parse_figma_url("https://www.figma.com/file/abc123/Landing").unwrap();
        assert_eq!(link.file_id, "abc123");
        assert!(link.node_id.is_none());
        assert!(link.api_node_id().is_none());
    }

    #[test]
    fn test_node_id_among_other_params() {
        let link =
            parse_figma_url("https://figma.com/design/abc/X?t=zz&node-id=10%3A20&mode=dev")
                .unwrap();
        assert_eq!(link.node_id.as_deref(), Some("10:20"));
    }

    #[parameterized(
        other_host = { "https://invalid-url.com" },
        empty = { "" },
        missing_id = { "https://www.figma.com/design/" },
        community = { "https://www.figma.com/community/plugin/123" },
    )]
    fn test_invalid_urls(url: &str) {
        assert!(matches!(
            parse_figma_url(url),
            Err(FigmaError::InvalidUrl(_))
        ));
    }
}
