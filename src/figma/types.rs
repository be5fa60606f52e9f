use serde::{Deserialize, Serialize};
use std::fmt;

/// A node in the Figma document tree.
///
/// Only the fields the analyzers read are modeled; everything else in the
/// API payload is ignored. All fields default so partial fixtures parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FigmaNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FigmaNode>,
}

impl FigmaNode {
    pub fn new(node_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn text(name: impl Into<String>, characters: impl Into<String>) -> Self {
        Self {
            node_type: "TEXT".to_string(),
            name: name.into(),
            characters: Some(characters.into()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_children(mut self, children: Vec<FigmaNode>) -> Self {
        self.children = children;
        self
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::from_type(&self.node_type)
    }

    /// Trimmed text content for TEXT nodes
    pub fn text_content(&self) -> Option<&str> {
        match self.kind() {
            NodeKind::Text => self.characters.as_deref().map(str::trim),
            _ => None,
        }
    }
}

/// Node types the analyzers distinguish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Text,
    Frame,
    Group,
    Component,
    Instance,
    Other,
}

impl NodeKind {
    pub fn from_type(node_type: &str) -> Self {
        match node_type {
            "TEXT" => NodeKind::Text,
            "FRAME" => NodeKind::Frame,
            "GROUP" => NodeKind::Group,
            "COMPONENT" => NodeKind::Component,
            "INSTANCE" => NodeKind::Instance,
            _ => NodeKind::Other,
        }
    }

    /// Frame-like nodes whose names describe a screen or component
    pub fn is_named_container(self) -> bool {
        matches!(
            self,
            NodeKind::Frame | NodeKind::Component | NodeKind::Instance
        )
    }

    pub fn is_component(self) -> bool {
        matches!(self, NodeKind::Component | NodeKind::Instance)
    }
}

/// A fetched file (or node subset), normalized to a single document root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FigmaFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub document: FigmaNode,
}

impl FigmaFile {
    pub fn new(document: FigmaNode) -> Self {
        Self {
            name: None,
            document,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Size-based complexity bucket, shared by the image and structure analyzers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        };
        write!(f, "{}", s)
    }
}

/// Result of rendering a node to PNG and downloading it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedImage {
    pub image_url: String,
    pub byte_size: usize,
    pub complexity: Complexity,
}

impl RenderedImage {
    pub fn new(image_url: String, byte_size: usize) -> Self {
        let complexity = if byte_size > 500_000 {
            Complexity::High
        } else if byte_size > 100_000 {
            Complexity::Medium
        } else {
            Complexity::Low
        };
        Self {
            image_url,
            byte_size,
            complexity,
        }
    }
}
