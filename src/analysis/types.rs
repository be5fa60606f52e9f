use super::patterns::{FlowPattern, UiPattern};
use crate::figma::{Complexity, FigmaLink, RenderedImage};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementSource {
    /// Copy text of a TEXT node
    TextNode,
    /// Layer name of any node
    NodeName,
}

impl fmt::Display for RequirementSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementSource::TextNode => write!(f, "text_node"),
            RequirementSource::NodeName => write!(f, "node_name"),
        }
    }
}

/// A piece of design text that reads like a product requirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub text: String,
    pub source: RequirementSource,
    #[serde(default)]
    pub node_id: String,
    #[serde(default)]
    pub node_name: String,
    #[serde(default)]
    pub depth: usize,
}

impl Requirement {
    pub fn new(text: impl Into<String>, source: RequirementSource) -> Self {
        Self {
            text: text.into(),
            source,
            node_id: String::new(),
            node_name: String::new(),
            depth: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEntry {
    pub text: String,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameEntry {
    pub name: String,
    pub node_type: String,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedPattern {
    pub pattern: UiPattern,
    pub matches: usize,
    pub flow_type: String,
    pub confidence: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFlow {
    pub flow: FlowPattern,
    pub matches: usize,
    pub confidence: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub texts: Vec<TextEntry>,
    pub names: Vec<NameEntry>,
    /// In detection order
    pub detected_patterns: Vec<DetectedPattern>,
    pub detected_flows: Vec<DetectedFlow>,
    pub total_elements: usize,
}

impl KeywordAnalysis {
    pub fn has_pattern(&self, pattern: UiPattern) -> bool {
        self.detected_patterns.iter().any(|p| p.pattern == pattern)
    }

    pub fn pattern_names(&self) -> Vec<UiPattern> {
        self.detected_patterns.iter().map(|p| p.pattern).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiElement {
    pub name: String,
    pub depth: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiElements {
    pub buttons: Vec<UiElement>,
    pub inputs: Vec<UiElement>,
    pub navigation: Vec<UiElement>,
    pub containers: Vec<UiElement>,
}

impl UiElements {
    pub fn total(&self) -> usize {
        self.buttons.len() + self.inputs.len() + self.navigation.len() + self.containers.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub depth_levels: usize,
    pub max_children: usize,
    pub component_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiStructure {
    pub ui_elements: UiElements,
    pub layout_info: LayoutInfo,
    pub ui_complexity: Complexity,
}

impl Default for UiStructure {
    fn default() -> Self {
        Self {
            ui_elements: UiElements::default(),
            layout_info: LayoutInfo::default(),
            ui_complexity: Complexity::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFlow {
    pub flow_steps: Vec<String>,
    pub primary_flow_type: String,
    /// Confidence of the winning pattern, 0..=100
    pub confidence: u32,
    pub complexity: Complexity,
}

/// Areas the recommendations ask QA to cover first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestingPriority {
    AuthenticationFlow,
    TransactionSecurity,
    InputValidation,
}

impl TestingPriority {
    pub fn is_security(self) -> bool {
        matches!(self, TestingPriority::TransactionSecurity)
    }

    pub fn description(self) -> &'static str {
        match self {
            TestingPriority::AuthenticationFlow => "Run authentication flow tests first",
            TestingPriority::TransactionSecurity => "Security testing of trading features is mandatory",
            TestingPriority::InputValidation => "Cover input validation",
        }
    }
}

impl fmt::Display for TestingPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub ui_improvements: Vec<String>,
    pub testing_priorities: Vec<TestingPriority>,
    pub user_experience: Vec<String>,
}

/// Outcome of the optional screenshot step; failures are kept, not raised
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScreenshotAnalysis {
    Rendered(RenderedImage),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_elements: usize,
    pub ui_patterns: Vec<UiPattern>,
    pub flow_type: String,
    pub confidence: u32,
    pub ui_complexity: Complexity,
}

/// Result of the requirement-only analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicReport {
    pub file: FigmaLink,
    pub requirements: Vec<Requirement>,
}

/// Result of the full analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub file: FigmaLink,
    pub requirements: Vec<Requirement>,
    pub keywords: KeywordAnalysis,
    pub ui_structure: UiStructure,
    pub user_flow: UserFlow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<ScreenshotAnalysis>,
    pub recommendations: Recommendations,
    pub summary: AnalysisSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change<T> {
    pub from: T,
    pub to: T,
}

impl<T: PartialEq> Change<T> {
    pub fn is_changed(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Differences {
    pub new_patterns: Vec<UiPattern>,
    pub removed_patterns: Vec<UiPattern>,
    pub ui_complexity_change: Change<Complexity>,
    pub flow_type_change: Change<String>,
}

/// AS-IS versus TO-BE comparison of two screens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenComparison {
    pub as_is: AnalysisSummary,
    pub to_be: AnalysisSummary,
    pub differences: Differences,
    pub recommendations: Vec<String>,
}
