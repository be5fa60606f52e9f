use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Canonical output columns, in export order
pub const COLUMNS: [&str; 13] = [
    "domain",
    "section",
    "component",
    "feature",
    "title",
    "precondition",
    "test_step",
    "expected_results",
    "priority",
    "type",
    "comment",
    "web_result",
    "app_result",
];

/// Deserializes through [`FromStr`], so `"p1"` is accepted like on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Priority {
    P1,
    P2,
    P3,
    P4,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::P1, Priority::P2, Priority::P3, Priority::P4];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
            Priority::P4 => "P4",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::P2
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "P1" => Ok(Priority::P1),
            "P2" => Ok(Priority::P2),
            "P3" => Ok(Priority::P3),
            "P4" => Ok(Priority::P4),
            other => Err(format!("Invalid priority '{}'. Expected P1, P2, P3 or P4", other)),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum TestType {
    #[default]
    Functional,
    #[serde(rename = "UI")]
    Ui,
    Security,
    Performance,
    Accessibility,
    Usability,
}

impl TestType {
    pub fn as_str(self) -> &'static str {
        match self {
            TestType::Functional => "Functional",
            TestType::Ui => "UI",
            TestType::Security => "Security",
            TestType::Performance => "Performance",
            TestType::Accessibility => "Accessibility",
            TestType::Usability => "Usability",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestType {
    type Err = String;

    /// Case-insensitive; also accepts the Korean labels used by older MCP clients
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let test_type = match lower.as_str() {
            "functional" | "기능" => TestType::Functional,
            "ui" | "ui테스트" => TestType::Ui,
            "security" | "보안" => TestType::Security,
            "performance" | "성능" | "성능테스트" => TestType::Performance,
            "accessibility" | "접근성" => TestType::Accessibility,
            "usability" | "사용성" => TestType::Usability,
            _ => return Err(format!("Unknown test type '{}'", s)),
        };
        Ok(test_type)
    }
}

/// One row of the generated test suite
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestCase {
    pub domain: String,
    pub section: String,
    pub component: String,
    pub feature: String,
    pub title: String,
    pub precondition: String,
    pub test_step: String,
    pub expected_results: String,
    pub priority: Priority,
    #[serde(rename = "type")]
    pub test_type: TestType,
    pub comment: String,
    pub web_result: String,
    pub app_result: String,
}

impl TestCase {
    /// Cell value for a canonical column name; unknown columns are empty
    pub fn field(&self, column: &str) -> String {
        match column {
            "domain" => self.domain.clone(),
            "section" => self.section.clone(),
            "component" => self.component.clone(),
            "feature" => self.feature.clone(),
            "title" => self.title.clone(),
            "precondition" => self.precondition.clone(),
            "test_step" => self.test_step.clone(),
            "expected_results" => self.expected_results.clone(),
            "priority" => self.priority.to_string(),
            "type" => self.test_type.to_string(),
            "comment" => self.comment.clone(),
            "web_result" => self.web_result.clone(),
            "app_result" => self.app_result.clone(),
            _ => String::new(),
        }
    }
}

/// Partial test-case record supplied by the user, keyed by column name
pub type CustomScenario = Map<String, Value>;

/// Scenario list for one feature, usually read from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScenarios {
    #[serde(default = "default_feature_name")]
    pub feature_name: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub scenarios: Vec<String>,
}

fn default_feature_name() -> String {
    "Unknown Feature".to_string()
}
