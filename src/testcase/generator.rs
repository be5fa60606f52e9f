use super::rules::RulesConfig;
use super::templates;
use super::types::{CustomScenario, FeatureScenarios, Priority, TestCase, TestType};
use crate::analysis::{AnalysisReport, Requirement};
use crate::figma::Complexity;
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

const CUSTOM_SCENARIO_COMMENT: &str = "Custom scenario";
const FEATURE_SCENARIO_COMMENT: &str = "Scenario-based";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Invalid custom scenario #{index}: {message}")]
    InvalidScenario { index: usize, message: String },

    #[error("Invalid test case record #{index}: {message}")]
    InvalidRecord { index: usize, message: String },

    #[error("Expected a JSON array of test cases or an export envelope with 'testcases'")]
    UnexpectedShape,
}

/// Requirement category used by requirement-based cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementCategory {
    UserAuthentication,
    ProfileManagement,
    Notifications,
    Search,
    General,
}

impl RequirementCategory {
    const RULES: [(RequirementCategory, &'static [&'static str]); 4] = [
        (
            RequirementCategory::UserAuthentication,
            &["로그인", "login", "인증", "auth"],
        ),
        (
            RequirementCategory::ProfileManagement,
            &["프로필", "profile", "사용자정보"],
        ),
        (
            RequirementCategory::Notifications,
            &["알림", "notification", "푸시"],
        ),
        (
            RequirementCategory::Search,
            &["검색", "search", "필터", "filter"],
        ),
    ];

    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self::RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(RequirementCategory::General)
    }

    pub fn domain(self) -> &'static str {
        match self {
            RequirementCategory::UserAuthentication => "authentication",
            RequirementCategory::ProfileManagement => "profile",
            RequirementCategory::Notifications => "notification",
            RequirementCategory::Search => "search",
            RequirementCategory::General => "general",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RequirementCategory::UserAuthentication => "User Authentication",
            RequirementCategory::ProfileManagement => "Profile Management",
            RequirementCategory::Notifications => "Notifications",
            RequirementCategory::Search => "Search",
            RequirementCategory::General => "General",
        }
    }
}

/// Turns analysis results into test cases using fixed templates
pub struct TestCaseGenerator {
    rules: RulesConfig,
}

impl TestCaseGenerator {
    pub fn new(rules: RulesConfig) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn generate_from_analysis(
        &self,
        report: &AnalysisReport,
        custom_scenarios: &[CustomScenario],
    ) -> Result<Vec<TestCase>, GenerateError> {
        let elements = &report.ui_structure.ui_elements;
        let mut cases = Vec::new();

        for detected in &report.keywords.detected_patterns {
            cases.extend(templates::pattern_cases(detected.pattern, elements));
        }

        cases.extend(templates::flow_case(&report.user_flow));

        cases.extend(templates::button_case(elements.buttons.len()));
        if report.ui_structure.ui_complexity == Complexity::High {
            cases.push(templates::responsiveness_case());
        }

        for priority in &report.recommendations.testing_priorities {
            if priority.is_security() {
                cases.push(templates::security_case(priority.description()));
            }
        }

        for (index, scenario) in custom_scenarios.iter().enumerate() {
            cases.push(self.custom_case(index, scenario)?);
        }

        let generated = cases.len();
        let cases = optimize(cases);
        info!(
            generated,
            kept = cases.len(),
            file_id = %report.file.file_id,
            "Generated test cases"
        );
        Ok(cases)
    }

    /// Keeps cases at `min` priority or higher (P1 is highest)
    pub fn generate_by_priority(
        &self,
        report: &AnalysisReport,
        min: Priority,
    ) -> Result<Vec<TestCase>, GenerateError> {
        let cases = self.generate_from_analysis(report, &[])?;
        Ok(cases.into_iter().filter(|c| c.priority <= min).collect())
    }

    /// Generated cases whose titles are not among the existing ones
    pub fn identify_missing_tests(
        &self,
        existing: &[TestCase],
        report: &AnalysisReport,
    ) -> Result<Vec<TestCase>, GenerateError> {
        let titles: HashSet<&str> = existing.iter().map(|c| c.title.as_str()).collect();
        let missing: Vec<_> = self
            .generate_from_analysis(report, &[])?
            .into_iter()
            .filter(|c| !titles.contains(c.title.as_str()))
            .collect();
        debug!(existing = existing.len(), missing = missing.len(), "Compared test suites");
        Ok(missing)
    }

    pub fn generate_scenarios(&self, config: &FeatureScenarios) -> Vec<TestCase> {
        config
            .scenarios
            .iter()
            .map(|scenario| TestCase {
                feature: config.feature_name.clone(),
                title: format!("{} - {}", config.feature_name, scenario),
                priority: config.priority,
                comment: FEATURE_SCENARIO_COMMENT.to_string(),
                ..Default::default()
            })
            .collect()
    }

    /// Builds a generic functional case for one extracted requirement
    pub fn from_requirement(&self, requirement: &Requirement, test_type: Option<TestType>) -> TestCase {
        let text = requirement.text.as_str();
        let category = RequirementCategory::classify(text);
        let test_type = test_type.unwrap_or_default();

        let mut steps = vec![
            "Launch the application".to_string(),
            format!("Open the {} feature", text),
            "Check the feature behaves as designed".to_string(),
        ];
        let mut results = vec![
            "Feature works as expected".to_string(),
            "User interface is displayed correctly".to_string(),
            "Expected result is shown".to_string(),
        ];
        match test_type {
            TestType::Performance => {
                steps.push(format!("Measure the response time of {}", text));
                results.push("Response time is under 3 seconds".to_string());
            }
            TestType::Security => {
                steps.push(format!("Check {} for security vulnerabilities", text));
                results.push("No security vulnerabilities are found".to_string());
            }
            _ => {}
        }

        let number = |lines: Vec<String>| {
            lines
                .iter()
                .enumerate()
                .map(|(i, line)| format!("{}. {}", i + 1, line))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let mut comment = format!("Source: {}", requirement.source);
        if !requirement.node_id.is_empty() {
            comment.push_str(&format!(" (node {})", requirement.node_id));
        }

        TestCase {
            domain: category.domain().to_string(),
            section: category.label().to_string(),
            component: requirement.node_name.clone(),
            feature: text.to_string(),
            title: format!("{} feature test", text),
            precondition: "Application is running normally".to_string(),
            test_step: number(steps),
            expected_results: number(results),
            priority: self.rules.priority_for(text),
            test_type,
            comment,
            ..Default::default()
        }
    }

    pub fn from_requirements(
        &self,
        requirements: &[Requirement],
        test_type: Option<TestType>,
    ) -> Vec<TestCase> {
        let cases = requirements
            .iter()
            .map(|req| self.from_requirement(req, test_type))
            .collect();
        optimize(cases)
    }

    fn custom_case(&self, index: usize, scenario: &CustomScenario) -> Result<TestCase, GenerateError> {
        let mut record = template_record();
        for (key, value) in self.rules.normalize_fields(scenario) {
            record.insert(key, value);
        }
        record.insert(
            "comment".to_string(),
            Value::String(CUSTOM_SCENARIO_COMMENT.to_string()),
        );
        serde_json::from_value(Value::Object(record)).map_err(|e| GenerateError::InvalidScenario {
            index,
            message: e.to_string(),
        })
    }

    /// Reads test cases from a JSON array or from a JSON export envelope
    pub fn parse_records(&self, value: Value) -> Result<Vec<TestCase>, GenerateError> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut envelope) => match envelope.remove("testcases") {
                Some(Value::Array(items)) => items,
                _ => return Err(GenerateError::UnexpectedShape),
            },
            _ => return Err(GenerateError::UnexpectedShape),
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let Value::Object(record) = item else {
                    return Err(GenerateError::InvalidRecord {
                        index,
                        message: "not a JSON object".to_string(),
                    });
                };
                let record = self.rules.normalize_fields(&record);
                serde_json::from_value(Value::Object(record)).map_err(|e| {
                    GenerateError::InvalidRecord {
                        index,
                        message: e.to_string(),
                    }
                })
            })
            .collect()
    }
}

fn template_record() -> Map<String, Value> {
    match serde_json::to_value(TestCase::default()) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Drops repeated titles (first wins) and orders by priority, keeping
/// generation order within a priority
pub fn optimize(cases: Vec<TestCase>) -> Vec<TestCase> {
    let mut seen = HashSet::new();
    let mut unique: Vec<TestCase> = cases
        .into_iter()
        .filter(|c| seen.insert(c.title.clone()))
        .collect();
    unique.sort_by_key(|c| c.priority);
    unique
}
