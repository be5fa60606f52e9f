//! Cross-validation of generated test cases against the checklist

use super::checklist::Checklist;
use crate::analysis::UserFlow;
use crate::testcase::{RulesConfig, TestCase};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Completeness score at which a draft is approved
pub const APPROVAL_THRESHOLD: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Pass,
    PartialPass,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Pass => write!(f, "PASS"),
            ValidationStatus::PartialPass => write!(f, "PARTIAL_PASS"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub validation_result: ValidationStatus,
    /// Covered checklist items as a percentage, 0..=100
    pub completeness_score: u32,
    pub issues: Vec<String>,
    pub missing_testcases: Vec<String>,
    pub clarification_questions: Vec<String>,
    pub recommendations: Vec<String>,
    pub approved: bool,
}

pub fn cross_validate(
    checklist: &Checklist,
    cases: &[TestCase],
    flow: &UserFlow,
    rules: &RulesConfig,
) -> ValidationResult {
    let titles: HashSet<&str> = cases.iter().map(|c| c.title.as_str()).collect();
    let expected = checklist.expected_titles();
    let missing_testcases: Vec<String> = expected
        .iter()
        .filter(|t| !titles.contains(t.as_str()))
        .cloned()
        .collect();

    let covered = expected.len() - missing_testcases.len();
    let completeness_score = completeness(covered, expected.len());

    let mut issues = Vec::new();
    if expected.is_empty() {
        issues.push("Checklist is empty; nothing to validate against".to_string());
    }
    if checklist.ui_elements.is_empty() {
        issues.push("No UI elements were recognized in the design requirements".to_string());
    }
    if !missing_testcases.is_empty() {
        issues.push(format!(
            "{} checklist item(s) have no test case",
            missing_testcases.len()
        ));
    }

    let clarification_questions = if needs_clarification(flow, rules) {
        rules.flow_clarification.default_questions.clone()
    } else {
        Vec::new()
    };

    let approved = completeness_score >= APPROVAL_THRESHOLD;
    let validation_result = if approved {
        ValidationStatus::Pass
    } else {
        ValidationStatus::PartialPass
    };

    ValidationResult {
        validation_result,
        completeness_score,
        issues,
        missing_testcases,
        clarification_questions,
        recommendations: vec![
            "Review the priority of each test case".to_string(),
            "Add boundary value tests for input fields".to_string(),
            "Add negative cases for error paths".to_string(),
        ],
        approved,
    }
}

/// Percentage of `covered` over `total`, capped at 100; zero when there is nothing to cover
pub fn completeness(covered: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((covered * 100 / total) as u32).min(100)
}

fn needs_clarification(flow: &UserFlow, rules: &RulesConfig) -> bool {
    f64::from(flow.confidence) / 100.0 < rules.flow_clarification.confidence_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figma::Complexity;
    use crate::pipeline::checklist::{build_checklist, checklist_cases, PipelineRequirement, RequirementKind};
    use yare::parameterized;

    fn flow(confidence: u32) -> UserFlow {
        UserFlow {
            flow_steps: vec![],
            primary_flow_type: "general".to_string(),
            confidence,
            complexity: Complexity::Low,
        }
    }

    fn checklist(rules: &RulesConfig) -> Checklist {
        let requirements = vec![PipelineRequirement {
            kind: RequirementKind::Design,
            content: "Submit button".to_string(),
        }];
        build_checklist(&requirements, rules, "Shop", "Checkout")
    }

    #[parameterized(
        nothing = { 0, 0, 0 },
        all = { 12, 12, 100 },
        most = { 10, 12, 83 },
        half = { 6, 12, 50 },
        over = { 20, 12, 100 },
    )]
    fn test_completeness(covered: usize, total: usize, expected: u32) {
        assert_eq!(completeness(covered, total), expected);
    }

    #[test]
    fn test_full_coverage_passes() {
        let rules = RulesConfig::embedded().unwrap();
        let checklist = checklist(&rules);
        let cases = checklist_cases(&checklist, &rules);

        let result = cross_validate(&checklist, &cases, &flow(90), &rules);

        assert_eq!(result.validation_result, ValidationStatus::Pass);
        assert_eq!(result.completeness_score, 100);
        assert!(result.approved);
        assert!(result.missing_testcases.is_empty());
        assert!(result.clarification_questions.is_empty());
        assert_eq!(result.recommendations.len(), 3);
    }

    #[test]
    fn test_missing_cases_partial_pass() {
        let rules = RulesConfig::embedded().unwrap();
        let checklist = checklist(&rules);
        let cases: Vec<_> = checklist_cases(&checklist, &rules)
            .into_iter()
            .take(4)
            .collect();

        let result = cross_validate(&checklist, &cases, &flow(90), &rules);

        assert_eq!(result.validation_result, ValidationStatus::PartialPass);
        assert!(!result.approved);
        assert_eq!(result.missing_testcases.len(), checklist.item_count() - 4);
        assert!(result.issues.iter().any(|i| i.contains("have no test case")));
    }

    #[test]
    fn test_low_confidence_raises_questions() {
        let rules = RulesConfig::embedded().unwrap();
        let checklist = checklist(&rules);
        let cases = checklist_cases(&checklist, &rules);

        let result = cross_validate(&checklist, &cases, &flow(50), &rules);
        assert_eq!(
            result.clarification_questions,
            rules.flow_clarification.default_questions
        );
    }

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&ValidationStatus::PartialPass).unwrap(),
            "\"PARTIAL_PASS\""
        );
    }
}
