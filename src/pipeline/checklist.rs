//! Requirement collection, checklist building and checklist-driven test cases

use crate::analysis::AnalysisReport;
use crate::testcase::{RulesConfig, TestCase, TestType};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Requirement words that mark a UI element worth a checklist entry
const UI_ELEMENT_KEYWORDS: [&str; 6] = ["button", "input", "field", "card", "modal", "tab"];

const ELEMENT_CHECKS: [&str; 4] = [
    "Element is displayed",
    "Click/tap behavior",
    "State change (enabled/disabled)",
    "Error handling",
];

const ACCESSIBILITY_ITEMS: [&str; 5] = [
    "Keyboard navigation support",
    "Screen reader support (ARIA)",
    "Color contrast (WCAG AA)",
    "Focus indicator",
    "Alternative text",
];

const RESPONSIVE_ITEMS: [&str; 3] = [
    "Mobile layout (320px-767px)",
    "Tablet layout (768px-1023px)",
    "Desktop layout (1024px+)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    /// Copy or layer name taken from the design
    Design,
    /// Step of the inferred user flow
    FlowStep,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRequirement {
    pub kind: RequirementKind,
    pub content: String,
}

/// Requirement texts followed by the user flow steps
pub fn collect_requirements(report: &AnalysisReport) -> Vec<PipelineRequirement> {
    let design = report.requirements.iter().map(|r| PipelineRequirement {
        kind: RequirementKind::Design,
        content: r.text.clone(),
    });
    let flow = report.user_flow.flow_steps.iter().map(|s| PipelineRequirement {
        kind: RequirementKind::FlowStep,
        content: s.clone(),
    });
    design.chain(flow).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementChecklist {
    pub element: String,
    pub checks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryChecklist {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub domain: String,
    pub feature: String,
    pub generated_at: String,
    pub ui_elements: Vec<ElementChecklist>,
    pub user_flow: Vec<String>,
    pub categories: Vec<CategoryChecklist>,
}

impl Checklist {
    /// Number of individual checks, each expected to get one test case
    pub fn item_count(&self) -> usize {
        let elements: usize = self.ui_elements.iter().map(|e| e.checks.len()).sum();
        let categories: usize = self.categories.iter().map(|c| c.items.len()).sum();
        elements + categories
    }

    /// Test case titles that cover the checklist, in checklist order
    pub fn expected_titles(&self) -> Vec<String> {
        let elements = self.ui_elements.iter().flat_map(|e| {
            e.checks
                .iter()
                .map(move |check| element_title(&e.element, check))
        });
        let categories = self.categories.iter().flat_map(|c| {
            c.items
                .iter()
                .map(move |item| category_title(&c.category, item))
        });
        elements.chain(categories).collect()
    }
}

/// Items for a coverage category; unknown categories have none
pub fn category_items(category: &str) -> &'static [&'static str] {
    match category.to_lowercase().as_str() {
        "accessibility" => &ACCESSIBILITY_ITEMS,
        "responsive" => &RESPONSIVE_ITEMS,
        _ => &[],
    }
}

pub fn build_checklist(
    requirements: &[PipelineRequirement],
    rules: &RulesConfig,
    domain: &str,
    feature: &str,
) -> Checklist {
    let ui_elements = requirements
        .iter()
        .filter(|r| is_ui_element(&r.content))
        .map(|r| ElementChecklist {
            element: r.content.clone(),
            checks: ELEMENT_CHECKS.iter().map(|c| c.to_string()).collect(),
        })
        .collect();

    let user_flow = requirements
        .iter()
        .filter(|r| r.kind == RequirementKind::FlowStep)
        .map(|r| r.content.clone())
        .collect();

    let categories = rules
        .coverage_rules
        .always_include_categories
        .iter()
        .map(|category| CategoryChecklist {
            category: category.to_lowercase(),
            items: category_items(category)
                .iter()
                .map(|i| i.to_string())
                .collect(),
        })
        .collect();

    Checklist {
        domain: domain.to_string(),
        feature: feature.to_string(),
        generated_at: Local::now().to_rfc3339(),
        ui_elements,
        user_flow,
        categories,
    }
}

fn is_ui_element(text: &str) -> bool {
    let lower = text.to_lowercase();
    UI_ELEMENT_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn element_title(element: &str, check: &str) -> String {
    format!("{} - {}", element, check)
}

fn category_title(category: &str, item: &str) -> String {
    format!("{} - {}", capitalize(category), item)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One case per element check, then one per category item
pub fn checklist_cases(checklist: &Checklist, rules: &RulesConfig) -> Vec<TestCase> {
    let mut cases = Vec::with_capacity(checklist.item_count());

    for entry in &checklist.ui_elements {
        let priority = rules.priority_for(&entry.element);
        for check in &entry.checks {
            cases.push(TestCase {
                domain: checklist.domain.clone(),
                section: checklist.feature.clone(),
                component: entry.element.clone(),
                feature: check.clone(),
                title: element_title(&entry.element, check),
                precondition: "The screen under test is open".to_string(),
                test_step: format!("1. Locate {}\n2. Verify: {}", entry.element, check),
                expected_results: format!("{} works as designed", check),
                priority,
                test_type: TestType::Functional,
                comment: "Checklist".to_string(),
                ..Default::default()
            });
        }
    }

    for category in &checklist.categories {
        let test_type = if category.category == "accessibility" {
            TestType::Accessibility
        } else {
            TestType::Ui
        };
        for item in &category.items {
            cases.push(TestCase {
                domain: checklist.domain.clone(),
                section: checklist.feature.clone(),
                component: capitalize(&category.category),
                feature: item.clone(),
                title: category_title(&category.category, item),
                precondition: "The screen under test is open".to_string(),
                test_step: format!("1. Open the screen\n2. Verify: {}", item),
                expected_results: format!("{} is satisfied", item),
                priority: rules.priority_rules.default,
                test_type,
                comment: "Checklist".to_string(),
                ..Default::default()
            });
        }
    }

    cases
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testcase::Priority;

    fn requirements() -> Vec<PipelineRequirement> {
        vec![
            PipelineRequirement {
                kind: RequirementKind::Design,
                content: "Login Button".to_string(),
            },
            PipelineRequirement {
                kind: RequirementKind::Design,
                content: "Welcome back".to_string(),
            },
            PipelineRequirement {
                kind: RequirementKind::FlowStep,
                content: "Enter information".to_string(),
            },
        ]
    }

    fn rules() -> RulesConfig {
        RulesConfig::embedded().unwrap()
    }

    #[test]
    fn test_checklist_picks_ui_elements_and_categories() {
        let checklist = build_checklist(&requirements(), &rules(), "Auth", "Login");

        assert_eq!(checklist.ui_elements.len(), 1);
        assert_eq!(checklist.ui_elements[0].element, "Login Button");
        assert_eq!(checklist.ui_elements[0].checks.len(), 4);
        assert_eq!(checklist.user_flow, vec!["Enter information"]);

        let names: Vec<_> = checklist.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["accessibility", "responsive"]);
        assert_eq!(checklist.item_count(), 4 + 5 + 3);
    }

    #[test]
    fn test_checklist_cases_cover_every_item() {
        let rules = rules();
        let checklist = build_checklist(&requirements(), &rules, "Auth", "Login");
        let cases = checklist_cases(&checklist, &rules);

        assert_eq!(cases.len(), checklist.item_count());
        let titles: Vec<_> = cases.iter().map(|c| c.title.clone()).collect();
        assert_eq!(titles, checklist.expected_titles());

        let first = &cases[0];
        assert_eq!(first.title, "Login Button - Element is displayed");
        assert_eq!(first.section, "Login");
        // "login" is a P1 keyword in the shipped rules
        assert_eq!(first.priority, Priority::P1);

        let a11y = cases.iter().find(|c| c.component == "Accessibility").unwrap();
        assert_eq!(a11y.test_type, TestType::Accessibility);
        assert_eq!(a11y.priority, rules.priority_rules.default);
    }

    #[test]
    fn test_unknown_category_has_no_items() {
        assert!(category_items("performance").is_empty());
        assert_eq!(category_items("Responsive").len(), 3);
    }
}
