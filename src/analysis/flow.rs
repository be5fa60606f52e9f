use super::patterns::UiPattern;
use super::types::{KeywordAnalysis, UiStructure, UserFlow};

pub const STEP_AUTHENTICATE: &str = "User authentication";
pub const STEP_ENTER_SCREEN: &str = "Screen entry";
pub const STEP_ENTER_INFORMATION: &str = "Enter information";
pub const STEP_EXECUTE_ACTION: &str = "Execute action";
pub const STEP_SELECT_OPTION: &str = "Select option";
pub const STEP_CHECK_RESULT: &str = "Check result";

const DEFAULT_FLOW_TYPE: &str = "general";

/// Infers the user journey from detected patterns and element counts
pub fn infer_user_flow(keywords: &KeywordAnalysis, structure: &UiStructure) -> UserFlow {
    let elements = &structure.ui_elements;
    let mut flow_steps = Vec::new();

    if keywords.has_pattern(UiPattern::Authentication) {
        flow_steps.push(STEP_AUTHENTICATE.to_string());
    } else {
        flow_steps.push(STEP_ENTER_SCREEN.to_string());
    }

    if !elements.inputs.is_empty() {
        flow_steps.push(STEP_ENTER_INFORMATION.to_string());
    }

    match elements.buttons.len() {
        0 => {}
        1 => flow_steps.push(STEP_EXECUTE_ACTION.to_string()),
        _ => flow_steps.push(STEP_SELECT_OPTION.to_string()),
    }

    flow_steps.push(STEP_CHECK_RESULT.to_string());

    // Strictly greater, so the earliest pattern keeps ties
    let mut primary_flow_type = DEFAULT_FLOW_TYPE.to_string();
    let mut confidence = 0;
    for detected in &keywords.detected_patterns {
        if detected.confidence > confidence {
            confidence = detected.confidence;
            primary_flow_type = detected.flow_type.clone();
        }
    }

    UserFlow {
        flow_steps,
        primary_flow_type,
        confidence,
        complexity: structure.ui_complexity,
    }
}
