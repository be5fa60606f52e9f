use super::patterns::UiPattern;
use super::types::{KeywordAnalysis, Recommendations, TestingPriority, UiStructure, UserFlow};
use crate::figma::Complexity;

const MANY_BUTTONS: usize = 5;
const LONG_FLOW_STEPS: usize = 5;

pub fn recommend(
    keywords: &KeywordAnalysis,
    structure: &UiStructure,
    flow: &UserFlow,
) -> Recommendations {
    let mut recommendations = Recommendations::default();

    if structure.ui_complexity == Complexity::High {
        recommendations
            .ui_improvements
            .push("Simplify the UI; complexity is high".to_string());
    }
    if structure.ui_elements.buttons.len() > MANY_BUTTONS {
        recommendations
            .ui_improvements
            .push("Clarify the priority of primary action buttons".to_string());
    }

    let priorities = [
        (UiPattern::Authentication, TestingPriority::AuthenticationFlow),
        (UiPattern::Transaction, TestingPriority::TransactionSecurity),
        (UiPattern::FormInput, TestingPriority::InputValidation),
    ];
    for (pattern, priority) in priorities {
        if keywords.has_pattern(pattern) {
            recommendations.testing_priorities.push(priority);
        }
    }

    if flow.flow_steps.len() > LONG_FLOW_STEPS {
        recommendations
            .user_experience
            .push("Consider reducing the number of user flow steps".to_string());
    }

    recommendations
}
