//! Fixed test-case templates keyed by detected pattern and UI element

use super::types::{Priority, TestCase, TestType};
use crate::analysis::{UiElements, UiPattern, UserFlow};

fn numbered<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| format!("{}. {}", i + 1, line.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

struct Template {
    domain: &'static str,
    section: &'static str,
    component: &'static str,
    feature: &'static str,
    title: &'static str,
    precondition: String,
    steps: &'static [&'static str],
    results: &'static [&'static str],
    priority: Priority,
    test_type: TestType,
    comment: &'static str,
}

impl From<Template> for TestCase {
    fn from(t: Template) -> Self {
        TestCase {
            domain: t.domain.to_string(),
            section: t.section.to_string(),
            component: t.component.to_string(),
            feature: t.feature.to_string(),
            title: t.title.to_string(),
            precondition: t.precondition,
            test_step: numbered(t.steps),
            expected_results: numbered(t.results),
            priority: t.priority,
            test_type: t.test_type,
            comment: t.comment.to_string(),
            ..Default::default()
        }
    }
}

/// Cases for one detected UI pattern
pub fn pattern_cases(pattern: UiPattern, elements: &UiElements) -> Vec<TestCase> {
    match pattern {
        UiPattern::Authentication => authentication(),
        UiPattern::FormInput => form_input(elements.inputs.len()),
        UiPattern::Navigation => navigation(elements.navigation.len()),
        UiPattern::ModalPopup => vec![modal_popup()],
        UiPattern::Transaction => vec![transaction()],
        UiPattern::Social => vec![social()],
        UiPattern::Settings => vec![settings()],
    }
}

fn authentication() -> Vec<TestCase> {
    vec![
        Template {
            domain: "authentication",
            section: "User Authentication",
            component: "Login",
            feature: "Basic Login",
            title: "Successful login flow",
            precondition: "App is installed and the network is available".to_string(),
            steps: &[
                "Launch the app",
                "Check the login screen",
                "Enter valid account credentials",
                "Tap the login button",
            ],
            results: &[
                "App launches normally",
                "Login screen is displayed",
                "Credentials are entered",
                "User lands on the main screen",
            ],
            priority: Priority::P1,
            test_type: TestType::Functional,
            comment: "Generated - authentication pattern",
        }
        .into(),
        Template {
            domain: "authentication",
            section: "User Authentication",
            component: "Login",
            feature: "Login Error Handling",
            title: "Login attempt with invalid credentials",
            precondition: "Login screen is displayed".to_string(),
            steps: &[
                "Enter an invalid email",
                "Enter an invalid password",
                "Tap the login button",
                "Check the error message",
            ],
            results: &[
                "Email is entered",
                "Password is entered",
                "Login fails",
                "'Please check your account details' error is shown",
            ],
            priority: Priority::P1,
            test_type: TestType::Functional,
            comment: "Generated - error handling",
        }
        .into(),
    ]
}

fn form_input(input_count: usize) -> Vec<TestCase> {
    if input_count == 0 {
        return Vec::new();
    }
    vec![Template {
        domain: "form",
        section: "Form Input",
        component: "Input Validation",
        feature: "Form Validation",
        title: "Required field validation",
        precondition: format!("Input form is displayed ({} fields)", input_count),
        steps: &[
            "Leave required fields empty and try to save",
            "Check the error message",
            "Fill in required fields and save",
            "Check the save confirmation",
        ],
        results: &[
            "Save is rejected",
            "'Please fill in required fields' error is shown",
            "Save is attempted",
            "Save confirmation is shown",
        ],
        priority: Priority::P1,
        test_type: TestType::Functional,
        comment: "Generated - form validation",
    }
    .into()]
}

fn navigation(menu_count: usize) -> Vec<TestCase> {
    if menu_count == 0 {
        return Vec::new();
    }
    vec![Template {
        domain: "navigation",
        section: "Navigation",
        component: "Menu Navigation",
        feature: "Basic Navigation",
        title: "Basic menu navigation",
        precondition: format!(
            "Navigation menu is shown on the main screen ({} menus)",
            menu_count
        ),
        steps: &[
            "Tap each menu item",
            "Check the destination page",
            "Check the back button",
            "Check the selected menu state",
        ],
        results: &[
            "Menu taps respond",
            "The correct page opens",
            "Back navigation works",
            "The current menu is highlighted",
        ],
        priority: Priority::P1,
        test_type: TestType::Functional,
        comment: "Generated - navigation",
    }
    .into()]
}

fn modal_popup() -> TestCase {
    Template {
        domain: "ui",
        section: "Modal",
        component: "Popup Dialog",
        feature: "Modal Interaction",
        title: "Basic modal popup behavior",
        precondition: "Screen has an action that opens a modal".to_string(),
        steps: &[
            "Trigger the modal action",
            "Check the modal is displayed",
            "Check the buttons inside the modal",
            "Close the modal",
        ],
        results: &[
            "Action runs",
            "Modal is centered on screen",
            "Modal buttons respond",
            "Confirm and cancel both close the modal",
        ],
        priority: Priority::P2,
        test_type: TestType::Ui,
        comment: "Generated - modal UI",
    }
    .into()
}

fn transaction() -> TestCase {
    Template {
        domain: "transaction",
        section: "Trading",
        component: "Order Execution",
        feature: "Basic Trading",
        title: "Place a basic order",
        precondition: "User is logged in and holds tradable assets".to_string(),
        steps: &[
            "Open the trading screen",
            "Select an instrument",
            "Enter order details",
            "Submit the order",
            "Check the order confirmation",
        ],
        results: &[
            "Trading screen loads",
            "Instrument is selected",
            "Order details are entered",
            "Order is executed",
            "Order confirmation is shown",
        ],
        priority: Priority::P1,
        test_type: TestType::Functional,
        comment: "Generated - trading",
    }
    .into()
}

fn social() -> TestCase {
    Template {
        domain: "social",
        section: "Social Integration",
        component: "Social Connect",
        feature: "Social Login",
        title: "Connect a social account",
        precondition: "Social integration is enabled".to_string(),
        steps: &[
            "Tap the social connect button",
            "Check the provider app opens",
            "Return to the app after authorizing",
            "Check the connected state",
        ],
        results: &[
            "Provider app opens",
            "OAuth consent screen is shown",
            "App resumes",
            "Account shows as connected",
        ],
        priority: Priority::P1,
        test_type: TestType::Functional,
        comment: "Generated - social integration",
    }
    .into()
}

fn settings() -> TestCase {
    Template {
        domain: "settings",
        section: "User Settings",
        component: "Profile Settings",
        feature: "Profile Management",
        title: "Edit profile information",
        precondition: "Profile settings screen is open".to_string(),
        steps: &[
            "Check the current profile",
            "Edit an editable field",
            "Tap save",
            "Check the change is applied",
        ],
        results: &[
            "Current profile is shown",
            "Field accepts edits",
            "Save succeeds",
            "Change is reflected immediately",
        ],
        priority: Priority::P2,
        test_type: TestType::Functional,
        comment: "Generated - settings",
    }
    .into()
}

/// End-to-end case over the inferred flow; only for flows of more than two steps
pub fn flow_case(flow: &UserFlow) -> Option<TestCase> {
    if flow.flow_steps.len() <= 2 {
        return None;
    }
    let flow_type = &flow.primary_flow_type;

    Some(TestCase {
        domain: "user_flow".to_string(),
        section: "User Journey".to_string(),
        component: "End-to-End Flow".to_string(),
        feature: format!("{} Flow", title_case(flow_type)),
        title: format!("Verify the full {} flow", flow_type),
        precondition: "App is running".to_string(),
        test_step: numbered(&flow.flow_steps),
        expected_results: numbered(
            flow.flow_steps
                .iter()
                .map(|step| format!("{} completes successfully", step)),
        ),
        priority: Priority::P1,
        test_type: TestType::Functional,
        comment: format!("Generated - {} flow", flow_type),
        ..Default::default()
    })
}

/// `auth_flow` becomes `Auth_Flow`
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper_next = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if upper_next {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            upper_next = false;
        } else {
            out.push(c);
            upper_next = true;
        }
    }
    out
}

pub fn button_case(button_count: usize) -> Option<TestCase> {
    if button_count == 0 {
        return None;
    }
    Some(
        Template {
            domain: "ui",
            section: "UI Elements",
            component: "Button Interaction",
            feature: "Button Functionality",
            title: "Basic button interaction",
            precondition: format!("{} buttons are displayed", button_count),
            steps: &[
                "Check each button is displayed",
                "Tap each button",
                "Check disabled buttons",
                "Check tap feedback",
            ],
            results: &[
                "All buttons are displayed",
                "Tapping runs the matching action",
                "Disabled buttons cannot be tapped",
                "Tapping gives visual feedback",
            ],
            priority: Priority::P2,
            test_type: TestType::Ui,
            comment: "Generated - UI elements",
        }
        .into(),
    )
}

pub fn responsiveness_case() -> TestCase {
    Template {
        domain: "ui",
        section: "UI Performance",
        component: "Complex UI",
        feature: "UI Responsiveness",
        title: "Complex UI responsiveness",
        precondition: "High-complexity screen is loaded".to_string(),
        steps: &[
            "Measure load time",
            "Check scroll performance",
            "Run several interactions at once",
            "Check memory usage",
        ],
        results: &[
            "Screen loads within 3 seconds",
            "Scrolling is smooth",
            "Interactions are not delayed",
            "Memory usage stays reasonable",
        ],
        priority: Priority::P2,
        test_type: TestType::Performance,
        comment: "Generated - performance",
    }
    .into()
}

/// Security case raised by a security testing priority
pub fn security_case(reason: &str) -> TestCase {
    let mut case: TestCase = Template {
        domain: "security",
        section: "Security",
        component: "Security Test",
        feature: "Security Validation",
        title: "Security validation",
        precondition: "Feature requires access control".to_string(),
        steps: &[
            "Attempt unauthenticated access",
            "Attempt an unauthorized action",
            "Check security error handling",
        ],
        results: &[
            "Access is blocked",
            "Permission error is shown",
            "Request is handled securely",
        ],
        priority: Priority::P1,
        test_type: TestType::Security,
        comment: "",
    }
    .into();
    case.comment = format!("Generated - {}", reason);
    case
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::UiElement;
    use crate::figma::Complexity;

    fn elements(inputs: usize, navigation: usize) -> UiElements {
        let element = |i| UiElement {
            name: format!("e{}", i),
            depth: 0,
        };
        UiElements {
            inputs: (0..inputs).map(element).collect(),
            navigation: (0..navigation).map(element).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_pattern_case_counts() {
        let none = elements(0, 0);
        assert_eq!(pattern_cases(UiPattern::Authentication, &none).len(), 2);
        assert!(pattern_cases(UiPattern::FormInput, &none).is_empty());
        assert!(pattern_cases(UiPattern::Navigation, &none).is_empty());
        assert_eq!(pattern_cases(UiPattern::Social, &none).len(), 1);
    }

    #[test]
    fn test_element_counts_in_preconditions() {
        let some = elements(3, 2);
        let form = &pattern_cases(UiPattern::FormInput, &some)[0];
        assert_eq!(form.precondition, "Input form is displayed (3 fields)");
        let nav = &pattern_cases(UiPattern::Navigation, &some)[0];
        assert!(nav.precondition.contains("(2 menus)"));
    }

    #[test]
    fn test_steps_are_numbered() {
        let case = modal_popup();
        assert!(case.test_step.starts_with("1. Trigger the modal action\n2. "));
        assert_eq!(case.expected_results.lines().count(), 4);
        assert_eq!(case.test_type, TestType::Ui);
    }

    #[test]
    fn test_flow_case_requires_three_steps() {
        let mut flow = UserFlow {
            flow_steps: vec!["Screen entry".into(), "Check result".into()],
            primary_flow_type: "auth_flow".into(),
            confidence: 40,
            complexity: Complexity::Low,
        };
        assert!(flow_case(&flow).is_none());

        flow.flow_steps.insert(1, "Enter information".into());
        let case = flow_case(&flow).unwrap();
        assert_eq!(case.feature, "Auth_Flow Flow");
        assert_eq!(case.title, "Verify the full auth_flow flow");
        assert_eq!(
            case.expected_results.lines().nth(1),
            Some("2. Enter information completes successfully")
        );
    }

    #[test]
    fn test_button_and_security_cases() {
        assert!(button_case(0).is_none());
        assert_eq!(
            button_case(4).unwrap().precondition,
            "4 buttons are displayed"
        );

        let case = security_case("trading security");
        assert_eq!(case.test_type, TestType::Security);
        assert_eq!(case.comment, "Generated - trading security");
    }
}
