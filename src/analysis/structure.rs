use super::types::{LayoutInfo, UiElement, UiElements, UiStructure};
use super::walker::walk;
use crate::figma::{Complexity, FigmaFile, NodeKind};

const LOW_COMPLEXITY_BELOW: usize = 20;
const MEDIUM_COMPLEXITY_BELOW: usize = 50;

/// Classifies layers into buttons, inputs, navigation and containers
pub fn analyze_structure(file: &FigmaFile) -> UiStructure {
    let mut elements = UiElements::default();
    let mut layout = LayoutInfo::default();

    walk(file, |node, depth| {
        layout.depth_levels = layout.depth_levels.max(depth);

        let name = node.name.to_lowercase();
        let element = || UiElement {
            name: node.name.clone(),
            depth,
        };
        let kind = node.kind();

        if name.contains("button") || name.contains("btn") {
            elements.buttons.push(element());
        } else if ["input", "field", "textfield"].iter().any(|k| name.contains(k)) {
            elements.inputs.push(element());
        } else if ["nav", "menu", "tab"].iter().any(|k| name.contains(k)) {
            elements.navigation.push(element());
        } else if matches!(kind, NodeKind::Frame | NodeKind::Group) {
            elements.containers.push(element());
        }

        if kind.is_component() {
            layout.component_count += 1;
        }
        layout.max_children = layout.max_children.max(node.children.len());
    });

    let score = elements.total() + layout.depth_levels * 2 + layout.component_count;
    let ui_complexity = complexity_for_score(score);

    UiStructure {
        ui_elements: elements,
        layout_info: layout,
        ui_complexity,
    }
}

pub fn complexity_for_score(score: usize) -> Complexity {
    if score < LOW_COMPLEXITY_BELOW {
        Complexity::Low
    } else if score < MEDIUM_COMPLEXITY_BELOW {
        Complexity::Medium
    } else {
        Complexity::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figma::FigmaNode;

    #[test]
    fn test_classifies_elements_first_match_wins() {
        let file = FigmaFile::new(FigmaNode::new("DOCUMENT", "Document").with_children(vec![
            FigmaNode::new("FRAME", "Login Button"),
            FigmaNode::new("COMPONENT", "Input Field"),
            FigmaNode::new("INSTANCE", "Tab Bar").with_children(vec![
                FigmaNode::new("INSTANCE", "Menu btn"),
            ]),
            FigmaNode::new("GROUP", "Card"),
            FigmaNode::new("RECTANGLE", "Divider"),
        ]));

        let result = analyze_structure(&file);
        let elements = &result.ui_elements;

        assert_eq!(elements.buttons.len(), 2);
        assert_eq!(elements.inputs.len(), 1);
        assert_eq!(elements.navigation.len(), 1);
        assert_eq!(elements.containers.len(), 1);
        assert_eq!(elements.containers[0].name, "Card");
        assert_eq!(result.layout_info.component_count, 3);
        assert_eq!(result.layout_info.depth_levels, 1);
        assert_eq!(result.layout_info.max_children, 1);
        assert_eq!(result.ui_complexity, Complexity::Low);
    }

    #[test]
    fn test_complexity_thresholds() {
        assert_eq!(complexity_for_score(0), Complexity::Low);
        assert_eq!(complexity_for_score(19), Complexity::Low);
        assert_eq!(complexity_for_score(20), Complexity::Medium);
        assert_eq!(complexity_for_score(49), Complexity::Medium);
        assert_eq!(complexity_for_score(50), Complexity::High);
    }

    #[test]
    fn test_deep_tree_is_complex() {
        let mut node = FigmaNode::new("FRAME", "leaf");
        for i in 0..30 {
            node = FigmaNode::new("FRAME", format!("level {}", i)).with_children(vec![node]);
        }
        let file = FigmaFile::new(FigmaNode::new("DOCUMENT", "Document").with_children(vec![node]));

        let result = analyze_structure(&file);
        assert_eq!(result.layout_info.depth_levels, 30);
        assert_eq!(result.ui_complexity, Complexity::High);
    }
}
