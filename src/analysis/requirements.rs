use super::patterns::{EXCLUDE_KEYWORDS, REQUIREMENT_KEYWORDS};
use super::types::{Requirement, RequirementSource};
use super::walker::walk;
use crate::figma::FigmaFile;
use std::collections::HashSet;

const MIN_REQUIREMENT_CHARS: usize = 3;
const MAX_REQUIREMENT_CHARS: usize = 1000;

/// Whether a text reads like product copy rather than a style token
pub fn is_requirement_text(text: &str) -> bool {
    let len = text.chars().count();
    if !(MIN_REQUIREMENT_CHARS..=MAX_REQUIREMENT_CHARS).contains(&len) {
        return false;
    }

    let lower = text.to_lowercase();
    if EXCLUDE_KEYWORDS.iter().any(|ex| lower.contains(ex)) {
        return false;
    }

    REQUIREMENT_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Collects requirement texts from copy and layer names.
///
/// Duplicates (by trimmed, lower-cased text) keep their first occurrence.
pub fn extract_requirements(file: &FigmaFile) -> Vec<Requirement> {
    let mut requirements = Vec::new();

    walk(file, |node, depth| {
        if let Some(text) = node.text_content() {
            if is_requirement_text(text) {
                requirements.push(Requirement {
                    text: text.to_string(),
                    source: RequirementSource::TextNode,
                    node_id: node.id.clone(),
                    node_name: node.name.clone(),
                    depth,
                });
            }
        }

        if !node.name.is_empty() && is_requirement_text(&node.name) {
            requirements.push(Requirement {
                text: node.name.clone(),
                source: RequirementSource::NodeName,
                node_id: node.id.clone(),
                node_name: node.name.clone(),
                depth,
            });
        }
    });

    deduplicate(requirements)
}

pub fn deduplicate(requirements: Vec<Requirement>) -> Vec<Requirement> {
    let mut seen = HashSet::new();
    requirements
        .into_iter()
        .filter(|req| seen.insert(req.text.trim().to_lowercase()))
        .collect()
}
