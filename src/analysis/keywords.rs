use super::patterns::{count_matches, FlowPattern, UiPattern};
use super::types::{DetectedFlow, DetectedPattern, KeywordAnalysis, NameEntry, TextEntry};
use super::walker::walk;
use crate::figma::FigmaFile;

const PATTERN_CONFIDENCE_PER_MATCH: u32 = 20;
const FLOW_CONFIDENCE_PER_MATCH: u32 = 25;

/// Matches copy text and frame/component names against the pattern tables
pub fn analyze_keywords(file: &FigmaFile) -> KeywordAnalysis {
    let mut texts = Vec::new();
    let mut names = Vec::new();

    walk(file, |node, depth| {
        if let Some(text) = node.text_content().filter(|t| !t.is_empty()) {
            texts.push(TextEntry {
                text: text.to_string(),
                depth,
            });
        }
        if node.kind().is_named_container() && !node.name.is_empty() {
            names.push(NameEntry {
                name: node.name.clone(),
                node_type: node.node_type.to_lowercase(),
                depth,
            });
        }
    });

    let corpus = texts
        .iter()
        .map(|t| t.text.as_str())
        .chain(names.iter().map(|n| n.name.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let detected_patterns = UiPattern::ALL
        .iter()
        .filter_map(|&pattern| {
            let matches = count_matches(&corpus, pattern.keywords());
            (matches > 0).then(|| DetectedPattern {
                pattern,
                matches,
                flow_type: pattern.flow_type().to_string(),
                confidence: confidence(matches, PATTERN_CONFIDENCE_PER_MATCH),
            })
        })
        .collect();

    let detected_flows = FlowPattern::ALL
        .iter()
        .filter_map(|&flow| {
            let matches = count_matches(&corpus, flow.keywords());
            (matches > 0).then(|| DetectedFlow {
                flow,
                matches,
                confidence: confidence(matches, FLOW_CONFIDENCE_PER_MATCH),
            })
        })
        .collect();

    let total_elements = texts.len() + names.len();

    KeywordAnalysis {
        texts,
        names,
        detected_patterns,
        detected_flows,
        total_elements,
    }
}

fn confidence(matches: usize, per_match: u32) -> u32 {
    (matches as u32).saturating_mul(per_match).min(100)
}
