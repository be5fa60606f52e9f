//! Rule and template configuration
//!
//! Rules are read from JSON. The crate embeds a default file; a different
//! file can be supplied with `FIGMA_QA_RULES_PATH`. Any section missing from
//! a file falls back to the built-in defaults.

use super::types::{Priority, COLUMNS};
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const EMBEDDED_RULES: &str = include_str!("../../config/rules_config.json");

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("Failed to read rules file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid rules file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub output_schema: OutputSchema,
    pub priority_rules: PriorityRules,
    pub flow_clarification: FlowClarification,
    pub coverage_rules: CoverageRules,
    pub excel_formula_output: ExcelFormulaOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSchema {
    pub columns: Vec<String>,
    /// Legacy key -> canonical key, applied in file order
    pub field_aliases: IndexMap<String, String>,
}

impl Default for OutputSchema {
    fn default() -> Self {
        let field_aliases = [
            ("test_steps", "test_step"),
            ("android_result", "app_result"),
            ("ios_result", "app_result"),
            ("expected_result", "expected_results"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        Self {
            columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
            field_aliases,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityRules {
    pub default: Priority,
    pub order: Vec<Priority>,
    pub keywords: BTreeMap<Priority, Vec<String>>,
}

impl Default for PriorityRules {
    fn default() -> Self {
        Self {
            default: Priority::P2,
            order: Priority::ALL.to_vec(),
            keywords: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowClarification {
    /// Flow confidence (0.0..=1.0) below which questions are raised
    pub confidence_threshold: f64,
    pub default_questions: Vec<String>,
}

impl Default for FlowClarification {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.55,
            default_questions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageRules {
    pub always_include_categories: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcelFormulaOutput {
    pub enabled: bool,
}

impl RulesConfig {
    /// Rules shipped with the crate
    pub fn embedded() -> Result<Self, RulesError> {
        Self::from_json(EMBEDDED_RULES, Path::new("<embedded>"))
    }

    /// Loads `path`, or the embedded rules when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, RulesError> {
        let Some(path) = path else {
            return Self::embedded();
        };

        debug!(path = %path.display(), "Loading rules file");
        let content = std::fs::read_to_string(path).map_err(|source| RulesError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content, path)
    }

    fn from_json(content: &str, path: &Path) -> Result<Self, RulesError> {
        serde_json::from_str(content).map_err(|e| RulesError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.output_schema.columns
    }

    /// First priority in rule order whose keywords occur in `text`
    pub fn priority_for(&self, text: &str) -> Priority {
        let lower = text.to_lowercase();
        self.priority_rules
            .order
            .iter()
            .find(|priority| {
                self.priority_rules
                    .keywords
                    .get(priority)
                    .is_some_and(|keywords| {
                        keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
                    })
            })
            .copied()
            .unwrap_or(self.priority_rules.default)
    }

    pub fn normalize_fields(&self, record: &Map<String, Value>) -> Map<String, Value> {
        normalize_fields(record, &self.output_schema.field_aliases)
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(_) => false,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Maps legacy keys onto canonical ones.
///
/// An empty target takes the legacy value as is. When both carry text, the
/// legacy value is appended on a new line unless the target already contains
/// it; Android and iOS results are labeled when merged into `app_result`.
pub fn normalize_fields(
    record: &Map<String, Value>,
    aliases: &IndexMap<String, String>,
) -> Map<String, Value> {
    let mut out = record.clone();

    for (src, dst) in aliases {
        let Some(src_value) = out.get(src).cloned() else {
            continue;
        };

        if is_blank(out.get(dst)) {
            out.insert(dst.clone(), src_value);
            continue;
        }
        if is_blank(Some(&src_value)) {
            continue;
        }

        let dst_text = out.get(dst).map(as_text).unwrap_or_default();
        let src_text = as_text(&src_value);
        let src_trimmed = src_text.trim();
        if src_trimmed.is_empty() || dst_text.contains(src_trimmed) {
            continue;
        }

        let merged = match (dst.as_str(), src.as_str()) {
            ("app_result", "android_result" | "ios_result") => {
                let label = if src == "android_result" { "Android" } else { "iOS" };
                let mut merged = dst_text.trim_end().to_string();
                if !merged.is_empty() {
                    merged.push('\n');
                }
                merged.push_str(&format!("{}: {}", label, src_text));
                merged
            }
            _ => format!("{}\n{}", dst_text.trim_end(), src_text)
                .trim()
                .to_string(),
        };
        out.insert(dst.clone(), Value::String(merged));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_embedded_rules_parse() {
        let rules = RulesConfig::embedded().unwrap();
        assert_eq!(rules.columns().len(), COLUMNS.len());
        assert_eq!(rules.priority_rules.default, Priority::P3);
        assert!(rules.excel_formula_output.enabled);
        assert_eq!(
            rules.coverage_rules.always_include_categories,
            vec!["accessibility", "responsive"]
        );
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"excel_formula_output": {{"enabled": true}}}}"#).unwrap();

        let rules = RulesConfig::load(Some(file.path())).unwrap();
        assert!(rules.excel_formula_output.enabled);
        assert_eq!(rules.output_schema, OutputSchema::default());
        assert_eq!(rules.priority_rules.default, Priority::P2);
        assert_eq!(rules.flow_clarification.confidence_threshold, 0.55);
    }

    #[test]
    fn test_load_errors() {
        let missing = RulesConfig::load(Some(Path::new("/nonexistent/rules.json")));
        assert!(matches!(missing, Err(RulesError::Read { .. })));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let invalid = RulesConfig::load(Some(file.path()));
        assert!(matches!(invalid, Err(RulesError::Parse { .. })));
    }

    #[test]
    fn test_priority_for_follows_rule_order() {
        let rules = RulesConfig::embedded().unwrap();
        assert_eq!(rules.priority_for("Login with email"), Priority::P1);
        assert_eq!(rules.priority_for("프로필 설정"), Priority::P2);
        assert_eq!(rules.priority_for("Order history"), Priority::P3);
    }

    #[test]
    fn test_normalize_fills_empty_targets() {
        let rules = RulesConfig::default();
        let out = rules.normalize_fields(&record(json!({
            "title": "t",
            "test_steps": "1. open",
            "expected_result": "opens",
            "app_result": ""
        })));

        assert_eq!(out["test_step"], "1. open");
        assert_eq!(out["expected_results"], "opens");
        assert_eq!(out["title"], "t");
    }

    #[test]
    fn test_normalize_merges_platform_results() {
        let rules = RulesConfig::default();
        let out = rules.normalize_fields(&record(json!({
            "app_result": "Pass",
            "android_result": "Fail",
            "ios_result": "Pass on 17"
        })));

        assert_eq!(out["app_result"], "Pass\nAndroid: Fail\niOS: Pass on 17");
    }

    #[test]
    fn test_normalize_does_not_duplicate_text() {
        let rules = RulesConfig::default();
        let out = rules.normalize_fields(&record(json!({
            "test_step": "1. open\n2. tap",
            "test_steps": "2. tap"
        })));
        assert_eq!(out["test_step"], "1. open\n2. tap");

        let out = rules.normalize_fields(&record(json!({
            "expected_results": "shown",
            "expected_result": "closed"
        })));
        assert_eq!(out["expected_results"], "shown\nclosed");
    }

    #[test]
    fn test_aliases_apply_in_file_order() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"output_schema": {{"field_aliases": {{
                "ios_result": "app_result",
                "android_result": "app_result"
            }}}}}}"#
        )
        .unwrap();
        let rules = RulesConfig::load(Some(file.path())).unwrap();

        let keys: Vec<_> = rules.output_schema.field_aliases.keys().collect();
        assert_eq!(keys, vec!["ios_result", "android_result"]);

        let out = rules.normalize_fields(&record(json!({
            "app_result": "Pass",
            "android_result": "Fail",
            "ios_result": "Pass on 17"
        })));
        assert_eq!(out["app_result"], "Pass\niOS: Pass on 17\nAndroid: Fail");
    }

    #[test]
    fn test_android_fills_empty_app_result_unlabeled() {
        let rules = RulesConfig::default();
        let out = rules.normalize_fields(&record(json!({
            "android_result": "Fail",
            "ios_result": "Pass"
        })));
        assert_eq!(out["app_result"], "Fail\niOS: Pass");
    }
}
