//! MCP tools exposed by `figma-qa serve`
//!
//! Each tool takes the `arguments` object of a `tools/call` request and
//! returns a JSON value that the server wraps as text content. Tools never
//! panic on bad input; argument problems come back as [`ToolError`].

use crate::analysis::{extract_requirements, FigmaAnalyzer, Requirement, RequirementSource};
use crate::export::{export, ExportError, ExportFormat, ExportOptions};
use crate::figma::client::{parse_file_response, parse_nodes_response};
use crate::figma::{parse_figma_url, FigmaError, FigmaSource};
use crate::testcase::{GenerateError, TestCase, TestCaseGenerator, TestType};
use chrono::Local;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing required argument '{0}'")]
    MissingArgument(&'static str),

    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: &'static str, message: String },

    #[error("No requirements were found in the design")]
    NoRequirements,

    #[error(transparent)]
    Figma(#[from] FigmaError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Tool descriptors returned by `tools/list`
pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "parse_figma_url",
            "description": "Extract the file id and node id from a Figma URL",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "figma_url": {"type": "string", "description": "Figma design URL"}
                },
                "required": ["figma_url"]
            }
        }),
        json!({
            "name": "fetch_figma_data",
            "description": "Fetch the node tree of a Figma file or node",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "file_id": {"type": "string", "description": "Figma file id"},
                    "node_id": {"type": "string", "description": "Node id (1-2 or 1:2)"}
                },
                "required": ["file_id"]
            }
        }),
        json!({
            "name": "extract_requirements",
            "description": "Extract requirement texts from Figma data",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "figma_data": {"type": "object", "description": "Output of fetch_figma_data or a raw Figma API response"}
                },
                "required": ["figma_data"]
            }
        }),
        json!({
            "name": "generate_testcase",
            "description": "Generate a test case for one requirement",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "requirement": {"type": "object", "description": "Requirement with at least a 'text' field"},
                    "test_type": {"type": "string", "description": "Functional, UI, Security, Performance, Accessibility or Usability"}
                },
                "required": ["requirement"]
            }
        }),
        json!({
            "name": "save_to_excel",
            "description": "Save test cases to an Excel workbook",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "test_cases": {"type": "array", "description": "Test case records"},
                    "filename": {"type": "string", "description": "Output file name"}
                },
                "required": ["test_cases"]
            }
        }),
        json!({
            "name": "process_figma_link",
            "description": "Parse, fetch, extract, generate and save test cases for a Figma link in one call",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "figma_url": {"type": "string", "description": "Figma design URL"},
                    "test_type": {"type": "string", "description": "Test type for every generated case"}
                },
                "required": ["figma_url"]
            }
        }),
        json!({
            "name": "enhanced_figma_analysis",
            "description": "Analyze UI patterns, structure and user flow, and generate test cases from them",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "figma_url": {"type": "string", "description": "Figma design URL"},
                    "include_screenshot": {"type": "boolean", "description": "Render the linked node", "default": true}
                },
                "required": ["figma_url"]
            }
        }),
    ]
}

/// State shared by every tool call
pub struct ToolContext<S: FigmaSource> {
    analyzer: FigmaAnalyzer<S>,
    generator: TestCaseGenerator,
    output_dir: PathBuf,
}

impl<S: FigmaSource> ToolContext<S> {
    pub fn new(source: S, generator: TestCaseGenerator, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            analyzer: FigmaAnalyzer::new(source),
            generator,
            output_dir: output_dir.into(),
        }
    }

    pub async fn call(&self, name: &str, args: &Value) -> Result<Value, ToolError> {
        debug!(tool = name, "Calling tool");
        match name {
            "parse_figma_url" => self.parse_url(args),
            "fetch_figma_data" => self.fetch_data(args).await,
            "extract_requirements" => self.extract(args),
            "generate_testcase" => self.generate(args),
            "save_to_excel" => self.save(args),
            "process_figma_link" => self.process_link(args).await,
            "enhanced_figma_analysis" => self.enhanced(args).await,
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    fn parse_url(&self, args: &Value) -> Result<Value, ToolError> {
        let link = parse_figma_url(required_str(args, "figma_url")?)?;
        Ok(json!({
            "success": true,
            "file_id": link.file_id,
            "node_id": link.node_id,
            "api_node_id": link.api_node_id(),
            "url": link.url,
        }))
    }

    async fn fetch_data(&self, args: &Value) -> Result<Value, ToolError> {
        let file_id = required_str(args, "file_id")?;
        let node_id = optional_str(args, "node_id").map(crate::figma::to_api_node_id);
        let file = self
            .analyzer
            .source()
            .fetch_file(file_id, node_id.as_deref())
            .await?;
        Ok(json!({
            "success": true,
            "file_id": file_id,
            "node_id": node_id,
            "name": file.name,
            "document": file.document,
        }))
    }

    fn extract(&self, args: &Value) -> Result<Value, ToolError> {
        let data = args
            .get("figma_data")
            .filter(|v| v.is_object())
            .cloned()
            .ok_or(ToolError::MissingArgument("figma_data"))?;
        let file = if data.get("nodes").is_some() {
            parse_nodes_response(data)?
        } else {
            parse_file_response(data)?
        };
        let requirements = extract_requirements(&file);
        Ok(json!({
            "success": true,
            "count": requirements.len(),
            "requirements": requirements,
        }))
    }

    fn generate(&self, args: &Value) -> Result<Value, ToolError> {
        let requirement = parse_requirement(
            args.get("requirement")
                .ok_or(ToolError::MissingArgument("requirement"))?,
        )?;
        let test_type = parse_test_type(args)?;
        let case = self.generator.from_requirement(&requirement, test_type);
        Ok(json!({"success": true, "testcase": case}))
    }

    fn save(&self, args: &Value) -> Result<Value, ToolError> {
        let records = args
            .get("test_cases")
            .cloned()
            .ok_or(ToolError::MissingArgument("test_cases"))?;
        let cases = self.generator.parse_records(records)?;
        let filename = optional_str(args, "filename").map(str::to_string);
        let path = self.save_workbook(&cases, filename)?;
        Ok(json!({
            "success": true,
            "filename": path.display().to_string(),
            "count": cases.len(),
        }))
    }

    async fn process_link(&self, args: &Value) -> Result<Value, ToolError> {
        let url = required_str(args, "figma_url")?;
        let test_type = parse_test_type(args)?;

        let report = self.analyzer.basic_analysis(url).await?;
        if report.requirements.is_empty() {
            return Err(ToolError::NoRequirements);
        }
        let cases: Vec<TestCase> = report
            .requirements
            .iter()
            .map(|req| self.generator.from_requirement(req, test_type))
            .collect();
        let path = self.save_workbook(&cases, None)?;

        info!(
            url,
            requirements = report.requirements.len(),
            testcases = cases.len(),
            "Processed Figma link"
        );
        Ok(json!({
            "success": true,
            "requirements_count": report.requirements.len(),
            "testcases_count": cases.len(),
            "filename": path.display().to_string(),
            "figma_url": url,
        }))
    }

    async fn enhanced(&self, args: &Value) -> Result<Value, ToolError> {
        let url = required_str(args, "figma_url")?;
        let include_screenshot = match args.get("include_screenshot") {
            None | Some(Value::Null) => true,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                return Err(ToolError::InvalidArgument {
                    name: "include_screenshot",
                    message: format!("expected a boolean, got {}", other),
                })
            }
        };

        let report = self.analyzer.enhanced_analysis(url, include_screenshot).await?;
        let cases = self.generator.generate_from_analysis(&report, &[])?;
        Ok(json!({
            "success": true,
            "summary": report.summary,
            "analysis": report,
            "testcases_count": cases.len(),
            "testcases": cases,
        }))
    }

    fn save_workbook(&self, cases: &[TestCase], filename: Option<String>) -> Result<PathBuf, ToolError> {
        let filename = filename.unwrap_or_else(|| {
            format!(
                "mcp_figma_testcases_{}.xlsx",
                Local::now().format("%Y%m%d_%H%M%S")
            )
        });
        let path = if Path::new(&filename).is_absolute() {
            PathBuf::from(filename)
        } else {
            self.output_dir.join(filename)
        };
        let options = ExportOptions::from_rules(self.generator.rules());
        Ok(export(cases, ExportFormat::Excel, &path, &options)?)
    }
}

fn required_str<'a>(args: &'a Value, name: &'static str) -> Result<&'a str, ToolError> {
    optional_str(args, name).ok_or(ToolError::MissingArgument(name))
}

fn optional_str<'a>(args: &'a Value, name: &str) -> Option<&'a str> {
    args.get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_test_type(args: &Value) -> Result<Option<TestType>, ToolError> {
    optional_str(args, "test_type")
        .map(|s| {
            s.parse().map_err(|message| ToolError::InvalidArgument {
                name: "test_type",
                message,
            })
        })
        .transpose()
}

/// Accepts a full requirement record or any object with a `text` (or `content`) field
fn parse_requirement(value: &Value) -> Result<Requirement, ToolError> {
    if let Ok(requirement) = serde_json::from_value::<Requirement>(value.clone()) {
        return Ok(requirement);
    }
    let text = optional_str(value, "text")
        .or_else(|| optional_str(value, "content"))
        .ok_or_else(|| ToolError::InvalidArgument {
            name: "requirement",
            message: "expected an object with a 'text' field".to_string(),
        })?;
    Ok(Requirement::new(text, RequirementSource::TextNode))
}
