//! Writers for generated test suites
//!
//! Every writer creates missing parent directories. CSV outputs start with a
//! UTF-8 byte-order mark so spreadsheet tools detect the encoding of Korean
//! and other non-ASCII text.

pub mod csv;
pub mod excel;
pub mod json;

use crate::testcase::{RulesConfig, TestCase, COLUMNS};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

pub(crate) const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Excel error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Nothing to export")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Excel,
    Testrail,
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::Testrail | ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExportFormat::Excel => "excel",
            ExportFormat::Testrail => "testrail",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        };
        f.write_str(s)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "testrail" => Ok(ExportFormat::Testrail),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!(
                "Unknown export format '{}'. Valid options: excel, testrail, json, csv",
                other
            )),
        }
    }
}

/// Column layout and workbook options shared by the writers
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub columns: Vec<String>,
    pub summary_formulas: bool,
    /// Write header-only files instead of failing on an empty suite
    pub allow_empty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
            summary_formulas: false,
            allow_empty: false,
        }
    }
}

impl ExportOptions {
    pub fn from_rules(rules: &RulesConfig) -> Self {
        let columns = if rules.columns().is_empty() {
            Self::default().columns
        } else {
            rules.columns().to_vec()
        };
        Self {
            columns,
            summary_formulas: rules.excel_formula_output.enabled,
            allow_empty: false,
        }
    }

    pub fn allowing_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }
}

/// Writes `cases` to `path` in the given format
pub fn export(
    cases: &[TestCase],
    format: ExportFormat,
    path: &Path,
    options: &ExportOptions,
) -> Result<PathBuf, ExportError> {
    if cases.is_empty() && !options.allow_empty {
        return Err(ExportError::Empty);
    }
    ensure_parent(path)?;

    match format {
        ExportFormat::Excel => excel::write_workbook(cases, path, options)?,
        ExportFormat::Testrail => csv::write_testrail(cases, path)?,
        ExportFormat::Json => json::write_json(cases, path)?,
        ExportFormat::Csv => csv::write_csv(cases, path, &options.columns)?,
    }

    info!(
        path = %path.display(),
        format = %format,
        count = cases.len(),
        "Exported test cases"
    );
    Ok(path.to_path_buf())
}

pub(crate) fn ensure_parent(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| ExportError::Io {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

pub(crate) fn create_file(path: &Path) -> Result<std::fs::File, ExportError> {
    std::fs::File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
