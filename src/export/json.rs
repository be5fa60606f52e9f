use super::{create_file, ExportError};
use crate::testcase::TestCase;
use crate::VERSION;
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub generated_at: String,
    pub total_testcases: usize,
    pub generator_version: String,
}

/// JSON export document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEnvelope {
    pub metadata: ExportMetadata,
    pub testcases: Vec<TestCase>,
}

impl ExportEnvelope {
    pub fn new(cases: &[TestCase]) -> Self {
        Self {
            metadata: ExportMetadata {
                generated_at: chrono::Local::now().to_rfc3339(),
                total_testcases: cases.len(),
                generator_version: VERSION.to_string(),
            },
            testcases: cases.to_vec(),
        }
    }
}

pub fn write_json(cases: &[TestCase], path: &Path) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(create_file(path)?);
    serde_json::to_writer_pretty(&mut writer, &ExportEnvelope::new(cases))?;
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_envelope_round_trips_with_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cases.json");
        let cases = vec![TestCase {
            title: "프로필 수정".to_string(),
            ..Default::default()
        }];

        write_json(&cases, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        // non-ASCII is written as is, pretty-printed
        assert!(text.contains("프로필 수정"));
        assert!(text.contains("\n  \"metadata\""));

        let envelope: ExportEnvelope = serde_json::from_str(&text).unwrap();
        assert_eq!(envelope.metadata.total_testcases, 1);
        assert_eq!(envelope.metadata.generator_version, VERSION);
        assert_eq!(envelope.testcases, cases);
    }
}
