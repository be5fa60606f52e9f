use super::{create_file, ExportError, UTF8_BOM};
use crate::testcase::TestCase;
use std::io::Write;
use std::path::Path;

const TESTRAIL_HEADERS: [&str; 9] = [
    "Section",
    "Title",
    "Type",
    "Priority",
    "Estimate",
    "References",
    "Preconditions",
    "Steps",
    "Expected Result",
];

const TESTRAIL_ESTIMATE: &str = "5m";

fn bom_writer(path: &Path) -> Result<::csv::Writer<std::fs::File>, ExportError> {
    let mut file = create_file(path)?;
    file.write_all(UTF8_BOM).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(::csv::Writer::from_writer(file))
}

/// TestRail import layout
pub fn write_testrail(cases: &[TestCase], path: &Path) -> Result<(), ExportError> {
    let mut writer = bom_writer(path)?;
    writer.write_record(TESTRAIL_HEADERS)?;

    for case in cases {
        let section = format!("{}/{}", case.domain, case.section);
        writer.write_record([
            section.as_str(),
            case.title.as_str(),
            case.test_type.as_str(),
            case.priority.as_str(),
            TESTRAIL_ESTIMATE,
            "",
            case.precondition.as_str(),
            case.test_step.as_str(),
            case.expected_results.as_str(),
        ])?;
    }

    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Plain CSV with the given column order
pub fn write_csv(cases: &[TestCase], path: &Path, columns: &[String]) -> Result<(), ExportError> {
    let mut writer = bom_writer(path)?;
    writer.write_record(columns)?;

    for case in cases {
        writer.write_record(columns.iter().map(|column| case.field(column)))?;
    }

    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testcase::{Priority, TestType};
    use tempfile::TempDir;

    fn sample() -> TestCase {
        TestCase {
            domain: "authentication".to_string(),
            section: "User Authentication".to_string(),
            title: "로그인 실패".to_string(),
            test_step: "1. Open\n2. Tap".to_string(),
            priority: Priority::P1,
            test_type: TestType::Security,
            ..Default::default()
        }
    }

    fn read_back(path: &Path) -> (Vec<u8>, Vec<Vec<String>>) {
        let bytes = std::fs::read(path).unwrap();
        let mut reader = ::csv::Reader::from_reader(&bytes[UTF8_BOM.len()..]);
        let mut rows = vec![reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>()];
        for record in reader.records() {
            rows.push(record.unwrap().iter().map(str::to_string).collect());
        }
        (bytes, rows)
    }

    #[test]
    fn test_testrail_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("testrail.csv");
        write_testrail(&[sample()], &path).unwrap();

        let (bytes, rows) = read_back(&path);
        assert!(bytes.starts_with(UTF8_BOM));
        assert_eq!(rows[0], TESTRAIL_HEADERS);
        assert_eq!(rows[1][0], "authentication/User Authentication");
        assert_eq!(rows[1][1], "로그인 실패");
        assert_eq!(rows[1][2], "Security");
        assert_eq!(rows[1][3], "P1");
        assert_eq!(rows[1][4], "5m");
        assert_eq!(rows[1][7], "1. Open\n2. Tap");
    }

    #[test]
    fn test_plain_csv_follows_column_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cases.csv");
        let columns = vec!["title".to_string(), "priority".to_string(), "custom".to_string()];
        write_csv(&[sample()], &path, &columns).unwrap();

        let (_, rows) = read_back(&path);
        assert_eq!(rows[0], vec!["title", "priority", "custom"]);
        assert_eq!(rows[1], vec!["로그인 실패", "P1", ""]);
    }
}
