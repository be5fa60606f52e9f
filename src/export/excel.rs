use super::{ExportError, ExportOptions};
use crate::testcase::{Priority, TestCase};
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};
use std::path::Path;

pub const CASES_SHEET: &str = "TestCases";
pub const SUMMARY_SHEET: &str = "Summary";

const DEFAULT_COLUMN_WIDTH: f64 = 20.0;

/// Display width for a column name
pub fn column_width(column: &str) -> f64 {
    match column {
        "domain" => 15.0,
        "section" | "component" => 20.0,
        "feature" => 25.0,
        "title" => 50.0,
        "precondition" => 40.0,
        "test_step" | "expected_results" => 60.0,
        "priority" => 10.0,
        "type" => 15.0,
        "comment" => 30.0,
        "web_result" | "app_result" => 15.0,
        _ => DEFAULT_COLUMN_WIDTH,
    }
}

/// Spreadsheet column letters for a zero-based index (0 -> A, 26 -> AA)
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

pub fn write_workbook(
    cases: &[TestCase],
    path: &Path,
    options: &ExportOptions,
) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    workbook.push_worksheet(cases_sheet(cases, &options.columns)?);

    if options.summary_formulas {
        if let Some(index) = options.columns.iter().position(|c| c == "priority") {
            workbook.push_worksheet(summary_sheet(&column_letter(index))?);
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn cases_sheet(cases: &[TestCase], columns: &[String]) -> Result<Worksheet, ExportError> {
    let header = Format::new().set_bold().set_text_wrap().set_align(FormatAlign::Top);
    let cell = Format::new().set_text_wrap().set_align(FormatAlign::Top);

    let mut sheet = Worksheet::new();
    sheet.set_name(CASES_SHEET)?;

    for (col, name) in columns.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, name.as_str(), &header)?;
        sheet.set_column_width(col, column_width(name))?;
    }
    sheet.set_freeze_panes(1, 0)?;

    for (row, case) in cases.iter().enumerate() {
        let row = row as u32 + 1;
        for (col, name) in columns.iter().enumerate() {
            sheet.write_string_with_format(row, col as u16, case.field(name), &cell)?;
        }
    }

    Ok(sheet)
}

/// Per-priority counts as COUNTIF formulas over the cases sheet
fn summary_sheet(priority_column: &str) -> Result<Worksheet, ExportError> {
    let header = Format::new().set_bold();

    let mut sheet = Worksheet::new();
    sheet.set_name(SUMMARY_SHEET)?;
    sheet.write_string_with_format(0, 0, "Priority", &header)?;
    sheet.write_string_with_format(0, 1, "Count", &header)?;
    sheet.set_column_width(0, 12)?;
    sheet.set_column_width(1, 10)?;

    for (i, priority) in Priority::ALL.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, priority.as_str())?;
        sheet.write_formula(row, 1, summary_formula(priority_column, *priority).as_str())?;
    }

    let total_row = Priority::ALL.len() as u32 + 1;
    sheet.write_string_with_format(total_row, 0, "Total", &header)?;
    sheet.write_formula(total_row, 1, format!("=SUM(B2:B{})", total_row).as_str())?;

    Ok(sheet)
}

pub fn summary_formula(priority_column: &str, priority: Priority) -> String {
    format!(
        "=COUNTIF({}!${col}:${col},\"{}\")",
        CASES_SHEET,
        priority,
        col = priority_column
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(8), "I");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
    }

    #[test]
    fn test_summary_formula() {
        assert_eq!(
            summary_formula("I", Priority::P1),
            "=COUNTIF(TestCases!$I:$I,\"P1\")"
        );
    }

    #[test]
    fn test_column_widths() {
        assert_eq!(column_width("title"), 50.0);
        assert_eq!(column_width("test_step"), 60.0);
        assert_eq!(column_width("app_result"), 15.0);
        assert_eq!(column_width("anything"), DEFAULT_COLUMN_WIDTH);
    }

    /// Part names inside the written xlsx archive
    fn workbook_parts(path: &Path) -> Vec<String> {
        let archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    fn login_case() -> Vec<TestCase> {
        vec![TestCase {
            title: "Successful login flow".to_string(),
            priority: Priority::P1,
            ..Default::default()
        }]
    }

    #[test]
    fn test_write_workbook_with_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cases.xlsx");
        let options = ExportOptions {
            summary_formulas: true,
            ..Default::default()
        };

        write_workbook(&login_case(), &path, &options).unwrap();

        let parts = workbook_parts(&path);
        assert!(parts.iter().any(|p| p == "xl/worksheets/sheet1.xml"));
        assert!(parts.iter().any(|p| p == "xl/worksheets/sheet2.xml"));

        let mut archive = zip::ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
        let mut workbook_xml = String::new();
        std::io::Read::read_to_string(
            &mut archive.by_name("xl/workbook.xml").unwrap(),
            &mut workbook_xml,
        )
        .unwrap();
        assert!(workbook_xml.contains(SUMMARY_SHEET));
        assert!(workbook_xml.contains(CASES_SHEET));
    }

    #[test]
    fn test_write_workbook_without_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cases.xlsx");

        write_workbook(&login_case(), &path, &ExportOptions::default()).unwrap();

        let parts = workbook_parts(&path);
        assert!(parts.iter().any(|p| p == "xl/worksheets/sheet1.xml"));
        assert!(!parts.iter().any(|p| p == "xl/worksheets/sheet2.xml"));
    }
}
