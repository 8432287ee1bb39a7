//! Report workbook layout. [`build_report`] turns [`RunResults`] into one
//! table per sheet; [`crate::io::excel_write`] materialises them.

use crate::model::DrawingType;
use crate::process::RunResults;

pub const SUMMARY_SHEET: &str = "Summary";
pub const PROCESSED_SHEET: &str = "Successfully Processed";
pub const NO_MATCHES_SHEET: &str = "No Matches Found";
pub const FILES_NOT_FOUND_SHEET: &str = "Files Not Found";
pub const COPY_ERRORS_SHEET: &str = "Copy Errors";
pub const UNUSED_SHEET: &str = "Unused Section Files";
pub const ALL_REFERENCES_SHEET: &str = "All References";
pub const ALL_DRAWINGS_SHEET: &str = "All Drawings";
pub const PER_REFERENCE_SHEET: &str = "Per-Reference Summary";
pub const INVALID_REFERENCES_SHEET: &str = "Invalid References";
pub const DUPLICATES_SHEET: &str = "Duplicate Filenames";
pub const REPORT_INFO_SHEET: &str = "Report Info";

/// A single cell of a report sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// A table that will be materialised as an Excel sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    fn new(sheet_name: &str, columns: &[&str]) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
            columns: columns.iter().map(|column| column.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }
}

/// Represents all tables required to materialise the report workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookData {
    pub tables: Vec<SheetTable>,
}

impl WorkbookData {
    pub fn table(&self, sheet_name: &str) -> Option<&SheetTable> {
        self.tables
            .iter()
            .find(|table| table.sheet_name == sheet_name)
    }
}

/// Run metadata shown on the report info sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportInfo {
    pub generated_at: String,
    pub tool_version: String,
    pub sources: Vec<String>,
}

/// Flattens the results of a run into the report sheets.
pub fn build_report(results: &RunResults, info: &ReportInfo) -> WorkbookData {
    let tables = vec![
        summary_table(results),
        processed_table(results),
        no_matches_table(results),
        files_not_found_table(results),
        copy_errors_table(results),
        unused_table(results),
        all_references_table(results),
        all_drawings_table(results),
        per_reference_table(results),
        invalid_references_table(results),
        duplicates_table(results),
        report_info_table(info),
    ];
    WorkbookData { tables }
}

fn summary_table(results: &RunResults) -> SheetTable {
    let mut table = SheetTable::new(SUMMARY_SHEET, &["Metric", "Value"]);
    let metrics: [(&str, CellValue); 10] = [
        ("Total References in Accommodation Schedule", results.total_references().into()),
        ("Total Drawings in Architect Spreadsheet", results.total_drawings.into()),
        ("Recognised Drawings", results.drawings.len().into()),
        ("Successful Matches and Copies", results.copied.len().into()),
        ("References with No Matches", results.no_matches.len().into()),
        ("Matches Found but Files Missing", results.missing_files.len().into()),
        ("Copy Errors", results.copy_errors.len().into()),
        ("Unused Drawing Files", results.unused_drawings().count().into()),
        ("Invalid References", results.invalid_references.len().into()),
        ("Overall Success Rate (%)", round_one_decimal(results.success_rate()).into()),
    ];
    for (metric, value) in metrics {
        table.push(vec![metric.into(), value]);
    }
    table
}

fn processed_table(results: &RunResults) -> SheetTable {
    let mut table = SheetTable::new(
        PROCESSED_SHEET,
        &[
            "Reference",
            "Drawing Type",
            "Match Rule",
            "Original Filename",
            "New Filename",
            "Title",
            "Source Path",
            "Destination Path",
            "Destination Folder",
            "Note",
        ],
    );
    for record in &results.copied {
        let note = match &record.shared_with {
            Some(reference) => format!("already copied for {reference}"),
            None => String::new(),
        };
        table.push(vec![
            record.reference.as_str().into(),
            record.drawing_type.label().into(),
            record.rule.label().into(),
            record.original_filename.as_str().into(),
            record.new_filename.as_str().into(),
            record.title.as_str().into(),
            record.source_path.display().to_string().into(),
            record.destination_path.display().to_string().into(),
            record.destination_folder.display().to_string().into(),
            note.into(),
        ]);
    }
    table
}

fn no_matches_table(results: &RunResults) -> SheetTable {
    let mut table = SheetTable::new(NO_MATCHES_SHEET, &["Reference", "Reason"]);
    for reference in &results.no_matches {
        table.push(vec![
            reference.as_str().into(),
            "No matching drawing found in architect spreadsheet".into(),
        ]);
    }
    table
}

fn files_not_found_table(results: &RunResults) -> SheetTable {
    let mut table = SheetTable::new(
        FILES_NOT_FOUND_SHEET,
        &["Reference", "Title", "Filename", "Expected Path", "Reason"],
    );
    for record in &results.missing_files {
        table.push(vec![
            record.reference.as_str().into(),
            record.title.as_str().into(),
            record.filename.as_str().into(),
            record.expected_path.display().to_string().into(),
            "File not found in architect directory".into(),
        ]);
    }
    table
}

fn copy_errors_table(results: &RunResults) -> SheetTable {
    let mut table = SheetTable::new(
        COPY_ERRORS_SHEET,
        &["Reference", "Title", "Filename", "Source Path", "Error"],
    );
    for record in &results.copy_errors {
        table.push(vec![
            record.reference.as_str().into(),
            record.title.as_str().into(),
            record.filename.as_str().into(),
            record.source_path.display().to_string().into(),
            record.error.as_str().into(),
        ]);
    }
    table
}

fn unused_table(results: &RunResults) -> SheetTable {
    let mut table = SheetTable::new(UNUSED_SHEET, &["Filename", "Title", "Drawing Type", "Status"]);
    for drawing in results.unused_drawings() {
        table.push(vec![
            drawing.entry.filename.as_str().into(),
            drawing.entry.title.as_str().into(),
            drawing.drawing_type.label().into(),
            "UNUSED".into(),
        ]);
    }
    table
}

fn all_references_table(results: &RunResults) -> SheetTable {
    let mut table = SheetTable::new(
        ALL_REFERENCES_SHEET,
        &["No.", "Reference", "Status", "Files Copied"],
    );
    for (number, summary) in results.references.iter().enumerate() {
        let status = if summary.files_copied > 0 {
            "PROCESSED"
        } else {
            "NOT PROCESSED"
        };
        table.push(vec![
            (number + 1).into(),
            summary.raw.as_str().into(),
            status.into(),
            summary.files_copied.into(),
        ]);
    }
    table
}

fn all_drawings_table(results: &RunResults) -> SheetTable {
    let mut table = SheetTable::new(
        ALL_DRAWINGS_SHEET,
        &["No.", "Filename", "Title", "Drawing Type", "Status"],
    );
    for (number, drawing) in results.drawings.iter().enumerate() {
        let status = if drawing.used { "USED" } else { "UNUSED" };
        table.push(vec![
            (number + 1).into(),
            drawing.entry.filename.as_str().into(),
            drawing.entry.title.as_str().into(),
            drawing.drawing_type.label().into(),
            status.into(),
        ]);
    }
    table
}

fn per_reference_table(results: &RunResults) -> SheetTable {
    let mut table = SheetTable::new(
        PER_REFERENCE_SHEET,
        &["Reference", "Matches", "Files Copied", "Status", "Output Folder"],
    );
    for summary in &results.references {
        let status = match (summary.match_count, summary.files_copied) {
            (0, _) => "NO MATCH",
            (_, 0) => "NO FILES COPIED",
            _ => "SUCCESS",
        };
        let folder = summary
            .output_folder
            .as_ref()
            .map(|folder| folder.display().to_string())
            .unwrap_or_else(|| "N/A".to_string());
        table.push(vec![
            summary.raw.as_str().into(),
            summary.match_count.into(),
            summary.files_copied.into(),
            status.into(),
            folder.into(),
        ]);
    }
    table
}

fn invalid_references_table(results: &RunResults) -> SheetTable {
    let mut table = SheetTable::new(INVALID_REFERENCES_SHEET, &["Reference", "Error"]);
    for invalid in &results.invalid_references {
        table.push(vec![
            invalid.raw.as_str().into(),
            invalid.error.to_string().into(),
        ]);
    }
    table
}

fn duplicates_table(results: &RunResults) -> SheetTable {
    let mut table = SheetTable::new(DUPLICATES_SHEET, &["Filename", "Occurrences"]);
    for (filename, count) in &results.duplicate_filenames {
        table.push(vec![filename.as_str().into(), (*count).into()]);
    }
    table
}

fn report_info_table(info: &ReportInfo) -> SheetTable {
    let mut table = SheetTable::new(REPORT_INFO_SHEET, &["Report Information", "Value"]);
    table.push(vec!["Generated Date/Time".into(), info.generated_at.as_str().into()]);
    table.push(vec![
        "Tool Version".into(),
        format!("asbuilt-tools {}", info.tool_version).into(),
    ]);
    let document_types: Vec<&str> = DrawingType::ALL.iter().map(|kind| kind.label()).collect();
    table.push(vec![
        "Document Types Processed".into(),
        document_types.join(", ").into(),
    ]);
    table.push(vec!["Source Spreadsheets".into(), info.sources.join(", ").into()]);
    table
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
