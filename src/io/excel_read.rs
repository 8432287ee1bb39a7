use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};

use crate::error::{Result, ToolError};
use crate::model::DrawingEntry;

/// Reads one column of the first worksheet, skipping `header_rows` leading
/// rows. Blank cells are dropped and values are trimmed.
pub fn read_column(path: &Path, column: usize, header_rows: usize) -> Result<Vec<String>> {
    let sheet = FirstSheet::open(path)?;
    sheet.require_column(column)?;

    Ok(sheet
        .data_rows(header_rows)
        .map(|row| sheet.cell_text(row, column))
        .filter(|value| !value.is_empty())
        .collect())
}

/// Reads `(filename, title)` pairs from the first worksheet. Rows missing
/// either value are skipped.
pub fn read_drawings(
    path: &Path,
    filename_column: usize,
    title_column: usize,
    header_rows: usize,
) -> Result<Vec<DrawingEntry>> {
    let sheet = FirstSheet::open(path)?;
    sheet.require_column(filename_column)?;
    sheet.require_column(title_column)?;

    Ok(sheet
        .data_rows(header_rows)
        .filter_map(|row| {
            let filename = sheet.cell_text(row, filename_column);
            let title = sheet.cell_text(row, title_column);
            if filename.is_empty() || title.is_empty() {
                None
            } else {
                Some(DrawingEntry::new(filename, title))
            }
        })
        .collect())
}

/// Number of rows in the first worksheet after the header rows.
pub fn count_data_rows(path: &Path, header_rows: usize) -> Result<usize> {
    let sheet = FirstSheet::open(path)?;
    Ok(sheet.data_rows(header_rows).count())
}

/// Spreadsheet letter for a zero-based column index (`3` → `D`).
pub fn column_letter(column: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = column + 1;
    while remaining > 0 {
        let offset = (remaining - 1) % 26;
        letters.push(char::from(b'A' + offset as u8));
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// First worksheet of a workbook. calamine ranges start at the first used
/// cell, so absolute row/column indices are translated through the offsets.
struct FirstSheet<'p> {
    path: &'p Path,
    range: Range<DataType>,
    row_offset: usize,
    col_offset: usize,
}

impl<'p> FirstSheet<'p> {
    fn open(path: &'p Path) -> Result<Self> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| {
                ToolError::InvalidWorkbook(format!("{} contains no worksheets", path.display()))
            })?
            .map_err(ToolError::from)?;
        let (row_offset, col_offset) = range
            .start()
            .map(|(row, col)| (row as usize, col as usize))
            .unwrap_or((0, 0));

        Ok(Self {
            path,
            range,
            row_offset,
            col_offset,
        })
    }

    fn require_column(&self, column: usize) -> Result<()> {
        let last_column = self.col_offset + self.range.width();
        if self.range.is_empty() || column < self.col_offset || column >= last_column {
            return Err(ToolError::InvalidWorkbook(format!(
                "{} has no data in column {}",
                self.path.display(),
                column_letter(column)
            )));
        }
        Ok(())
    }

    fn data_rows(&self, header_rows: usize) -> impl Iterator<Item = &[DataType]> {
        self.range
            .rows()
            .skip(header_rows.saturating_sub(self.row_offset))
    }

    fn cell_text(&self, row: &[DataType], column: usize) -> String {
        let cell = column
            .checked_sub(self.col_offset)
            .and_then(|index| row.get(index));
        cell_to_string(cell).trim().to_string()
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_follow_spreadsheet_naming() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(3), "D");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
    }
}
