//! Spreadsheet adapters: reading the schedule and register with calamine,
//! writing the report workbook with rust_xlsxwriter.

pub mod excel_read;
pub mod excel_write;
