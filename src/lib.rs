//! Core library for the as-built drawing extraction tool.
//!
//! Unit references from an accommodation schedule are matched against the
//! drawing titles of an architect register; matching drawings are copied
//! into one folder per reference group under standardised names, and a
//! multi-sheet report records the outcome. The pure matching and naming
//! engine lives in [`matching`], spreadsheet adapters in [`io`], the run
//! orchestration in [`process`] and the report layout in [`report`].

pub mod config;
pub mod error;
pub mod io;
pub mod matching;
pub mod model;
pub mod process;
pub mod report;
pub mod validate;

pub use config::ProcessorConfig;
pub use error::{NormalizationError, Result, ToolError};
