use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};

/// Locations and column bindings for a processing run.
///
/// Relative directories resolve against [`ProcessorConfig::base_dir`].
/// Column indices are zero-based (`3` is column D).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub base_dir: PathBuf,
    pub spreadsheet_dir: PathBuf,
    pub architect_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub report_dir: PathBuf,
    pub accommodation_file: String,
    pub architect_file: String,
    pub reference_column: usize,
    pub filename_column: usize,
    pub title_column: usize,
    pub header_rows: usize,
    /// Schedule cells starting with any of these are treated as labels.
    pub ignored_reference_prefixes: Vec<String>,
    /// Extension appended to register file names to locate source files.
    pub source_extension: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            spreadsheet_dir: PathBuf::from("spreadsheet"),
            architect_dir: PathBuf::from("architect"),
            processed_dir: PathBuf::from("processed"),
            report_dir: PathBuf::from("."),
            accommodation_file: "accomodation_schedule.xlsx".into(),
            architect_file: "architect_spreadsheet.xlsx".into(),
            reference_column: 3,
            filename_column: 0,
            title_column: 1,
            header_rows: 1,
            ignored_reference_prefixes: vec!["Flat".into()],
            source_extension: "pdf".into(),
        }
    }
}

impl ProcessorConfig {
    /// Loads a JSON configuration file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: ProcessorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces the base directory.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.filename_column == self.title_column {
            return Err(ToolError::Config(format!(
                "filename and title columns must differ (both are {})",
                self.filename_column
            )));
        }
        if self
            .source_extension
            .contains(|ch: char| ch == '/' || ch == '\\')
        {
            return Err(ToolError::Config(format!(
                "source extension '{}' contains a path separator",
                self.source_extension
            )));
        }
        if self.accommodation_file.trim().is_empty() || self.architect_file.trim().is_empty() {
            return Err(ToolError::Config("workbook file names must not be empty".into()));
        }
        Ok(())
    }

    pub fn accommodation_workbook(&self) -> PathBuf {
        self.resolve(&self.spreadsheet_dir).join(&self.accommodation_file)
    }

    pub fn architect_workbook(&self) -> PathBuf {
        self.resolve(&self.spreadsheet_dir).join(&self.architect_file)
    }

    pub fn architect_directory(&self) -> PathBuf {
        self.resolve(&self.architect_dir)
    }

    pub fn processed_directory(&self) -> PathBuf {
        self.resolve(&self.processed_dir)
    }

    pub fn report_directory(&self) -> PathBuf {
        self.resolve(&self.report_dir)
    }

    fn resolve(&self, dir: &Path) -> PathBuf {
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.base_dir.join(dir)
        }
    }
}
