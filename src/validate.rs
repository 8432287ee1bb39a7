//! Pre-flight inspection of the inputs before a real run: workbook shape,
//! a trial of the matcher on a few references, and whether the listed
//! drawing files exist on disk.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::config::ProcessorConfig;
use crate::error::Result;
use crate::io::excel_read;
use crate::matching::{ParsedTitle, find_matches, normalize, source_file_name};
use crate::model::DrawingEntry;
use crate::process::filter_references;

/// Findings for the accommodation schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSection {
    pub path: PathBuf,
    pub column: String,
    /// Data rows, usable references and a sample, or the read error.
    pub outcome: std::result::Result<ScheduleStats, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleStats {
    pub data_rows: usize,
    pub references: Vec<String>,
}

/// Findings for the architect register.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterSection {
    pub path: PathBuf,
    pub outcome: std::result::Result<RegisterStats, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterStats {
    pub data_rows: usize,
    pub drawings: Vec<DrawingEntry>,
    pub recognised: usize,
}

/// Result of trying the matcher on one reference.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchTrial {
    pub reference: String,
    pub outcome: TrialOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrialOutcome {
    Invalid(String),
    Matched(Vec<DrawingEntry>),
    /// No match; carries titles that mention the reference text anyway.
    Unmatched { near_misses: Vec<String> },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Availability {
    pub found: Vec<String>,
    pub missing: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub sample_size: usize,
    pub schedule: ScheduleSection,
    pub register: RegisterSection,
    pub trials: Vec<MatchTrial>,
    pub availability: Availability,
}

const NEAR_MISS_LIMIT: usize = 3;

/// Inspects the configured inputs. Unreadable workbooks are reported in the
/// corresponding section rather than returned as errors.
#[instrument(level = "info", skip(config))]
pub fn run(config: &ProcessorConfig, sample_size: usize) -> Result<ValidationReport> {
    config.validate()?;

    let schedule_path = config.accommodation_workbook();
    let register_path = config.architect_workbook();

    let schedule_outcome = read_schedule(config, &schedule_path);
    let register_outcome = read_register(config, &register_path);

    let mut trials = Vec::new();
    let mut availability = Availability::default();
    if let (Ok(schedule), Ok(register)) = (&schedule_outcome, &register_outcome) {
        trials = schedule
            .references
            .iter()
            .take(sample_size)
            .map(|reference| trial(reference, &register.drawings))
            .collect();
    }
    if let Ok(register) = &register_outcome {
        availability = check_availability(config, &register.drawings, sample_size);
    }
    info!(
        trials = trials.len(),
        missing = availability.missing.len(),
        "validation complete"
    );

    Ok(ValidationReport {
        sample_size,
        schedule: ScheduleSection {
            path: schedule_path,
            column: excel_read::column_letter(config.reference_column),
            outcome: schedule_outcome,
        },
        register: RegisterSection {
            path: register_path,
            outcome: register_outcome,
        },
        trials,
        availability,
    })
}

fn read_schedule(
    config: &ProcessorConfig,
    path: &Path,
) -> std::result::Result<ScheduleStats, String> {
    if !path.is_file() {
        return Err(format!("file not found: {}", path.display()));
    }
    let data_rows =
        excel_read::count_data_rows(path, config.header_rows).map_err(|err| err.to_string())?;
    let raw = excel_read::read_column(path, config.reference_column, config.header_rows)
        .map_err(|err| err.to_string())?;
    Ok(ScheduleStats {
        data_rows,
        references: filter_references(raw, &config.ignored_reference_prefixes),
    })
}

fn read_register(
    config: &ProcessorConfig,
    path: &Path,
) -> std::result::Result<RegisterStats, String> {
    if !path.is_file() {
        return Err(format!("file not found: {}", path.display()));
    }
    let data_rows =
        excel_read::count_data_rows(path, config.header_rows).map_err(|err| err.to_string())?;
    let drawings = excel_read::read_drawings(
        path,
        config.filename_column,
        config.title_column,
        config.header_rows,
    )
    .map_err(|err| err.to_string())?;
    let recognised = drawings
        .iter()
        .filter(|entry| ParsedTitle::parse(&entry.title).is_some())
        .count();
    Ok(RegisterStats {
        data_rows,
        drawings,
        recognised,
    })
}

/// Runs the matcher for one reference against the register.
pub fn trial(raw: &str, drawings: &[DrawingEntry]) -> MatchTrial {
    let outcome = match normalize(raw) {
        Err(error) => TrialOutcome::Invalid(error.to_string()),
        Ok(reference) => {
            let matches = find_matches(&reference, drawings);
            if matches.is_empty() {
                let needle = raw.to_lowercase();
                let near_misses = drawings
                    .iter()
                    .filter(|entry| entry.title.to_lowercase().contains(&needle))
                    .take(NEAR_MISS_LIMIT)
                    .map(|entry| entry.title.clone())
                    .collect();
                TrialOutcome::Unmatched { near_misses }
            } else {
                TrialOutcome::Matched(
                    matches
                        .iter()
                        .map(|matched| matched.entry.clone())
                        .collect(),
                )
            }
        }
    };
    MatchTrial {
        reference: raw.to_string(),
        outcome,
    }
}

fn check_availability(
    config: &ProcessorConfig,
    drawings: &[DrawingEntry],
    sample_size: usize,
) -> Availability {
    let architect_dir = config.architect_directory();
    let mut seen: Vec<String> = Vec::new();
    let mut availability = Availability::default();

    for entry in drawings {
        if seen.len() >= sample_size {
            break;
        }
        if seen.contains(&entry.filename) {
            continue;
        }
        seen.push(entry.filename.clone());

        let file_name = source_file_name(&entry.filename, &config.source_extension);
        let path = architect_dir.join(&file_name);
        if path.is_file() {
            availability.found.push(file_name);
        } else {
            availability.missing.push(path);
        }
    }
    availability
}

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{}", "=".repeat(60))?;
    writeln!(f, "{title}")?;
    writeln!(f, "{}", "=".repeat(60))
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, "ACCOMMODATION SCHEDULE")?;
        writeln!(f, "File: {}", self.schedule.path.display())?;
        match &self.schedule.outcome {
            Ok(stats) => {
                writeln!(f, "Data rows: {}", stats.data_rows)?;
                writeln!(
                    f,
                    "Usable references in column {}: {}",
                    self.schedule.column,
                    stats.references.len()
                )?;
                let sample = stats.references.iter().take(self.sample_size);
                for (number, reference) in sample.enumerate() {
                    writeln!(f, "  {}: {reference}", number + 1)?;
                }
            }
            Err(error) => writeln!(f, "Error: {error}")?,
        }

        heading(f, "ARCHITECT SPREADSHEET")?;
        writeln!(f, "File: {}", self.register.path.display())?;
        match &self.register.outcome {
            Ok(stats) => {
                writeln!(f, "Data rows: {}", stats.data_rows)?;
                writeln!(f, "Drawings with a recognised type: {}", stats.recognised)?;
                for entry in stats.drawings.iter().take(self.sample_size) {
                    writeln!(f, "  {} -> {}", entry.filename, entry.title)?;
                }
            }
            Err(error) => writeln!(f, "Error: {error}")?,
        }

        heading(f, "MATCHING TRIAL")?;
        for trial in &self.trials {
            writeln!(f, "{}", trial.reference)?;
            match &trial.outcome {
                TrialOutcome::Invalid(error) => writeln!(f, "  invalid reference: {error}")?,
                TrialOutcome::Matched(entries) => {
                    writeln!(f, "  found {} match(es):", entries.len())?;
                    for entry in entries {
                        writeln!(f, "    - {} -> {}", entry.filename, entry.title)?;
                    }
                }
                TrialOutcome::Unmatched { near_misses } => {
                    writeln!(f, "  no matches found")?;
                    for title in near_misses {
                        writeln!(f, "    partial: {title}")?;
                    }
                }
            }
        }

        heading(f, "FILE AVAILABILITY")?;
        for name in &self.availability.found {
            writeln!(f, "  found: {name}")?;
        }
        for path in &self.availability.missing {
            writeln!(f, "  missing: {}", path.display())?;
        }
        writeln!(
            f,
            "Found {}, missing {}",
            self.availability.found.len(),
            self.availability.missing.len()
        )
    }
}
