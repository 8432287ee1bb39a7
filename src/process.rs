use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, error, info, instrument, warn};

use crate::config::ProcessorConfig;
use crate::error::{Result, ToolError};
use crate::io::{excel_read, excel_write};
use crate::matching::normalize::collapse_whitespace;
use crate::matching::{InvalidReference, MatchPlan, output_location, source_file_name};
use crate::model::{DrawingEntry, DrawingType, Match, MatchRule, ReferenceOutcome};
use crate::report::{self, ReportInfo};

/// Both input tables, filtered and ready for matching.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub references: Vec<String>,
    pub drawings: Vec<DrawingEntry>,
}

/// A drawing copied into the processed tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyRecord {
    pub reference: String,
    pub title: String,
    pub drawing_type: DrawingType,
    pub rule: MatchRule,
    pub original_filename: String,
    pub new_filename: String,
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub destination_folder: PathBuf,
    /// Set when an earlier reference already copied to the same destination.
    pub shared_with: Option<String>,
}

/// A match whose source file is absent from the architect directory.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingFileRecord {
    pub reference: String,
    pub title: String,
    pub filename: String,
    pub expected_path: PathBuf,
}

/// A match whose copy failed with an I/O error.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyErrorRecord {
    pub reference: String,
    pub title: String,
    pub filename: String,
    pub source_path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSummary {
    pub raw: String,
    pub outcome: ReferenceOutcome,
    pub match_count: usize,
    pub files_copied: usize,
    pub output_folder: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawingStatus {
    pub entry: DrawingEntry,
    pub drawing_type: DrawingType,
    pub used: bool,
}

/// Everything a run produced, grouped by report category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunResults {
    pub references: Vec<ReferenceSummary>,
    pub copied: Vec<CopyRecord>,
    pub no_matches: Vec<String>,
    pub missing_files: Vec<MissingFileRecord>,
    pub copy_errors: Vec<CopyErrorRecord>,
    pub invalid_references: Vec<InvalidReference>,
    /// Every register row, recognised or not.
    pub total_drawings: usize,
    /// Register rows with a recognised drawing type.
    pub drawings: Vec<DrawingStatus>,
    pub duplicate_filenames: Vec<(String, usize)>,
}

impl RunResults {
    /// Valid plus invalid references read from the schedule.
    pub fn total_references(&self) -> usize {
        self.references.len() + self.invalid_references.len()
    }

    pub fn unused_drawings(&self) -> impl Iterator<Item = &DrawingStatus> {
        self.drawings.iter().filter(|drawing| !drawing.used)
    }

    /// Percentage of valid references with at least one file copied.
    pub fn success_rate(&self) -> f64 {
        if self.references.is_empty() {
            return 0.0;
        }
        let processed = self
            .references
            .iter()
            .filter(|summary| summary.files_copied > 0)
            .count();
        processed as f64 / self.references.len() as f64 * 100.0
    }
}

/// Outcome of a full run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub results: RunResults,
    pub report_path: PathBuf,
}

/// Runs the whole extraction: load both workbooks, match, copy and write the
/// report. Per-row problems are recorded in the results; only structural
/// input problems return an error.
#[instrument(level = "info", skip_all, fields(base_dir = %config.base_dir.display()))]
pub fn run(config: &ProcessorConfig) -> Result<RunSummary> {
    config.validate()?;
    let inputs = load_inputs(config)?;

    let plan = MatchPlan::build(&inputs.references, &inputs.drawings);
    info!(matches = plan.match_count(), "matching complete");

    let results = execute(&plan, config);
    log_statistics(&results);

    let generated_at = Local::now();
    let report_path = config
        .report_directory()
        .join(report_file_name(&generated_at));
    let info = ReportInfo {
        generated_at: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        sources: vec![
            config.accommodation_file.clone(),
            config.architect_file.clone(),
        ],
    };
    let workbook = report::build_report(&results, &info);
    excel_write::write_workbook(&report_path, &workbook)?;
    info!(path = %report_path.display(), "report written");

    Ok(RunSummary {
        results,
        report_path,
    })
}

/// Loads the reference column and the drawing register.
#[instrument(level = "info", skip_all)]
pub fn load_inputs(config: &ProcessorConfig) -> Result<Inputs> {
    let accommodation = config.accommodation_workbook();
    let architect = config.architect_workbook();
    for path in [&accommodation, &architect] {
        if !path.is_file() {
            return Err(ToolError::MissingInput(path.clone()));
        }
    }

    let raw = excel_read::read_column(&accommodation, config.reference_column, config.header_rows)?;
    debug!(rows = raw.len(), "read reference column");
    let references = filter_references(raw, &config.ignored_reference_prefixes);
    if references.is_empty() {
        return Err(ToolError::NoReferences(accommodation));
    }
    info!(count = references.len(), "loaded unit references");

    let drawings = excel_read::read_drawings(
        &architect,
        config.filename_column,
        config.title_column,
        config.header_rows,
    )?;
    info!(count = drawings.len(), "loaded drawing register");

    Ok(Inputs {
        references,
        drawings,
    })
}

/// Drops header labels and repeated values, keeping first occurrences in
/// schedule order. Repeats are compared ignoring case and spacing.
pub fn filter_references(raw: Vec<String>, ignored_prefixes: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .filter(|value| {
            !ignored_prefixes
                .iter()
                .any(|prefix| !prefix.is_empty() && value.starts_with(prefix.as_str()))
        })
        .filter(|value| seen.insert(collapse_whitespace(value).to_uppercase()))
        .collect()
}

/// Copies every planned match and gathers the per-category records.
pub fn execute(plan: &MatchPlan<'_>, config: &ProcessorConfig) -> RunResults {
    let architect_dir = config.architect_directory();
    let processed_dir = config.processed_directory();
    let mut written: HashMap<PathBuf, String> = HashMap::new();
    let mut results = RunResults::default();

    for reference_plan in &plan.references {
        let raw = reference_plan.raw.as_str();
        let mut files_copied = 0;
        let mut output_folder = None;

        if reference_plan.matches.is_empty() {
            results.no_matches.push(raw.to_string());
        }

        for matched in &reference_plan.matches {
            match copy_match(
                matched,
                raw,
                &architect_dir,
                &processed_dir,
                &config.source_extension,
                &mut written,
            ) {
                CopyOutcome::Copied(record) => {
                    files_copied += 1;
                    if output_folder.is_none() {
                        output_folder = Some(record.destination_folder.clone());
                    }
                    results.copied.push(record);
                }
                CopyOutcome::Missing(record) => results.missing_files.push(record),
                CopyOutcome::Failed(record) => results.copy_errors.push(record),
            }
        }

        results.references.push(ReferenceSummary {
            raw: raw.to_string(),
            outcome: reference_plan.outcome(),
            match_count: reference_plan.matches.len(),
            files_copied,
            output_folder,
        });
    }

    results.invalid_references = plan.invalid.clone();
    results.total_drawings = plan.drawings().len();
    results.drawings = plan
        .recognised_drawings()
        .into_iter()
        .map(|drawing| DrawingStatus {
            entry: drawing.entry.clone(),
            drawing_type: drawing.drawing_type,
            used: plan.is_used(drawing.index),
        })
        .collect();
    results.duplicate_filenames = plan.duplicate_filenames();
    for (filename, count) in &results.duplicate_filenames {
        warn!(%filename, count, "file name listed more than once in register");
    }

    results
}

/// Report file name for a run started at `timestamp`.
pub fn report_file_name(timestamp: &DateTime<Local>) -> String {
    format!("processing_report_{}.xlsx", timestamp.format("%Y%m%d_%H%M%S"))
}

enum CopyOutcome {
    Copied(CopyRecord),
    Missing(MissingFileRecord),
    Failed(CopyErrorRecord),
}

fn copy_match(
    matched: &Match<'_>,
    reference: &str,
    architect_dir: &Path,
    processed_dir: &Path,
    source_extension: &str,
    written: &mut HashMap<PathBuf, String>,
) -> CopyOutcome {
    let original_filename = source_file_name(&matched.entry.filename, source_extension);
    let source_path = architect_dir.join(&original_filename);

    if !source_path.is_file() {
        error!(path = %source_path.display(), %reference, "source file not found");
        return CopyOutcome::Missing(MissingFileRecord {
            reference: reference.to_string(),
            title: matched.entry.title.clone(),
            filename: matched.entry.filename.clone(),
            expected_path: source_path,
        });
    }

    let location = output_location(matched, source_extension);
    let destination_folder = processed_dir.join(&location.folder_name);
    let destination_path = destination_folder.join(&location.new_filename);

    let shared_with = written.get(&destination_path).cloned();
    if let Some(first) = &shared_with {
        debug!(
            destination = %destination_path.display(),
            %reference,
            %first,
            "destination already written in this run"
        );
    } else {
        if let Err(err) = copy_file(&source_path, &destination_folder, &destination_path) {
            error!(source = %source_path.display(), error = %err, "copy failed");
            return CopyOutcome::Failed(CopyErrorRecord {
                reference: reference.to_string(),
                title: matched.entry.title.clone(),
                filename: matched.entry.filename.clone(),
                source_path,
                error: err.to_string(),
            });
        }
        written.insert(destination_path.clone(), reference.to_string());
        info!(
            source = %original_filename,
            destination = %destination_path.display(),
            "copied drawing"
        );
    }

    CopyOutcome::Copied(CopyRecord {
        reference: reference.to_string(),
        title: matched.entry.title.clone(),
        drawing_type: matched.drawing_type,
        rule: matched.rule,
        original_filename,
        new_filename: location.new_filename,
        source_path,
        destination_path,
        destination_folder,
        shared_with,
    })
}

fn copy_file(source: &Path, folder: &Path, destination: &Path) -> std::io::Result<()> {
    fs::create_dir_all(folder)?;
    fs::copy(source, destination)?;
    Ok(())
}

fn log_statistics(results: &RunResults) {
    info!(
        references = results.total_references(),
        copied = results.copied.len(),
        no_matches = results.no_matches.len(),
        missing_files = results.missing_files.len(),
        copy_errors = results.copy_errors.len(),
        invalid = results.invalid_references.len(),
        unused_drawings = results.unused_drawings().count(),
        success_rate = %format!("{:.1}%", results.success_rate()),
        "processing statistics"
    );
}
