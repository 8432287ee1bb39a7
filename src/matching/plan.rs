use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::error::NormalizationError;
use crate::matching::normalize::normalize;
use crate::matching::title::{ParsedTitle, find_matches};
use crate::model::{DrawingEntry, DrawingType, Match, ReferenceOutcome, UnitReference};

/// Matches found for one valid reference.
#[derive(Debug, Clone)]
pub struct ReferencePlan<'a> {
    /// Reference text as it appeared in the schedule.
    pub raw: String,
    pub reference: UnitReference,
    pub matches: Vec<Match<'a>>,
}

impl ReferencePlan<'_> {
    pub fn outcome(&self) -> ReferenceOutcome {
        ReferenceOutcome::from_count(self.matches.len())
    }
}

/// A schedule row that could not be normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidReference {
    pub raw: String,
    pub error: NormalizationError,
}

/// A register row whose title carries a recognised drawing type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognisedDrawing<'a> {
    pub index: usize,
    pub entry: &'a DrawingEntry,
    pub drawing_type: DrawingType,
}

/// Result of matching every reference against the whole register.
#[derive(Debug, Clone)]
pub struct MatchPlan<'a> {
    pub references: Vec<ReferencePlan<'a>>,
    pub invalid: Vec<InvalidReference>,
    drawings: &'a [DrawingEntry],
    used: Vec<bool>,
}

impl<'a> MatchPlan<'a> {
    /// Normalises each raw reference and collects its matches. Rows that
    /// fail to normalise are recorded in [`MatchPlan::invalid`].
    pub fn build(raw_references: &[String], drawings: &'a [DrawingEntry]) -> Self {
        let mut references = Vec::new();
        let mut invalid = Vec::new();
        let mut used = vec![false; drawings.len()];

        for raw in raw_references {
            let reference = match normalize(raw) {
                Ok(reference) => reference,
                Err(error) => {
                    warn!(reference = %raw, %error, "skipping invalid reference");
                    invalid.push(InvalidReference {
                        raw: raw.clone(),
                        error,
                    });
                    continue;
                }
            };

            let matches = find_matches(&reference, drawings);
            if matches.is_empty() {
                warn!(reference = %raw, "no matching drawings found");
            }
            for matched in &matches {
                used[matched.entry_index] = true;
                info!(
                    reference = %raw,
                    title = %matched.entry.title,
                    filename = %matched.entry.filename,
                    rule = matched.rule.label(),
                    "match found"
                );
            }

            references.push(ReferencePlan {
                raw: raw.clone(),
                reference,
                matches,
            });
        }

        debug!(
            references = references.len(),
            invalid = invalid.len(),
            "match plan built"
        );

        Self {
            references,
            invalid,
            drawings,
            used,
        }
    }

    pub fn drawings(&self) -> &'a [DrawingEntry] {
        self.drawings
    }

    /// Total number of matches across all references.
    pub fn match_count(&self) -> usize {
        self.references
            .iter()
            .map(|reference| reference.matches.len())
            .sum()
    }

    /// Whether the drawing at `index` took part in at least one match.
    pub fn is_used(&self, index: usize) -> bool {
        self.used.get(index).copied().unwrap_or(false)
    }

    /// Register rows whose titles name a known drawing type.
    pub fn recognised_drawings(&self) -> Vec<RecognisedDrawing<'a>> {
        let drawings: &'a [DrawingEntry] = self.drawings;
        drawings
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                ParsedTitle::parse(&entry.title).map(|parsed| RecognisedDrawing {
                    index,
                    entry,
                    drawing_type: parsed.drawing_type,
                })
            })
            .collect()
    }

    /// Recognised drawings that no reference matched.
    pub fn unused_drawings(&self) -> Vec<RecognisedDrawing<'a>> {
        self.recognised_drawings()
            .into_iter()
            .filter(|drawing| !self.is_used(drawing.index))
            .collect()
    }

    /// File names listed more than once in the register, with their counts.
    pub fn duplicate_filenames(&self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for entry in self.drawings {
            *counts.entry(entry.filename.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(filename, count)| (filename.to_string(), count))
            .collect()
    }
}
