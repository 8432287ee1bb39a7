use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::matching::group::extract_group_label;
use crate::matching::normalize::normalize;
use crate::model::{DrawingEntry, DrawingType, Kind, Match, MatchRule, UnitReference};

/// Separator between the drawing-type part and the reference part of a title.
pub const SEPARATOR: &str = " - ";

/// A drawing title split into the parts the matcher cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTitle<'a> {
    pub drawing_type: DrawingType,
    /// Text naming the reference(s), without any trailing sheet qualifier.
    pub ref_part: &'a str,
}

impl<'a> ParsedTitle<'a> {
    /// Parses `"<type> - <refs>[ - <qualifier>]"`. Titles without a known
    /// drawing type before the first separator yield `None`.
    pub fn parse(title: &'a str) -> Option<Self> {
        let (type_part, rest) = title.split_once(SEPARATOR)?;
        let drawing_type = DrawingType::detect(type_part)?;
        let ref_part = match rest.split_once(SEPARATOR) {
            Some((refs, _qualifier)) => refs,
            None => rest,
        }
        .trim();

        if ref_part.is_empty() {
            return None;
        }

        Some(Self {
            drawing_type,
            ref_part,
        })
    }
}

/// Returns every drawing whose title belongs to `reference`, in register
/// order. Each match carries its group label and the rule that fired.
pub fn find_matches<'a>(reference: &UnitReference, drawings: &'a [DrawingEntry]) -> Vec<Match<'a>> {
    drawings
        .iter()
        .enumerate()
        .filter_map(|(entry_index, entry)| {
            let parsed = ParsedTitle::parse(&entry.title)?;
            let rule = matching_rule(reference, parsed.ref_part)?;
            trace!(%reference, title = %entry.title, rule = rule.label(), "title matched");
            Some(Match {
                reference: reference.clone(),
                entry,
                entry_index,
                drawing_type: parsed.drawing_type,
                group_label: extract_group_label(parsed.ref_part, reference.kind),
                rule,
            })
        })
        .collect()
}

/// One `&`/`,` separated piece of a title's reference part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate<'a> {
    /// A piece that normalises, e.g. `FT A 1B2P`.
    Reference(UnitReference),
    /// A flat letter named by a `Flat Type(s)` word form, including the bare
    /// letters that continue it (`Flat Types A & B`).
    FlatWord(String),
    /// A bare letter outside any word form, e.g. the `B` in `FT A 1B2P & B`.
    BareLetter(String),
    /// Anything else, kept verbatim.
    Text(&'a str),
}

lazy_static! {
    static ref FLAT_WORD_FORM: Regex =
        Regex::new(r"(?i)^flat\s+types?\s+([a-z0-9]+)\b").expect("valid word form pattern");
    static ref BARE_LETTER: Regex = Regex::new(r"(?i)^[a-z0-9]+$").expect("valid letter pattern");
}

/// Tries each [`MatchRule`] in priority order against the reference part of
/// a title and returns the first that applies.
pub fn matching_rule(reference: &UnitReference, ref_part: &str) -> Option<MatchRule> {
    let candidates = classify_candidates(ref_part);

    MatchRule::ORDER.into_iter().find(|rule| {
        candidates.iter().any(|candidate| match (rule, candidate) {
            (MatchRule::Exact, Candidate::Reference(named)) => named == reference,
            (MatchRule::Base, Candidate::Reference(named)) => {
                named.same_group(reference) && named.bed_person_suffix.is_none()
            }
            (MatchRule::FlatWordForm, Candidate::FlatWord(letter)) => {
                reference.kind == Kind::Flat && *letter == reference.letter
            }
            _ => false,
        })
    })
}

/// Splits a combined reference part on `&` and `,`, trimming each piece.
pub fn split_candidates(ref_part: &str) -> impl Iterator<Item = &str> {
    ref_part
        .split(['&', ','])
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
}

/// Classifies every piece of a reference part in source order. A word form
/// stays open across following bare letters and closes at any other piece.
pub fn classify_candidates(ref_part: &str) -> Vec<Candidate<'_>> {
    let mut in_word_form = false;
    split_candidates(ref_part)
        .map(|piece| {
            if let Some(caps) = FLAT_WORD_FORM.captures(piece) {
                in_word_form = true;
                return Candidate::FlatWord(caps[1].to_uppercase());
            }
            if BARE_LETTER.is_match(piece) {
                let letter = piece.to_uppercase();
                return if in_word_form {
                    Candidate::FlatWord(letter)
                } else {
                    Candidate::BareLetter(letter)
                };
            }
            in_word_form = false;
            match normalize(piece) {
                Ok(reference) => Candidate::Reference(reference),
                Err(_) => Candidate::Text(piece),
            }
        })
        .collect()
}

/// Letters named through `Flat Type A` / `Flat Types A & B` word forms,
/// upper-cased and in source order.
pub fn flat_word_letters(ref_part: &str) -> Option<Vec<String>> {
    let letters: Vec<String> = classify_candidates(ref_part)
        .into_iter()
        .filter_map(|candidate| match candidate {
            Candidate::FlatWord(letter) => Some(letter),
            _ => None,
        })
        .collect();

    if letters.is_empty() {
        None
    } else {
        Some(letters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cuts_sheet_qualifier() {
        let parsed = ParsedTitle::parse("Sections - HT A 3B4P - Sheet 2").expect("parsed");
        assert_eq!(parsed.drawing_type, DrawingType::Sections);
        assert_eq!(parsed.ref_part, "HT A 3B4P");
    }

    #[test]
    fn parse_rejects_unknown_types_and_missing_separator() {
        assert!(ParsedTitle::parse("Elevations - HT A 3B4P").is_none());
        assert!(ParsedTitle::parse("Sections HT A 3B4P").is_none());
        assert!(ParsedTitle::parse("Sections - ").is_none());
    }

    #[test]
    fn flat_word_letters_reads_lists() {
        assert_eq!(
            flat_word_letters("Flat Types a & B, c"),
            Some(vec!["A".to_string(), "B".to_string(), "C".to_string()])
        );
        assert_eq!(flat_word_letters("flat type D"), Some(vec!["D".to_string()]));
        assert_eq!(flat_word_letters("FT A 1B2P"), None);
        assert_eq!(flat_word_letters("Flat Types "), None);
    }

    #[test]
    fn word_form_may_follow_a_coded_reference() {
        assert_eq!(
            flat_word_letters("FT A 1B2P & Flat Type C"),
            Some(vec!["C".to_string()])
        );
        let reference = normalize("FT C 2B4P").expect("reference normalised");
        assert_eq!(
            matching_rule(&reference, "FT A 1B2P & Flat Type C"),
            Some(MatchRule::FlatWordForm)
        );
    }

    #[test]
    fn bare_letters_continue_only_an_open_word_form() {
        let candidates = classify_candidates("Flat Types A & B & FT C 1B2P & D");
        assert_eq!(
            candidates,
            vec![
                Candidate::FlatWord("A".to_string()),
                Candidate::FlatWord("B".to_string()),
                Candidate::Reference(normalize("FT C 1B2P").expect("reference normalised")),
                Candidate::BareLetter("D".to_string()),
            ]
        );
    }
}
