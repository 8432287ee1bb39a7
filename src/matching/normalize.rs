use lazy_static::lazy_static;
use regex::Regex;

use crate::error::NormalizationError;
use crate::model::{Kind, UnitReference};

lazy_static! {
    /// `<beds>B<persons>P`, e.g. `3B4P` or `10b12p`.
    static ref BED_PERSON_SUFFIX: Regex =
        Regex::new(r"(?i)^\d+B\d+P$").expect("valid bed/person pattern");
}

/// Canonicalises a raw reference such as `" ht  a 3b4p "` into
/// `HT A 3B4P`.
///
/// The first token selects the [`Kind`], the second is the type letter and
/// any remaining tokens form the bed/person suffix.
pub fn normalize(raw: &str) -> Result<UnitReference, NormalizationError> {
    let mut tokens = raw.split_whitespace();

    let kind_token = tokens.next().ok_or(NormalizationError::Empty)?;
    let kind = Kind::from_code(kind_token)
        .ok_or_else(|| NormalizationError::UnknownKind(kind_token.to_string()))?;

    let letter = tokens
        .next()
        .ok_or(NormalizationError::MissingLetter)?
        .to_uppercase();

    let remainder: String = tokens.collect();
    let bed_person_suffix = if remainder.is_empty() {
        None
    } else if is_bed_person_suffix(&remainder) {
        Some(remainder.to_uppercase())
    } else {
        return Err(NormalizationError::MalformedSuffix(remainder));
    };

    Ok(UnitReference {
        kind,
        letter,
        bed_person_suffix,
    })
}

/// Returns true for `<digits>B<digits>P`, ignoring case.
pub fn is_bed_person_suffix(text: &str) -> bool {
    BED_PERSON_SUFFIX.is_match(text)
}

/// Trims and collapses internal whitespace runs to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_pattern_accepts_multi_digit_counts() {
        assert!(is_bed_person_suffix("3B4P"));
        assert!(is_bed_person_suffix("10b12p"));
        assert!(!is_bed_person_suffix("B4P"));
        assert!(!is_bed_person_suffix("3B4"));
        assert!(!is_bed_person_suffix("3X4P"));
        assert!(!is_bed_person_suffix(""));
    }

    #[test]
    fn collapse_whitespace_trims_and_squeezes() {
        assert_eq!(collapse_whitespace("  HT \t A   3B4P "), "HT A 3B4P");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
