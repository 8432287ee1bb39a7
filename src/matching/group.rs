use crate::matching::normalize::collapse_whitespace;
use crate::matching::title::{Candidate, classify_candidates};
use crate::model::Kind;

/// Derives the folder/group label for the reference part of a title.
///
/// * a single reference becomes its normalised form, e.g. `HT A 3B4P`;
/// * combined house types keep every suffix: `HT B 2B3P & HT D 3B4P`;
/// * combined flat types collapse to letters only: `FT A&B`, including
///   letters named by a `Flat Type(s)` word form.
///
/// Sub-references that do not normalise are carried as collapsed text.
pub fn extract_group_label(ref_part: &str, kind: Kind) -> String {
    let candidates = classify_candidates(ref_part);
    match candidates.as_slice() {
        [] => collapse_whitespace(ref_part),
        [single] => candidate_label(single),
        many => match kind {
            Kind::House => many
                .iter()
                .map(candidate_label)
                .collect::<Vec<_>>()
                .join(" & "),
            // Suffixes are dropped here even when they differ per letter.
            Kind::Flat => {
                let letters: Vec<String> = many.iter().filter_map(flat_letter).collect();
                if letters.is_empty() {
                    collapse_whitespace(ref_part)
                } else {
                    flat_label(letters)
                }
            }
        },
    }
}

fn candidate_label(candidate: &Candidate<'_>) -> String {
    match candidate {
        Candidate::Reference(reference) => reference.to_string(),
        Candidate::FlatWord(letter) => format!("{} {letter}", Kind::Flat.code()),
        Candidate::BareLetter(letter) => letter.clone(),
        Candidate::Text(text) => collapse_whitespace(text),
    }
}

/// Letters that belong in a flat label; house types named alongside are left out.
fn flat_letter(candidate: &Candidate<'_>) -> Option<String> {
    match candidate {
        Candidate::Reference(reference) if reference.kind == Kind::Flat => {
            Some(reference.letter.clone())
        }
        Candidate::FlatWord(letter) | Candidate::BareLetter(letter) => Some(letter.clone()),
        _ => None,
    }
}

fn flat_label(letters: Vec<String>) -> String {
    let mut unique: Vec<String> = Vec::new();
    for letter in letters {
        if !unique.contains(&letter) {
            unique.push(letter);
        }
    }
    format!("{} {}", Kind::Flat.code(), unique.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_kinds_keep_house_types_out_of_flat_labels() {
        assert_eq!(extract_group_label("HT A 3B4P & FT B 1B2P", Kind::Flat), "FT B");
        assert_eq!(
            extract_group_label("HT A 3B4P & FT B 1B2P", Kind::House),
            "HT A 3B4P & FT B 1B2P"
        );
    }

    #[test]
    fn word_form_letters_join_coded_flat_letters() {
        assert_eq!(extract_group_label("FT A 1B2P & Flat Type C", Kind::Flat), "FT A&C");
        assert_eq!(extract_group_label("Flat Type a", Kind::Flat), "FT A");
        assert_eq!(extract_group_label("FT A 1B2P & B", Kind::Flat), "FT A&B");
    }
}
