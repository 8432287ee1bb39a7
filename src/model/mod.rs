use std::fmt;

/// Dwelling classification carried by the leading token of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `HT` references.
    House,
    /// `FT` references.
    Flat,
}

impl Kind {
    /// Short code used in references and group labels.
    pub fn code(self) -> &'static str {
        match self {
            Kind::House => "HT",
            Kind::Flat => "FT",
        }
    }

    /// Parses the leading token of a reference, ignoring case.
    pub fn from_code(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("HT") {
            Some(Kind::House)
        } else if token.eq_ignore_ascii_case("FT") {
            Some(Kind::Flat)
        } else {
            None
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A normalised unit reference such as `HT A 3B4P`.
///
/// `letter` and `bed_person_suffix` hold upper-case canonical forms, so the
/// derived equality is case-insensitive with respect to the raw input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitReference {
    pub kind: Kind,
    pub letter: String,
    pub bed_person_suffix: Option<String>,
}

impl UnitReference {
    /// True when `other` names the same kind and letter, regardless of suffix.
    pub fn same_group(&self, other: &UnitReference) -> bool {
        self.kind == other.kind && self.letter == other.letter
    }
}

impl fmt::Display for UnitReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.letter)?;
        if let Some(suffix) = &self.bed_person_suffix {
            write!(f, " {suffix}")?;
        }
        Ok(())
    }
}

/// One row of the architect register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingEntry {
    /// File name as listed in the register, usually without extension.
    pub filename: String,
    /// Free-text drawing title, e.g. `Sections - HT A 3B4P`.
    pub title: String,
}

impl DrawingEntry {
    pub fn new(filename: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            title: title.into(),
        }
    }
}

/// Drawing vocabularies recognised in titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawingType {
    Sections,
    FloorPlans,
}

impl DrawingType {
    /// Lookup order used when classifying a title.
    pub const ALL: [DrawingType; 2] = [DrawingType::Sections, DrawingType::FloorPlans];

    /// Lower-case markers that identify the type inside a title's type part.
    pub fn markers(self) -> &'static [&'static str] {
        match self {
            DrawingType::Sections => &["sections", "section"],
            DrawingType::FloorPlans => &["floor plans", "floor plan"],
        }
    }

    /// Tag prefixed to generated file names.
    pub fn tag(self) -> &'static str {
        match self {
            DrawingType::Sections => "sections",
            DrawingType::FloorPlans => "floorplans",
        }
    }

    /// Human readable label used in the report.
    pub fn label(self) -> &'static str {
        match self {
            DrawingType::Sections => "Sections",
            DrawingType::FloorPlans => "Floor Plans",
        }
    }

    /// Classifies the type part of a title.
    pub fn detect(type_part: &str) -> Option<Self> {
        let lowered = type_part.to_lowercase();
        Self::ALL.into_iter().find(|drawing_type| {
            drawing_type
                .markers()
                .iter()
                .any(|marker| lowered.contains(marker))
        })
    }
}

impl fmt::Display for DrawingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rule that associated a title with a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Same kind, letter and suffix.
    Exact,
    /// Same kind and letter; the title names the whole letter group.
    Base,
    /// `Flat Type A` / `Flat Types A & B` word forms.
    FlatWordForm,
}

impl MatchRule {
    /// Priority order in which the rules are tried.
    pub const ORDER: [MatchRule; 3] = [MatchRule::Exact, MatchRule::Base, MatchRule::FlatWordForm];

    pub fn label(self) -> &'static str {
        match self {
            MatchRule::Exact => "exact",
            MatchRule::Base => "base",
            MatchRule::FlatWordForm => "flat word form",
        }
    }
}

/// Association between one reference and one drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub reference: UnitReference,
    pub entry: &'a DrawingEntry,
    /// Position of `entry` in the drawing list the match was computed from.
    pub entry_index: usize,
    pub drawing_type: DrawingType,
    pub group_label: String,
    pub rule: MatchRule,
}

/// Destination of a copied drawing relative to the processed directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputLocation {
    pub folder_name: String,
    pub new_filename: String,
}

/// Per-reference result of matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceOutcome {
    Matched(usize),
    Unmatched,
}

impl ReferenceOutcome {
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            ReferenceOutcome::Unmatched
        } else {
            ReferenceOutcome::Matched(count)
        }
    }
}
