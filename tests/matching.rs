use std::collections::HashSet;

use asbuilt_tools::NormalizationError;
use asbuilt_tools::matching::{
    MatchPlan, extract_group_label, find_matches, generate_filename, normalize, output_location,
};
use asbuilt_tools::model::{DrawingEntry, DrawingType, Kind, MatchRule, ReferenceOutcome};

fn register() -> Vec<DrawingEntry> {
    vec![
        DrawingEntry::new("A100", "Sections - HT A 3B4P"),
        DrawingEntry::new("A101", "Sections - HT A 4B7P"),
        DrawingEntry::new("A102", "Floor Plans - HT A"),
        DrawingEntry::new("B200", "Floor Plans - HT B 2B3P & HT D 3B4P"),
        DrawingEntry::new("C0033_50.250", "Sections - Flat Types A & B"),
        DrawingEntry::new("C0040", "Floor Plan - FT A 1B2P & FT C 2B4P"),
        DrawingEntry::new("X900", "Site Plan - HT A 3B4P"),
        DrawingEntry::new("X901", "Elevations - Flat Type A"),
    ]
}

#[test]
fn normalize_canonicalises_case_and_whitespace() {
    let reference = normalize("  ht   a 3b4p ").expect("reference normalised");
    assert_eq!(reference.kind, Kind::House);
    assert_eq!(reference.letter, "A");
    assert_eq!(reference.bed_person_suffix.as_deref(), Some("3B4P"));
    assert_eq!(reference, normalize("HT A 3B4P").expect("reference normalised"));
    assert_eq!(reference.to_string(), "HT A 3B4P");
}

#[test]
fn normalize_accepts_compound_letters_without_suffix() {
    let reference = normalize("FT c3h5").expect("reference normalised");
    assert_eq!(reference.kind, Kind::Flat);
    assert_eq!(reference.letter, "C3H5");
    assert_eq!(reference.bed_person_suffix, None);
}

#[test]
fn normalize_reports_each_failure() {
    assert_eq!(normalize("   "), Err(NormalizationError::Empty));
    assert_eq!(
        normalize("Block A 3B4P"),
        Err(NormalizationError::UnknownKind("Block".to_string()))
    );
    assert_eq!(normalize("HT"), Err(NormalizationError::MissingLetter));
    assert_eq!(
        normalize("HT A corner"),
        Err(NormalizationError::MalformedSuffix("corner".to_string()))
    );
}

#[test]
fn exact_match_requires_same_suffix() {
    let drawings = register();
    let reference = normalize("HT A 3B4P").expect("reference normalised");
    let matches = find_matches(&reference, &drawings);

    let filenames: Vec<&str> = matches.iter().map(|m| m.entry.filename.as_str()).collect();
    assert_eq!(filenames, vec!["A100", "A102"]);
    assert_eq!(matches[0].rule, MatchRule::Exact);
    assert_eq!(matches[0].drawing_type, DrawingType::Sections);
    assert_eq!(matches[0].group_label, "HT A 3B4P");
}

#[test]
fn base_title_covers_every_suffix_of_the_letter() {
    let drawings = register();
    let reference = normalize("HT A 3B4P").expect("reference normalised");
    let matches = find_matches(&reference, &drawings);

    let base = matches
        .iter()
        .find(|m| m.entry.filename == "A102")
        .expect("base title matched");
    assert_eq!(base.rule, MatchRule::Base);
    assert_eq!(base.drawing_type, DrawingType::FloorPlans);
    assert_eq!(base.group_label, "HT A");
}

#[test]
fn flat_word_form_matches_and_collapses_label() {
    let drawings = register();
    let reference = normalize("FT A 1B2P").expect("reference normalised");
    let matches = find_matches(&reference, &drawings);

    let word_form = matches
        .iter()
        .find(|m| m.entry.filename == "C0033_50.250")
        .expect("word form title matched");
    assert_eq!(word_form.rule, MatchRule::FlatWordForm);
    assert_eq!(word_form.group_label, "FT A&B");

    let location = output_location(word_form, "pdf");
    assert_eq!(location.folder_name, "FT A&B");
    assert_eq!(location.new_filename, "sections_FTA&B_C0033_50.250.pdf");
}

#[test]
fn singular_flat_word_form_names_one_flat() {
    let drawings = vec![DrawingEntry::new("W7", "Sections - Flat Type A")];
    let reference = normalize("FT A 1B2P").expect("reference normalised");
    let matches = find_matches(&reference, &drawings);

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].rule, MatchRule::FlatWordForm);
    assert_eq!(matches[0].group_label, "FT A");
    assert_eq!(
        output_location(&matches[0], "pdf").new_filename,
        "sections_FTA_W7.pdf"
    );
}

#[test]
fn word_form_after_a_coded_flat_still_matches() {
    let drawings = vec![DrawingEntry::new("W1", "Sections - FT A 1B2P & Flat Type C")];
    let reference = normalize("FT C 2B4P").expect("reference normalised");
    let matches = find_matches(&reference, &drawings);

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].rule, MatchRule::FlatWordForm);
    assert_eq!(matches[0].group_label, "FT A&C");
}

#[test]
fn flat_label_leaves_out_house_types_in_mixed_titles() {
    let drawings = vec![DrawingEntry::new("M1", "Floor Plans - HT A 3B4P & FT B 1B2P")];
    let reference = normalize("FT B 1B2P").expect("reference normalised");
    let matches = find_matches(&reference, &drawings);

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].group_label, "FT B");
    assert_eq!(
        output_location(&matches[0], "pdf").new_filename,
        "floorplans_FTB_M1.pdf"
    );
}

#[test]
fn slash_in_label_stays_inside_the_group_folder() {
    let drawings = vec![DrawingEntry::new("S1", "Sections - HT A/B 3B4P")];
    let reference = normalize("HT A/B 3B4P").expect("reference normalised");
    let matches = find_matches(&reference, &drawings);
    assert_eq!(matches.len(), 1);

    let location = output_location(&matches[0], "pdf");
    assert_eq!(location.folder_name, "HT A_B 3B4P");
    assert_eq!(location.new_filename, "sections_HTA_B3B4P_S1.pdf");
}

#[test]
fn combined_flat_codes_drop_suffixes_in_label() {
    let drawings = register();
    let reference = normalize("FT C 2B4P").expect("reference normalised");
    let matches = find_matches(&reference, &drawings);

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].rule, MatchRule::Exact);
    assert_eq!(matches[0].group_label, "FT A&C");
    assert_eq!(matches[0].drawing_type, DrawingType::FloorPlans);
}

#[test]
fn combined_house_types_keep_full_label() {
    let drawings = register();
    for raw in ["HT B 2B3P", "HT D 3B4P"] {
        let reference = normalize(raw).expect("reference normalised");
        let matches = find_matches(&reference, &drawings);
        assert_eq!(matches.len(), 1, "{raw} should match the combined title");
        assert_eq!(matches[0].group_label, "HT B 2B3P & HT D 3B4P");
        assert_eq!(
            output_location(&matches[0], "pdf").new_filename,
            "floorplans_HTB2B3P&HTD3B4P_B200.pdf"
        );
    }
}

#[test]
fn house_reference_ignores_flat_word_forms() {
    let drawings = vec![DrawingEntry::new("F1", "Sections - Flat Types A & B")];
    let reference = normalize("HT A 3B4P").expect("reference normalised");
    assert!(find_matches(&reference, &drawings).is_empty());
}

#[test]
fn unknown_reference_is_unmatched_not_an_error() {
    let drawings = register();
    let raw = vec!["HT Z 9B9P".to_string()];
    let plan = MatchPlan::build(&raw, &drawings);

    assert_eq!(plan.references.len(), 1);
    assert_eq!(plan.references[0].outcome(), ReferenceOutcome::Unmatched);
    assert!(plan.invalid.is_empty());
}

#[test]
fn plan_tracks_invalid_references_and_unused_drawings() {
    let mut drawings = register();
    drawings.push(DrawingEntry::new("A100", "Sections - HT Q"));
    let raw = vec![
        "HT A 3B4P".to_string(),
        "Unit 7".to_string(),
        "FT A 1B2P".to_string(),
    ];
    let plan = MatchPlan::build(&raw, &drawings);

    assert_eq!(plan.references.len(), 2);
    assert_eq!(plan.references[0].outcome(), ReferenceOutcome::Matched(2));
    assert_eq!(plan.invalid.len(), 1);
    assert_eq!(plan.invalid[0].raw, "Unit 7");
    assert_eq!(plan.match_count(), 4);

    let unused: Vec<&str> = plan
        .unused_drawings()
        .iter()
        .map(|drawing| drawing.entry.filename.as_str())
        .collect();
    assert_eq!(unused, vec!["A101", "B200", "A100"]);
    assert_eq!(plan.recognised_drawings().len(), 7);
    assert_eq!(plan.duplicate_filenames(), vec![("A100".to_string(), 2)]);
}

#[test]
fn labels_and_filenames_are_deterministic() {
    let label = extract_group_label("FT B 1B2P & FT A 2B3P & FT B 2B4P", Kind::Flat);
    assert_eq!(label, "FT B&A");
    assert_eq!(
        label,
        extract_group_label("FT B 1B2P & FT A 2B3P & FT B 2B4P", Kind::Flat)
    );

    let first = generate_filename(DrawingType::Sections, &label, "Dwg-01", ".PDF");
    let second = generate_filename(DrawingType::Sections, &label, "Dwg-01", ".PDF");
    assert_eq!(first, "sections_FTB&A_Dwg-01.pdf");
    assert_eq!(first, second);
}

#[test]
fn filename_preserves_base_name_casing() {
    let name = generate_filename(DrawingType::FloorPlans, "HT A 3B4P", "Ab-c.D_1", "pdf");
    assert_eq!(name, "floorplans_HTA3B4P_Ab-c.D_1.pdf");
}

#[test]
fn distinct_source_files_never_share_a_destination() {
    let drawings = vec![
        DrawingEntry::new("S1", "Sections - HT A"),
        DrawingEntry::new("S2", "Sections - HT A"),
        DrawingEntry::new("S3", "Sections - HT A 3B4P"),
        DrawingEntry::new("S4", "Floor Plans - HT A 3B4P & HT B 2B3P"),
    ];
    let reference = normalize("HT A 3B4P").expect("reference normalised");
    let matches = find_matches(&reference, &drawings);
    assert_eq!(matches.len(), 4);

    let destinations: HashSet<_> = matches
        .iter()
        .map(|m| output_location(m, "pdf"))
        .collect();
    assert_eq!(destinations.len(), matches.len());
}
