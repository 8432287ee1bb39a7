use crate::model::{DrawingType, Match, OutputLocation};

const PATH_HOSTILE_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Builds `<tag>_<label without spaces>_<base name><extension>`.
///
/// The base name is kept verbatim; the extension is lower-cased and gains a
/// leading dot when it lacks one.
pub fn generate_filename(
    drawing_type: DrawingType,
    group_label: &str,
    original_base_name: &str,
    original_extension: &str,
) -> String {
    let clean_label: String = group_label
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(path_safe)
        .collect();
    let extension = normalize_extension(original_extension);
    format!(
        "{}_{clean_label}_{original_base_name}{extension}",
        drawing_type.tag()
    )
}

/// Splits `C0033_50.250.pdf` into `("C0033_50.250", ".pdf")`. Names without
/// an extension, or dot-files, return an empty extension.
pub fn split_file_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(index) if index > 0 => name.split_at(index),
        _ => (name, ""),
    }
}

/// Appends `.<extension>` to a register file name unless it already ends
/// with it (ignoring case).
pub fn source_file_name(filename: &str, extension: &str) -> String {
    let extension = normalize_extension(extension);
    if extension.is_empty() || filename.to_lowercase().ends_with(&extension) {
        filename.to_string()
    } else {
        format!("{filename}{extension}")
    }
}

/// Folder name for a group label. Path-hostile characters become `_`.
pub fn folder_name(group_label: &str) -> String {
    group_label
        .chars()
        .map(path_safe)
        .collect::<String>()
        .trim()
        .to_string()
}

fn path_safe(ch: char) -> char {
    if PATH_HOSTILE_CHARS.contains(&ch) || ch.is_control() {
        '_'
    } else {
        ch
    }
}

/// Resolves where a matched drawing is copied to, relative to the processed
/// directory.
pub fn output_location(matched: &Match<'_>, source_extension: &str) -> OutputLocation {
    let file_name = source_file_name(&matched.entry.filename, source_extension);
    let (base_name, extension) = split_file_name(&file_name);
    OutputLocation {
        folder_name: folder_name(&matched.group_label),
        new_filename: generate_filename(
            matched.drawing_type,
            &matched.group_label,
            base_name,
            extension,
        ),
    }
}

fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim();
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('.') {
        trimmed.to_lowercase()
    } else {
        format!(".{}", trimmed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_file_name_keeps_inner_dots_in_base() {
        assert_eq!(split_file_name("C0033_50.250.pdf"), ("C0033_50.250", ".pdf"));
        assert_eq!(split_file_name("README"), ("README", ""));
        assert_eq!(split_file_name(".hidden"), (".hidden", ""));
    }

    #[test]
    fn source_file_name_appends_missing_extension() {
        assert_eq!(source_file_name("C0033_50.250", "pdf"), "C0033_50.250.pdf");
        assert_eq!(source_file_name("A100.PDF", "pdf"), "A100.PDF");
        assert_eq!(source_file_name("A100", ""), "A100");
    }

    #[test]
    fn folder_name_replaces_separators() {
        assert_eq!(folder_name("HT B 2B3P & HT D 3B4P"), "HT B 2B3P & HT D 3B4P");
        assert_eq!(folder_name("HT A/B"), "HT A_B");
    }

    #[test]
    fn generated_name_never_contains_a_path_separator() {
        let name = generate_filename(DrawingType::Sections, "HT A/B 3B4P", "S1", "pdf");
        assert_eq!(name, "sections_HTA_B3B4P_S1.pdf");
    }
}
