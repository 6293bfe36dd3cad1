//! Text normalization shared by descriptions and upload metadata.

/// Fallback used when the object type is missing.
pub const DEFAULT_OBJECT_TYPE: &str = "object";

/// Lower-case an object type and turn `"; "` separators into `/`.
///
/// `"Painting; Sculpture"` → `"painting/sculpture"`; `None` → `"object"`.
pub fn normalize_object_type(object_type: Option<&str>) -> String {
    match object_type {
        Some(s) => s.to_lowercase().replace("; ", "/"),
        None => DEFAULT_OBJECT_TYPE.to_string(),
    }
}

/// Collapse line breaks so a value fits on one statement line.
pub fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|part| !part.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn has_line_break(text: &str) -> bool {
    text.contains(['\r', '\n'])
}
