/// Characters not allowed in Windows filenames.
const ILLEGAL_FILENAME_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Remove characters that are not allowed on Windows file systems.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !ILLEGAL_FILENAME_CHARS.contains(c))
        .collect()
}

/// Sanitize `name` and keep it only if it can name a file. Empty results and
/// dot-only names (`.`, `..`) are rejected, since joining them onto a folder
/// points at a directory.
pub fn usable_filename(name: &str) -> Option<String> {
    let name = sanitize_filename(name);
    let name = name.trim();
    if name.is_empty() || name.chars().all(|c| c == '.') {
        None
    } else {
        Some(name.to_string())
    }
}

/// Parse a Canvas file id cell.
///
/// Spreadsheet exports sometimes write integer ids as floats (`123.0`), so an
/// integral float is accepted. Blank, zero, negative and fractional values are not ids.
pub fn parse_file_id(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<u64>() {
        return (id > 0).then_some(id);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value >= 1.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        Some(value as u64)
    } else {
        None
    }
}
