/// Collapse internal whitespace runs to one space and trim; blank → `None`.
pub fn clean_cell(raw: &str) -> Option<String> {
    let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
