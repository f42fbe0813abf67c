//! Row projection onto a declared column list.
//!
//! Pure functions with no file access: the append routine reads rows, runs
//! them through here and writes the result back.

use std::collections::HashMap;

/// One record to persist: field name to cell value.
pub type AnnotationRecord = HashMap<String, String>;

/// Project a record onto `columns`.
///
/// Missing columns become empty strings; fields not listed in `columns` are
/// dropped.
#[must_use]
pub fn project_record<S: AsRef<str>>(record: &AnnotationRecord, columns: &[S]) -> Vec<String> {
    columns
        .iter()
        .map(|column| record.get(column.as_ref()).cloned().unwrap_or_default())
        .collect()
}

/// Read a positional row as a record keyed by `header`.
///
/// Short rows leave trailing columns absent, surplus cells are ignored, and a
/// repeated header name keeps the right-most cell.
#[must_use]
pub fn row_to_record<S: AsRef<str>>(header: &[S], row: &[String]) -> AnnotationRecord {
    header
        .iter()
        .zip(row)
        .map(|(name, cell)| (name.as_ref().to_string(), cell.clone()))
        .collect()
}

/// Remap rows written under `old_header` onto `columns`, keeping row order.
#[must_use]
pub fn migrate_rows<S: AsRef<str>, T: AsRef<str>>(
    old_header: &[S],
    old_rows: &[Vec<String>],
    columns: &[T],
) -> Vec<Vec<String>> {
    old_rows
        .iter()
        .map(|row| project_record(&row_to_record(old_header, row), columns))
        .collect()
}

/// Whether an on-disk header already matches the declared columns.
///
/// Order-sensitive: same names in a different order still count as a
/// mismatch.
#[must_use]
pub fn header_matches<S: AsRef<str>, T: AsRef<str>>(header: &[S], columns: &[T]) -> bool {
    header.len() == columns.len()
        && header
            .iter()
            .zip(columns)
            .all(|(left, right)| left.as_ref() == right.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_header_keeps_last_cell() {
        let record = row_to_record(&["a", "a"], &["first".to_string(), "second".to_string()]);
        assert_eq!(record.get("a").map(String::as_str), Some("second"));
    }

    #[test]
    fn test_header_matches_is_order_sensitive() {
        assert!(header_matches(&["a", "b"], &["a", "b"]));
        assert!(!header_matches(&["b", "a"], &["a", "b"]));
        assert!(!header_matches::<&str, &str>(&[], &["a"]));
    }
}
