//! Tests for pure projection and migration of rows.

use distractor_core::{AnnotationRecord, migrate_rows, project_record};

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| (*cell).to_string()).collect()
}

#[test]
fn test_project_backfills_and_drops() {
    let record = AnnotationRecord::from([
        ("b".to_string(), "2".to_string()),
        ("secret".to_string(), "x".to_string()),
    ]);
    assert_eq!(project_record(&record, &["a", "b"]), row(&["", "2"]));
}

#[test]
fn test_migrate_adds_column_preserving_order() {
    let rows = vec![row(&["1", "2"]), row(&["3", "4"])];
    let migrated = migrate_rows(&["a", "b"], &rows, &["a", "b", "c"]);
    assert_eq!(migrated, vec![row(&["1", "2", ""]), row(&["3", "4", ""])]);
}

#[test]
fn test_migrate_drops_and_reorders_columns() {
    let rows = vec![row(&["1", "2", "3"])];
    let migrated = migrate_rows(&["a", "b", "c"], &rows, &["c", "a"]);
    assert_eq!(migrated, vec![row(&["3", "1"])]);
}

#[test]
fn test_migrate_tolerates_ragged_rows() {
    let rows = vec![row(&["1"]), row(&["1", "2", "surplus"])];
    let migrated = migrate_rows(&["a", "b"], &rows, &["b", "a"]);
    assert_eq!(migrated, vec![row(&["", "1"]), row(&["2", "1"])]);
}

#[test]
fn test_migrate_never_fabricates_values() {
    let rows = vec![row(&["1"])];
    let migrated = migrate_rows(&["a"], &rows, &["z"]);
    assert_eq!(migrated, vec![row(&[""])]);
}
