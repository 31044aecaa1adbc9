//! CRUD scenarios against a CSV-backed repository.

use ntest::timeout;
use std::collections::BTreeSet;
use std::fs;
use tempfile::tempdir;

use ammonia_core::{FilterCriteria, RepoError, ValidationError};

use super::helpers::{data_lines, full_record, open_repo};

#[timeout(2000)]
#[test]
fn test_add_to_empty_dataset_writes_one_row() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("ammonia_assets.csv");
    let repo = open_repo(&path);

    assert!(repo.is_empty().unwrap());
    let record_ref = repo.add(full_record("India")).unwrap();
    assert_eq!(record_ref.position, 0);
    assert_eq!(repo.len().unwrap(), 1);

    let lines = data_lines(&path);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(",India,"));

    // reopening reads the same row back
    let reopened = open_repo(&path);
    let row = reopened.get(0).unwrap();
    assert_eq!(row.record.display_value("country_name"), "India");
    assert_eq!(row.record.display_value("id_country"), "356");
}

#[timeout(2000)]
#[test]
fn test_invalid_add_leaves_file_untouched() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("ammonia_assets.csv");
    let repo = open_repo(&path);
    repo.add(full_record("India")).unwrap();
    let before = fs::read(&path).unwrap();

    let mut bad = full_record("Chile");
    bad.set_raw("value", "-1");
    let err = repo.add(bad).unwrap_err();

    assert_eq!(err, RepoError::Validation(vec![ValidationError::NonPositiveValue]));
    assert_eq!(repo.len().unwrap(), 1);
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[timeout(2000)]
#[test]
fn test_invalid_add_on_missing_file_creates_nothing() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("ammonia_assets.csv");
    let repo = open_repo(&path);

    let mut bad = full_record("India");
    bad.set_raw("forecast_month_year", "Jan-23");
    bad.set_raw("country_name", "");
    let err = repo.add(bad).unwrap_err();

    let messages: Vec<String> = err
        .validation_errors()
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        messages,
        [
            "Country name must not be empty.",
            "Forecast month-year must be in format Mon-YYYY (e.g., Jan-2023).",
        ]
    );
    assert!(!path.exists());
}

#[timeout(2000)]
#[test]
fn test_repeated_delete_removes_distinct_records() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("ammonia_assets.csv");
    let repo = open_repo(&path);
    for country in ["India", "Chile", "Peru", "Oman"] {
        repo.add(full_record(country)).unwrap();
    }

    let first = repo.delete(1).unwrap();
    let second = repo.delete(1).unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(first.record.display_value("country_name"), "Chile");
    assert_eq!(second.record.display_value("country_name"), "Peru");

    let remaining: Vec<String> = repo
        .list()
        .unwrap()
        .records()
        .map(|r| r.display_value("country_name"))
        .collect();
    assert_eq!(remaining, ["India", "Oman"]);
    assert_eq!(data_lines(&path).len(), 2);
}

#[timeout(2000)]
#[test]
fn test_delete_out_of_range() {
    let temp_dir = tempdir().unwrap();
    let repo = open_repo(&temp_dir.path().join("ammonia_assets.csv"));
    repo.add(full_record("India")).unwrap();

    assert_eq!(
        repo.delete(1).unwrap_err(),
        RepoError::NotFound { position: 1, len: 1 }
    );
}

#[timeout(2000)]
#[test]
fn test_update_replaces_row_wholesale() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("ammonia_assets.csv");
    let repo = open_repo(&path);
    repo.add(full_record("India")).unwrap();

    let mut replacement = ammonia_core::Record::from_raw([
        ("value", "9.5"),
        ("start_date", "2024-01-01"),
        ("end_date", "2024-06-30"),
        ("country_name", "Qatar"),
        ("forecast_month_year", "Jun-2024"),
    ]);
    replacement.set_raw("unit", "Mt");
    repo.update(0, replacement).unwrap();

    let reopened = open_repo(&path);
    let row = reopened.get(0).unwrap();
    assert_eq!(row.record.display_value("country_name"), "Qatar");
    assert_eq!(row.record.display_value("value"), "9.5");
    // columns not supplied are cleared, not merged
    assert_eq!(row.record.display_value("market"), "");
}

#[timeout(2000)]
#[test]
fn test_search_and_filter() {
    let temp_dir = tempdir().unwrap();
    let repo = open_repo(&temp_dir.path().join("ammonia_assets.csv"));
    repo.add(full_record("India")).unwrap();
    repo.add(full_record("Indonesia")).unwrap();
    let mut annual = full_record("Norway");
    annual.set_raw("frequency", "Annual");
    repo.add(annual).unwrap();

    let hits = repo.search("country_name", "indo", true).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].position, 1);
    assert!(repo.search("country_name", "indo", false).unwrap().is_empty());
    assert!(repo.search("not_a_field", "x", true).unwrap().is_empty());

    let mut criteria = FilterCriteria::new();
    criteria.insert("frequency".to_string(), BTreeSet::from(["Monthly".to_string()]));
    let view = repo.filter(&criteria).unwrap();
    assert_eq!(view.len(), 2);

    assert_eq!(
        repo.distinct_values("frequency").unwrap(),
        ["Annual", "Monthly"]
    );
}
