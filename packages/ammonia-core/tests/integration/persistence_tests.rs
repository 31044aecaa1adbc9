//! File-level persistence through the repository.

use ntest::timeout;
use std::fs;
use tempfile::tempdir;

use ammonia_core::persistence::io_utils::temp_path_for;
use ammonia_core::{CsvStore, RepoError, Storage, StorageError};

use super::helpers::{data_lines, full_record, open_repo};

#[timeout(2000)]
#[test]
fn test_load_then_save_is_stable() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("ammonia_assets.csv");
    let repo = open_repo(&path);
    for country in ["India", "Chile", "Peru"] {
        repo.add(full_record(country)).unwrap();
    }
    let before = fs::read_to_string(&path).unwrap();

    let store = CsvStore::new(&path);
    let dataset = store.load().unwrap();
    store.save(&dataset).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    // identifiers stay integers
    assert!(before.contains(",356,"));
    assert!(!before.contains("356.0"));
}

#[timeout(2000)]
#[test]
fn test_legacy_rows_survive_mutations() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("ammonia_assets.csv");
    fs::write(
        &path,
        "market,value,country_name,start_date,end_date,forecast_month_year\n\
         Ammonia,-2,,2023-05-01,2023-01-01,May 2023\n",
    )
    .unwrap();

    let repo = open_repo(&path);
    repo.add(full_record("India")).unwrap();

    let lines = data_lines(&path);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(",-2,"));
    assert!(lines[0].contains("May 2023"));
}

#[timeout(2000)]
#[test]
fn test_storage_failure_is_distinct_from_rejection() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("ammonia_assets.csv");
    let repo = open_repo(&path);
    repo.add(full_record("India")).unwrap();
    let before = fs::read(&path).unwrap();

    fs::create_dir(temp_path_for(&path)).unwrap();
    let err = repo.add(full_record("Chile")).unwrap_err();
    assert!(matches!(err, RepoError::Storage(StorageError::Io(_))), "{err:?}");
    assert!(err.validation_errors().is_none());

    assert_eq!(repo.len().unwrap(), 1);
    assert_eq!(fs::read(&path).unwrap(), before);

    // once the obstruction is gone the next save succeeds
    fs::remove_dir(temp_path_for(&path)).unwrap();
    repo.add(full_record("Chile")).unwrap();
    assert_eq!(data_lines(&path).len(), 2);
}

#[timeout(2000)]
#[test]
fn test_corrupt_file_surfaces_as_storage_error() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("ammonia_assets.csv");
    fs::write(&path, "market,value\nAmmonia\n").unwrap();

    let repo = open_repo(&path);
    let err = repo.add(full_record("India")).unwrap_err();
    assert!(matches!(err, RepoError::Storage(StorageError::Corrupt(_))), "{err:?}");
    assert_eq!(fs::read_to_string(&path).unwrap(), "market,value\nAmmonia\n");
}

#[timeout(2000)]
#[test]
fn test_unrelated_add_keeps_time_of_day_in_old_rows() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("ammonia_assets.csv");
    fs::write(
        &path,
        "uploaded_at_utc_date,country_name\n2023-03-01 08:30:00,Peru\n",
    )
    .unwrap();

    let repo = open_repo(&path);
    repo.add(full_record("India")).unwrap();

    let lines = data_lines(&path);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(",2023-03-01 08:30:00,"));
    assert!(lines[0].contains(",Peru,"));
}
