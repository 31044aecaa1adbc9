//! Concurrent sessions sharing one repository.

use ntest::timeout;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

use super::helpers::{data_lines, full_record, open_repo};

#[timeout(10000)]
#[test]
fn test_concurrent_adds_are_not_lost() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("ammonia_assets.csv");
    let repo = Arc::new(open_repo(&path));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                for i in 0..10 {
                    repo.add(full_record(&format!("Country {}-{}", t, i))).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(repo.len().unwrap(), 40);
    assert_eq!(data_lines(&path).len(), 40);
}

#[timeout(10000)]
#[test]
fn test_concurrent_deletes_by_id_each_remove_one_row() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("ammonia_assets.csv");
    let repo = Arc::new(open_repo(&path));
    let ids: Vec<_> = (0..20)
        .map(|i| repo.add(full_record(&format!("Country {}", i))).unwrap().id)
        .collect();

    let handles: Vec<_> = ids
        .chunks(5)
        .map(|chunk| {
            let repo = Arc::clone(&repo);
            let chunk = chunk.to_vec();
            thread::spawn(move || {
                for id in chunk {
                    repo.delete_by_id(id).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(repo.is_empty().unwrap());
    assert!(data_lines(&path).is_empty());
}
