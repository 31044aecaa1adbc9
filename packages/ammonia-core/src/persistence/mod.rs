//! Durable storage of the full dataset.
//!
//! The dataset is always read and written whole. Saves go through a
//! temporary file and a rename, so a failed save leaves the previous file
//! in place.


mod csv_store;
pub mod io_utils;

pub use csv_store::CsvStore;

use crate::dataset::Dataset;
use crate::error::StorageError;

/// Whole-dataset load/save backend.
pub trait Storage: Send + Sync {
    /// Reads the full dataset. A missing file is an empty dataset.
    fn load(&self) -> Result<Dataset, StorageError>;

    /// Replaces the stored dataset all-or-nothing.
    fn save(&self, dataset: &Dataset) -> Result<(), StorageError>;
}
