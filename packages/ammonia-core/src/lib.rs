//! Validated record management for the ammonia market and forecast dataset.
//!
//! Provides the fixed column schema, write-time validation rules, whole-file
//! CSV persistence with atomic replace, and a repository that only persists
//! records which pass validation.

pub mod config;
pub mod dataset;
pub mod error;
pub mod persistence;
pub mod record;
pub mod repository;
pub mod schema;
pub mod validation;

pub use config::StoreConfig;
pub use dataset::{Dataset, FilterCriteria, RecordRef, Row};
pub use error::{RepoError, StorageError};
pub use persistence::{CsvStore, Storage};
pub use record::{Record, RecordId, Value};
pub use repository::Repository;
pub use validation::{ValidationError, Validator};
