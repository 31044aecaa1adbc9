//! Record repository: validated add/update/delete over a whole-file store.
//!
//! The cached dataset sits behind one mutex. Every operation runs inside
//! it, so load, validate, mutate, and save form a single critical section
//! and concurrent sessions cannot lose each other's updates.

use std::sync::{Mutex, MutexGuard};

use crate::config::StoreConfig;
use crate::dataset::{Dataset, FilterCriteria, RecordRef, Row};
use crate::error::RepoError;
use crate::persistence::{CsvStore, Storage};
use crate::record::{Record, RecordId};
use crate::validation::{ValidationError, Validator};

/// CRUD orchestrator over a [`Storage`] backend.
#[derive(Debug)]
pub struct Repository<S: Storage = CsvStore> {
    store: S,
    validator: Validator,
    /// Loaded on first access
    state: Mutex<Option<Dataset>>,
}

impl Repository<CsvStore> {
    /// Opens a session over the configured CSV file. Nothing is read until
    /// the first operation.
    pub fn open(config: &StoreConfig) -> Self {
        Self::with_store(CsvStore::from_config(config), Validator::from_config(config))
    }
}

impl<S: Storage> Repository<S> {
    pub fn with_store(store: S, validator: Validator) -> Self {
        Self {
            store,
            validator,
            state: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Runs the validator without touching the dataset.
    pub fn validate(&self, candidate: &Record) -> Vec<ValidationError> {
        self.validator.validate(candidate)
    }

    /// Appends `candidate` as the new last record if it is valid.
    pub fn add(&self, candidate: Record) -> Result<RecordRef, RepoError> {
        self.check(&candidate)?;
        let record_ref = self.mutate(|dataset| Ok(dataset.push(candidate)))?;
        tracing::info!(
            "Added record {} at position {}",
            record_ref.id,
            record_ref.position
        );
        Ok(record_ref)
    }

    /// Replaces the record at `position` wholesale if `candidate` is valid.
    pub fn update(&self, position: usize, candidate: Record) -> Result<(), RepoError> {
        let id = self.mutate(|dataset| {
            let len = dataset.len();
            if position >= len {
                return Err(RepoError::NotFound { position, len });
            }
            self.check(&candidate)?;
            dataset
                .replace(position, candidate)
                .ok_or(RepoError::NotFound { position, len })
        })?;
        tracing::info!("Updated record {} at position {}", id, position);
        Ok(())
    }

    /// Replaces the record with the given id wholesale if `candidate` is valid.
    pub fn update_by_id(&self, id: RecordId, candidate: Record) -> Result<(), RepoError> {
        self.mutate(|dataset| {
            let position = dataset
                .position_of(id)
                .ok_or(RepoError::UnknownRecord(id))?;
            self.check(&candidate)?;
            dataset
                .replace(position, candidate)
                .ok_or(RepoError::UnknownRecord(id))
        })?;
        tracing::info!("Updated record {}", id);
        Ok(())
    }

    /// Removes the record at `position`; later records shift down by one.
    pub fn delete(&self, position: usize) -> Result<Row, RepoError> {
        let row = self.mutate(|dataset| {
            let len = dataset.len();
            dataset
                .remove(position)
                .ok_or(RepoError::NotFound { position, len })
        })?;
        tracing::info!("Deleted record {} from position {}", row.id, position);
        Ok(row)
    }

    pub fn delete_by_id(&self, id: RecordId) -> Result<Row, RepoError> {
        let row = self.mutate(|dataset| {
            let position = dataset
                .position_of(id)
                .ok_or(RepoError::UnknownRecord(id))?;
            dataset
                .remove(position)
                .ok_or(RepoError::UnknownRecord(id))
        })?;
        tracing::info!("Deleted record {}", row.id);
        Ok(row)
    }

    /// Records whose stringified `field` contains `needle`.
    pub fn search(
        &self,
        field: &str,
        needle: &str,
        case_insensitive: bool,
    ) -> Result<Vec<RecordRef>, RepoError> {
        self.read(|dataset| dataset.search(field, needle, case_insensitive))
    }

    /// View of the records matching every listed column's allowed set.
    pub fn filter(&self, criteria: &FilterCriteria) -> Result<Dataset, RepoError> {
        self.read(|dataset| dataset.filter(criteria))
    }

    pub fn get(&self, position: usize) -> Result<Row, RepoError> {
        self.read(|dataset| {
            dataset.get(position).cloned().ok_or(RepoError::NotFound {
                position,
                len: dataset.len(),
            })
        })?
    }

    pub fn find(&self, id: RecordId) -> Result<Row, RepoError> {
        self.read(|dataset| dataset.find(id).cloned().ok_or(RepoError::UnknownRecord(id)))?
    }

    /// Snapshot of the full dataset.
    pub fn list(&self) -> Result<Dataset, RepoError> {
        self.read(Dataset::clone)
    }

    pub fn len(&self) -> Result<usize, RepoError> {
        self.read(Dataset::len)
    }

    pub fn is_empty(&self) -> Result<bool, RepoError> {
        self.read(Dataset::is_empty)
    }

    /// Distinct non-blank values of a column, for filter options.
    pub fn distinct_values(&self, field: &str) -> Result<Vec<String>, RepoError> {
        self.read(|dataset| dataset.distinct_values(field))
    }

    /// Drops the cached dataset and reads the file again. Ids are reassigned.
    pub fn reload(&self) -> Result<usize, RepoError> {
        let mut guard = self.lock()?;
        let dataset = self.store.load()?;
        let len = dataset.len();
        *guard = Some(dataset);
        Ok(len)
    }

    fn check(&self, candidate: &Record) -> Result<(), RepoError> {
        let errors = self.validator.validate(candidate);
        if errors.is_empty() {
            Ok(())
        } else {
            tracing::warn!("Rejected candidate record with {} errors", errors.len());
            Err(RepoError::Validation(errors))
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Dataset>>, RepoError> {
        self.state.lock().map_err(|_| RepoError::LockPoisoned)
    }

    fn loaded<'a>(&self, slot: &'a mut Option<Dataset>) -> Result<&'a mut Dataset, RepoError> {
        let dataset = match slot.take() {
            Some(dataset) => dataset,
            None => self.store.load()?,
        };
        Ok(slot.insert(dataset))
    }

    fn read<R>(&self, f: impl FnOnce(&Dataset) -> R) -> Result<R, RepoError> {
        let mut guard = self.lock()?;
        let dataset = self.loaded(&mut guard)?;
        Ok(f(dataset))
    }

    /// Applies `f` to a copy, saves the copy, then installs it. On any error
    /// the cached dataset and the file are left as they were.
    fn mutate<R>(
        &self,
        f: impl FnOnce(&mut Dataset) -> Result<R, RepoError>,
    ) -> Result<R, RepoError> {
        let mut guard = self.lock()?;
        let current = self.loaded(&mut guard)?;
        let mut next = current.clone();
        let out = f(&mut next)?;
        self.store.save(&next)?;
        *current = next;
        Ok(out)
    }
}
