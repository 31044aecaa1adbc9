//! Comma-separated file store.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::StoreConfig;
use crate::dataset::Dataset;
use crate::error::StorageError;
use crate::record::{Record, Value};
use crate::schema::{self, FieldKind};

use super::io_utils::{classify_csv_error, classify_io_error, write_atomic};
use super::Storage;

/// Stores the whole dataset as one CSV file with a header row.
#[derive(Debug, Clone)]
pub struct CsvStore {
    /// Data file path
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.data_path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses CSV text into a dataset.
    ///
    /// Columns are matched by header name. Schema columns missing from the
    /// header load as empty; extra columns are dropped.
    pub fn parse(&self, data: &[u8]) -> Result<Dataset, StorageError> {
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Dataset::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(data);

        let headers = reader
            .headers()
            .map_err(|e| classify_csv_error(e, "Failed to read header"))?
            .clone();

        // Column index in the file for each schema field
        let mut column_of = vec![None; schema::fields().len()];
        for (idx, header) in headers.iter().enumerate() {
            let name = header.trim_matches('\u{feff}').trim();
            match schema::position(name) {
                Some(pos) if column_of[pos].is_none() => column_of[pos] = Some(idx),
                Some(_) => {
                    return Err(StorageError::Corrupt(format!(
                        "Duplicate column '{}' in {}",
                        name,
                        self.path.display()
                    )))
                }
                None => tracing::warn!(
                    "Ignoring unknown column '{}' in {}",
                    name,
                    self.path.display()
                ),
            }
        }

        let mut records = Vec::new();
        for (row_index, row) in reader.records().enumerate() {
            let row = row.map_err(|e| classify_csv_error(e, "Failed to read row"))?;
            let mut record = Record::new();
            for (field, &column) in schema::fields().iter().zip(&column_of) {
                let raw = column.and_then(|idx| row.get(idx)).unwrap_or("");
                let value = Value::parse(field.kind, raw);
                if matches!(value, Value::Text(_))
                    && matches!(
                        field.kind,
                        FieldKind::Numeric | FieldKind::Identifier | FieldKind::Date
                    )
                {
                    tracing::warn!(
                        "Row {} column '{}' does not parse as {}; keeping text",
                        row_index,
                        field.name,
                        field.kind.label()
                    );
                }
                record.set(field.name, value);
            }
            records.push(record);
        }

        Ok(Dataset::from_records(records))
    }

    /// Serializes a dataset to CSV bytes: header row, then one row per
    /// record in schema column order.
    pub fn serialize(&self, dataset: &Dataset) -> Result<Vec<u8>, StorageError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(schema::names())
            .map_err(|e| classify_csv_error(e, "Failed to write header"))?;

        for record in dataset.records() {
            writer
                .write_record(schema::names().map(|name| record.display_value(name)))
                .map_err(|e| classify_csv_error(e, "Failed to write row"))?;
        }

        writer
            .into_inner()
            .map_err(|e| StorageError::Io(format!("Failed to flush CSV buffer: {}", e)))
    }
}

impl Storage for CsvStore {
    fn load(&self) -> Result<Dataset, StorageError> {
        if !self.path.exists() {
            tracing::debug!("No data file at {}; starting empty", self.path.display());
            return Ok(Dataset::new());
        }

        let data = fs::read(&self.path)
            .map_err(|e| classify_io_error(e, "Failed to read data file"))?;
        let dataset = self.parse(&data)?;

        tracing::debug!(
            "Loaded {} records from {}",
            dataset.len(),
            self.path.display()
        );
        Ok(dataset)
    }

    fn save(&self, dataset: &Dataset) -> Result<(), StorageError> {
        let contents = self.serialize(dataset)?;
        write_atomic(&self.path, &contents)?;

        tracing::debug!(
            "Saved {} records to {}",
            dataset.len(),
            self.path.display()
        );
        Ok(())
    }
}
