//! In-memory ordered dataset with search and filter views.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::record::{Record, RecordId};
use crate::schema;

/// Allowed values per column; columns not listed are unconstrained.
pub type FilterCriteria = BTreeMap<String, BTreeSet<String>>;

/// One stored record with its session identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub id: RecordId,
    pub record: Record,
}

/// Handle to a row: the stable id plus its position when the handle was made.
///
/// The position goes stale after a delete of a lower-positioned row; the id
/// does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordRef {
    pub id: RecordId,
    pub position: usize,
}

/// Ordered sequence of rows sharing the fixed schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps records, assigning each a fresh id.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        Self {
            rows: records
                .into_iter()
                .map(|record| Row {
                    id: RecordId::new(),
                    record,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.rows.iter().map(|row| &row.record)
    }

    pub fn get(&self, position: usize) -> Option<&Row> {
        self.rows.get(position)
    }

    pub fn position_of(&self, id: RecordId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    pub fn find(&self, id: RecordId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Appends a record as the new last row.
    pub(crate) fn push(&mut self, record: Record) -> RecordRef {
        let id = RecordId::new();
        self.rows.push(Row { id, record });
        RecordRef {
            id,
            position: self.rows.len() - 1,
        }
    }

    /// Replaces the record at `position`, keeping its id.
    pub(crate) fn replace(&mut self, position: usize, record: Record) -> Option<RecordId> {
        let row = self.rows.get_mut(position)?;
        row.record = record;
        Some(row.id)
    }

    /// Removes the row at `position`, shifting later rows down by one.
    pub(crate) fn remove(&mut self, position: usize) -> Option<Row> {
        if position < self.rows.len() {
            Some(self.rows.remove(position))
        } else {
            None
        }
    }

    /// Rows whose stringified value at `field` contains `needle`.
    ///
    /// Unknown fields yield no matches.
    pub fn search(&self, field: &str, needle: &str, case_insensitive: bool) -> Vec<RecordRef> {
        if schema::field(field).is_none() {
            return Vec::new();
        }

        let needle = if case_insensitive {
            needle.to_lowercase()
        } else {
            needle.to_string()
        };

        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                let haystack = row.record.display_value(field);
                if case_insensitive {
                    haystack.to_lowercase().contains(&needle)
                } else {
                    haystack.contains(&needle)
                }
            })
            .map(|(position, row)| RecordRef {
                id: row.id,
                position,
            })
            .collect()
    }

    /// Subsequence of rows whose value at every listed column is in its
    /// allowed set. Ids are preserved; positions are relative to the view.
    pub fn filter(&self, criteria: &FilterCriteria) -> Dataset {
        let rows = self
            .rows
            .iter()
            .filter(|row| {
                criteria
                    .iter()
                    .all(|(field, allowed)| allowed.contains(&row.record.display_value(field)))
            })
            .cloned()
            .collect();
        Dataset { rows }
    }

    /// Sorted distinct non-blank values present in a column.
    pub fn distinct_values(&self, field: &str) -> Vec<String> {
        let values: BTreeSet<String> = self
            .records()
            .filter_map(|record| record.get(field))
            .filter(|value| !value.is_blank())
            .map(ToString::to_string)
            .collect();
        values.into_iter().collect()
    }
}
