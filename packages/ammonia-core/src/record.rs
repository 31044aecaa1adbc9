//! Typed cell values, records, and record identity.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{self, FieldKind};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Session-scoped stable identifier of a row.
///
/// Assigned when a row is loaded or added and never reused; it survives
/// deletes of other rows, unlike the row's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent or blank
    Empty,
    /// Finite floating point number
    Number(f64),
    /// Integer identifier
    Integer(i64),
    /// Calendar date
    Date(NaiveDate),
    /// Text, or a value that did not parse for its column kind
    Text(String),
}

impl Value {
    /// Parses a raw string according to the column kind.
    ///
    /// Input that does not parse for numeric, identifier, or date columns is
    /// kept verbatim as [`Value::Text`] so nothing is lost on save.
    pub fn parse(kind: FieldKind, raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Empty;
        }

        let parsed = match kind {
            FieldKind::Numeric => parse_number(trimmed).map(Value::Number),
            FieldKind::Identifier => parse_identifier(trimmed).map(Value::Integer),
            FieldKind::Date => parse_stored_date(trimmed).map(Value::Date),
            FieldKind::ShortText | FieldKind::ControlledText(_) => None,
        };

        parsed.unwrap_or_else(|| Value::Text(raw.to_string()))
    }

    /// Returns true for empty values and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric interpretation, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Integer(i) => Some(*i as f64),
            Value::Text(s) => parse_number(s.trim()),
            Value::Empty | Value::Date(_) => None,
        }
    }

    /// Date interpretation, if any.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Text(s) => parse_date(s.trim()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Number(n) => write!(f, "{}", n),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Text(s) => f.write_str(s),
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Accepts plain integers and integral floats such as `3.0`.
fn parse_identifier(s: &str) -> Option<i64> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    let n = parse_number(s)?;
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn parse_plain_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parses a calendar date; date-times yield their date part.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    parse_plain_date(s).or_else(|| parse_datetime(s).map(|dt| dt.date()))
}

/// Date stored in a date column. A date-time only qualifies at midnight,
/// so a time of day is never dropped on save.
fn parse_stored_date(s: &str) -> Option<NaiveDate> {
    parse_plain_date(s).or_else(|| {
        parse_datetime(s)
            .filter(|dt| dt.time() == NaiveTime::MIN)
            .map(|dt| dt.date())
    })
}

/// A mapping from schema column to value.
///
/// A column that is absent is distinct from one present with
/// [`Value::Empty`]; only schema columns can be stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    values: BTreeMap<&'static str, Value>,
}

impl Record {
    /// Creates a record with no columns set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from raw `(column, text)` pairs.
    ///
    /// Values are parsed per column kind. Unknown columns are skipped.
    pub fn from_raw<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut record = Self::new();
        for (name, raw) in pairs {
            match schema::field(name) {
                Some(field) => {
                    record.values.insert(field.name, Value::parse(field.kind, raw));
                }
                None => tracing::debug!("Ignoring unknown field '{}'", name),
            }
        }
        record
    }

    /// Sets a column value. Returns false if the column is not in the schema.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match schema::field(name) {
            Some(field) => {
                self.values.insert(field.name, value);
                true
            }
            None => false,
        }
    }

    /// Parses and sets a column from raw text.
    pub fn set_raw(&mut self, name: &str, raw: &str) -> bool {
        match schema::field(name) {
            Some(field) => self.set(field.name, Value::parse(field.kind, raw)),
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Stringified value of a column; absent columns render as empty.
    pub fn display_value(&self, name: &str) -> String {
        self.get(name).map(ToString::to_string).unwrap_or_default()
    }

    /// Iterates over present columns in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        schema::fields()
            .iter()
            .filter_map(move |f| self.values.get(f.name).map(|v| (f.name, v)))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
