//! Write-time validation rules for candidate records.
//!
//! Every rule is evaluated independently and all violations are reported
//! together, in rule order. Rows already on disk are never re-validated.

use thiserror::Error;

use crate::config::StoreConfig;
use crate::record::Record;
use crate::schema::{self, COUNTRY_NAME, END_DATE, FORECAST_MONTH_YEAR, START_DATE, VALUE};

/// A single rule violation. `Display` yields the fixed message shown to users.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Value must be a positive number.")]
    NonPositiveValue,

    #[error("Invalid date format for start_date or end_date.")]
    InvalidDateFormat,

    #[error("Start date must be before end date.")]
    StartNotBeforeEnd,

    #[error("Country name must not be empty.")]
    MissingCountryName,

    #[error("Forecast month-year must be in format Mon-YYYY (e.g., Jan-2023).")]
    InvalidForecastMonthYear,

    /// Only produced when vocabulary enforcement is enabled
    #[error("{field} must be one of the allowed values.")]
    OutOfVocabulary { field: &'static str },
}

/// Stateless rule set applied before any write.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    enforce_vocabulary: bool,
}

impl Validator {
    /// Creates a validator with the four core rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator that also checks controlled-text membership.
    pub fn with_vocabulary_enforcement() -> Self {
        Self {
            enforce_vocabulary: true,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            enforce_vocabulary: config.enforce_vocabulary,
        }
    }

    pub fn enforces_vocabulary(&self) -> bool {
        self.enforce_vocabulary
    }

    /// Returns every rule violation of `record`; empty means accepted.
    pub fn validate(&self, record: &Record) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        errors.extend(check_value(record));
        errors.extend(check_date_order(record));
        errors.extend(check_country_name(record));
        errors.extend(check_forecast_month_year(record));
        if self.enforce_vocabulary {
            errors.extend(check_vocabulary(record));
        }
        errors
    }
}

/// Validates with the default rule set.
pub fn validate(record: &Record) -> Vec<ValidationError> {
    Validator::new().validate(record)
}

/// `value`, when supplied, must be a number strictly greater than zero.
fn check_value(record: &Record) -> Option<ValidationError> {
    let value = record.get(VALUE)?;
    match value.as_f64() {
        Some(n) if n > 0.0 => None,
        _ => Some(ValidationError::NonPositiveValue),
    }
}

/// Parse failure on either date wins over the ordering check.
fn check_date_order(record: &Record) -> Option<ValidationError> {
    let start = record.get(START_DATE).and_then(|v| v.as_date());
    let end = record.get(END_DATE).and_then(|v| v.as_date());
    match (start, end) {
        (Some(start), Some(end)) if start < end => None,
        (Some(_), Some(_)) => Some(ValidationError::StartNotBeforeEnd),
        _ => Some(ValidationError::InvalidDateFormat),
    }
}

fn check_country_name(record: &Record) -> Option<ValidationError> {
    match record.get(COUNTRY_NAME) {
        Some(value) if !value.is_blank() => None,
        _ => Some(ValidationError::MissingCountryName),
    }
}

fn check_forecast_month_year(record: &Record) -> Option<ValidationError> {
    if is_month_year(&record.display_value(FORECAST_MONTH_YEAR)) {
        None
    } else {
        Some(ValidationError::InvalidForecastMonthYear)
    }
}

/// Matches `Mon-YYYY`: one uppercase letter, two lowercase letters, a
/// hyphen, four digits, nothing else.
pub fn is_month_year(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 8
        && bytes[0].is_ascii_uppercase()
        && bytes[1..3].iter().all(u8::is_ascii_lowercase)
        && bytes[3] == b'-'
        && bytes[4..].iter().all(u8::is_ascii_digit)
}

/// Blank values are allowed; non-blank ones must be in the vocabulary.
fn check_vocabulary(record: &Record) -> Vec<ValidationError> {
    schema::fields()
        .iter()
        .filter_map(|field| {
            let allowed = field.kind.vocabulary()?;
            let value = record.get(field.name)?;
            if value.is_blank() || allowed.contains(&value.to_string().as_str()) {
                None
            } else {
                Some(ValidationError::OutOfVocabulary { field: field.name })
            }
        })
        .collect()
}
