//! Fixed column schema of the ammonia asset dataset.

mod field;
pub mod vocabulary;

pub use field::{Field, FieldKind};

use FieldKind::{ControlledText, Date, Identifier, Numeric, ShortText};

pub const VALUE: &str = "value";
pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const COUNTRY_NAME: &str = "country_name";
pub const FORECAST_MONTH_YEAR: &str = "forecast_month_year";

static FIELDS: [Field; 32] = [
    Field::new("market", ShortText),
    Field::new("subdivision", Identifier),
    Field::new("sector", ControlledText(vocabulary::SECTORS)),
    Field::new("series_type", ControlledText(vocabulary::SERIES_TYPES)),
    Field::new("data_source_name", ShortText),
    Field::new("carbon_intensity", ShortText),
    Field::new("product", ControlledText(vocabulary::PRODUCTS)),
    Field::new(START_DATE, Date),
    Field::new(END_DATE, Date),
    Field::new("uploaded_at_utc_date", Date),
    Field::new("uploaded_at_utc_time", ShortText),
    Field::new("dataset_type_name", ShortText),
    Field::new("scenario_name", Identifier),
    Field::new("frequency", ControlledText(vocabulary::FREQUENCIES)),
    Field::new("metric", ShortText),
    Field::new("unit", ShortText),
    Field::new(VALUE, Numeric),
    Field::new("vintage", ShortText),
    Field::new("forecast_name", ShortText),
    Field::new(FORECAST_MONTH_YEAR, ShortText),
    Field::new("forecast_name_full", ShortText),
    Field::new("id_country", Identifier),
    Field::new(COUNTRY_NAME, ShortText),
    Field::new("id_region", Identifier),
    Field::new("region", ShortText),
    Field::new("id_super_region", Identifier),
    Field::new("super_region", ShortText),
    Field::new("country_opec_oecd", ControlledText(vocabulary::OPEC_OECD_GROUPS)),
    Field::new("source_ids", ShortText),
    Field::new("source_ids_batch", ShortText),
    Field::new("transform_utc_time", ShortText),
    Field::new("partition_0", ShortText),
];

/// Returns the ordered column definitions.
pub fn fields() -> &'static [Field] {
    &FIELDS
}

/// Looks up a column by name.
pub fn field(name: &str) -> Option<&'static Field> {
    FIELDS.iter().find(|f| f.name == name)
}

/// Returns the column's position in file order.
pub fn position(name: &str) -> Option<usize> {
    FIELDS.iter().position(|f| f.name == name)
}

/// Returns the closed set of allowed values for a controlled-text column.
pub fn allowed_values(name: &str) -> Option<&'static [&'static str]> {
    field(name).and_then(|f| f.kind.vocabulary())
}

/// Iterates over the column names in file order.
pub fn names() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|f| f.name)
}
