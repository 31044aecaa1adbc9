//! Closed vocabularies for dropdown-style columns.
//!
//! These are the product's configured value sets, not values derived from
//! existing data; extend them here when new categories are approved.

pub const SERIES_TYPES: &[&str] = &["Historical", "Forecast"];

pub const FREQUENCIES: &[&str] = &["Annual", "Quarterly", "Monthly"];

pub const PRODUCTS: &[&str] = &[
    "Ammonia",
    "Grey Ammonia",
    "Blue Ammonia",
    "Green Ammonia",
    "Low-Carbon Ammonia",
];

pub const SECTORS: &[&str] = &[
    "Agriculture",
    "Industrial",
    "Power",
    "Shipping",
    "Hydrogen Carrier",
];

pub const OPEC_OECD_GROUPS: &[&str] = &["OPEC", "OECD", "Non-OPEC Non-OECD"];
