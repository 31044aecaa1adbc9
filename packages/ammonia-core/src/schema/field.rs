//! Field definition within the dataset schema.

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Floating point quantity
    Numeric,
    /// Calendar date, stored as ISO-8601
    Date,
    /// Integer identifier
    Identifier,
    /// Free text
    ShortText,
    /// Text restricted to a closed vocabulary
    ControlledText(&'static [&'static str]),
}

impl FieldKind {
    /// Returns the allowed values for controlled-text kinds.
    pub fn vocabulary(&self) -> Option<&'static [&'static str]> {
        match self {
            FieldKind::ControlledText(values) => Some(values),
            _ => None,
        }
    }

    /// Short label used when describing the schema.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Numeric => "numeric",
            FieldKind::Date => "date",
            FieldKind::Identifier => "identifier",
            FieldKind::ShortText => "text",
            FieldKind::ControlledText(_) => "controlled",
        }
    }
}

/// One column of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Column name, unique within the schema
    pub name: &'static str,
    /// Semantic type
    pub kind: FieldKind,
}

impl Field {
    pub(crate) const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}
