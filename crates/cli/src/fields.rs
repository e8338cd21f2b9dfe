//! The editable book fields and how operator input is coerced for each.

use serde_json::Value;
use thiserror::Error;

use catalog_app::modules::books::models::rating_in_range;

/// Value type a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Rating,
    Authors,
    Text,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> Field {
    Field { name, kind }
}

/// Every book field except `_id`, in display and prompt order.
pub const BOOK_FIELDS: &[Field] = &[
    field("title", FieldKind::Text),
    field("authors", FieldKind::Authors),
    field("average_rating", FieldKind::Rating),
    field("isbn", FieldKind::Text),
    field("isbn13", FieldKind::Text),
    field("language_code", FieldKind::Text),
    field("num_pages", FieldKind::Integer),
    field("ratings_count", FieldKind::Integer),
    field("text_reviews_count", FieldKind::Integer),
    field("publication_date", FieldKind::Text),
    field("publisher", FieldKind::Text),
];

#[derive(Error, Debug, PartialEq)]
pub enum CoercionError {
    #[error("must be a whole number of zero or more, got '{0}'")]
    NotAnInteger(String),
    #[error("must be a number, got '{0}'")]
    NotANumber(String),
    #[error("must be between 0 and 5, got {0}")]
    RatingOutOfRange(f64),
}

/// Turns raw operator input into the JSON value stored for a field.
pub type Parser = fn(&str) -> Result<Value, CoercionError>;

fn parse_integer(raw: &str) -> Result<Value, CoercionError> {
    raw.trim()
        .parse::<u64>()
        .map(Value::from)
        .map_err(|_| CoercionError::NotAnInteger(raw.to_string()))
}

fn parse_rating(raw: &str) -> Result<Value, CoercionError> {
    let rating = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| CoercionError::NotANumber(raw.to_string()))?;
    if !rating.is_finite() {
        return Err(CoercionError::NotANumber(raw.to_string()));
    }
    if !rating_in_range(rating) {
        return Err(CoercionError::RatingOutOfRange(rating));
    }
    Ok(Value::from(rating))
}

fn parse_authors(raw: &str) -> Result<Value, CoercionError> {
    Ok(Value::Array(
        raw.split(',')
            .map(str::trim)
            .filter(|author| !author.is_empty())
            .map(|author| Value::String(author.to_string()))
            .collect(),
    ))
}

fn parse_text(raw: &str) -> Result<Value, CoercionError> {
    Ok(Value::String(raw.to_string()))
}

impl FieldKind {
    pub fn parser(self) -> Parser {
        match self {
            FieldKind::Integer => parse_integer,
            FieldKind::Rating => parse_rating,
            FieldKind::Authors => parse_authors,
            FieldKind::Text => parse_text,
        }
    }
}

/// Look up the parser for a field by name.
pub fn parser_for(name: &str) -> Option<Parser> {
    BOOK_FIELDS
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.kind.parser())
}
