//! Constraint accessor traits.
//!
//! The resolvers never look at a raw field description. They ask questions
//! through these two facets, which [`crate::field::FieldDescriptor`]
//! implements for JSON descriptions.

use std::str::FromStr;

use crate::error::{ColumnError, Result};

/// The logical types a field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    /// Integer or floating point number.
    Number,
    /// Character data.
    String,
    /// Date and time.
    Date,
    /// Boolean.
    Boolean,
}

impl FromStr for LogicalType {
    type Err = ColumnError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "number" => Ok(Self::Number),
            "string" => Ok(Self::String),
            "date" => Ok(Self::Date),
            "boolean" => Ok(Self::Boolean),
            other => Err(ColumnError::UnknownType(other.to_string())),
        }
    }
}

/// Boolean queries against a field description.
pub trait FieldPredicates {
    /// Column has a UNIQUE constraint.
    fn unique(&self) -> bool;
    /// Column is the primary key.
    fn primary_key(&self) -> bool;
    /// Column references another table.
    fn foreign_key(&self) -> bool;
    /// A default value is declared.
    fn default_value(&self) -> bool;
    /// Column is NOT NULL.
    fn required(&self) -> bool;
    /// Deletes cascade from the referenced row.
    fn delete_cascade(&self) -> bool;
    /// Updates cascade from the referenced row.
    fn update_cascade(&self) -> bool;
    /// Logical type is `date`.
    fn date(&self) -> bool;
    /// Dates are stored as unix timestamps.
    fn date_unix(&self) -> bool;
    /// Number is stored as a float.
    fn float(&self) -> bool;
    /// A precision is declared.
    fn precision_set(&self) -> bool;
    /// Number is stored as a double.
    fn double(&self) -> bool;
    /// Number is a network port.
    fn port_set(&self) -> bool;
    /// Number is strictly positive.
    fn strictly_positive(&self) -> bool;
    /// Only the `allow` literals are permitted.
    fn enum_flag(&self) -> bool;
    /// A maximum is declared.
    fn max_set(&self) -> bool;
}

/// Length implied by a string field's subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringLength {
    /// At most this many characters.
    Bounded(u64),
    /// Free text with no useful bound.
    Unbounded,
}

/// A default value as declared, before storage-specific handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultLiteral {
    /// Any scalar, in its textual form.
    Value(String),
    /// An explicit null.
    Null,
}

/// Typed values read from a field description.
///
/// Value getters for constraints whose predicate is true must succeed;
/// an absent or malformed value is an error, never a silent default.
pub trait FieldValues {
    /// The declared logical type.
    fn logical_type(&self) -> Result<LogicalType>;
    /// The `(table, column)` a foreign key points at.
    fn foreign_key_target(&self) -> Result<(String, String)>;
    /// The declared default value.
    fn default_literal(&self) -> Result<DefaultLiteral>;
    /// Declared float precision, a positive integer.
    fn precision(&self) -> Result<Option<u32>>;
    /// Exclusive lower bound.
    fn greater(&self) -> Result<Option<f64>>;
    /// Exclusive upper bound.
    fn less(&self) -> Result<Option<f64>>;
    /// Inclusive upper bound (or maximum string length).
    fn max(&self) -> Result<Option<f64>>;
    /// Inclusive lower bound.
    fn min(&self) -> Result<Option<f64>>;
    /// Length implied by the string subtype (email, uri, ...).
    fn string_length_by_type(&self) -> Result<StringLength>;
    /// Permitted literal values, in declaration order.
    fn allow(&self) -> Vec<String>;
}

/// Both accessor facets.
pub trait Constraints: FieldPredicates + FieldValues {}

impl<T: FieldPredicates + FieldValues> Constraints for T {}
