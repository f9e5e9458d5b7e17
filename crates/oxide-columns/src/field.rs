//! Field descriptions.
//!
//! A field is described in JSON the way a validation schema describes it:
//!
//! ```json
//! {
//!   "type": "number",
//!   "flags": { "required": true, "references": "users.id", "onDelete": "cascade" },
//!   "rules": { "min": 0, "max": 300 },
//!   "allow": []
//! }
//! ```
//!
//! [`FieldDescriptor`] implements the accessor traits on top of that shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::accessor::{DefaultLiteral, FieldPredicates, FieldValues, LogicalType, StringLength};
use crate::error::{ColumnError, Result};

/// Lengths implied by string format rules, checked in order.
const FORMAT_LENGTHS: &[(&str, u64)] = &[
    ("email", 254),
    ("uri", 2083),
    ("uuid", 36),
    ("guid", 36),
    ("ip", 45),
    ("hostname", 255),
    ("isoDate", 32),
    ("creditCard", 19),
];

/// Length of a string with no format rule.
const DEFAULT_STRING_LENGTH: u64 = 255;

/// The raw description of one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Logical type tag, kept raw so unknown types surface as errors.
    #[serde(rename = "type")]
    pub logical_type: String,
    /// Named flags (`required`, `unique`, `default`, ...).
    #[serde(default)]
    pub flags: Map<String, Value>,
    /// Named rules (`min`, `max`, `precision`, ...).
    #[serde(default)]
    pub rules: Map<String, Value>,
    /// Permitted literals for enumerations.
    #[serde(default)]
    pub allow: Vec<Value>,
}

impl FieldDescriptor {
    /// Creates a descriptor of the given logical type.
    #[must_use]
    pub fn new(logical_type: impl Into<String>) -> Self {
        Self {
            logical_type: logical_type.into(),
            ..Self::default()
        }
    }

    /// Sets a flag.
    #[must_use]
    pub fn flag(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.flags.insert(name.to_string(), value.into());
        self
    }

    /// Sets a rule.
    #[must_use]
    pub fn rule(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.rules.insert(name.to_string(), value.into());
        self
    }

    /// Sets the permitted literals.
    #[must_use]
    pub fn allow_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allow = values.into_iter().map(Into::into).collect();
        self
    }

    fn flag_is(&self, name: &str) -> bool {
        self.flags.get(name).and_then(Value::as_bool) == Some(true)
    }

    fn flag_str(&self, name: &str) -> Option<&str> {
        self.flags.get(name).and_then(Value::as_str)
    }

    fn rule_is_set(&self, name: &str) -> bool {
        !matches!(
            self.rules.get(name),
            None | Some(Value::Null | Value::Bool(false))
        )
    }

    fn rule_present(&self, name: &str) -> bool {
        self.rules.get(name).is_some_and(|v| !v.is_null())
    }

    fn rule_number(&self, name: &'static str) -> Result<Option<f64>> {
        match self.rules.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| invalid_rule(name, "a number", value)),
        }
    }

    fn cascades(&self, flag: &str) -> bool {
        self.flag_str(flag)
            .is_some_and(|action| action.eq_ignore_ascii_case("cascade"))
    }
}

fn invalid_rule(constraint: &'static str, expected: &str, value: &Value) -> ColumnError {
    ColumnError::InvalidConstraint {
        constraint,
        message: format!("expected {expected}, got {value}"),
    }
}

/// Textual form of a scalar JSON value, without string quotes.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl FieldPredicates for FieldDescriptor {
    fn unique(&self) -> bool {
        self.flag_is("unique")
    }

    fn primary_key(&self) -> bool {
        self.flag_is("primary")
    }

    fn foreign_key(&self) -> bool {
        self.flags.contains_key("references")
    }

    fn default_value(&self) -> bool {
        self.flags.contains_key("default")
    }

    fn required(&self) -> bool {
        self.flag_is("required") || self.flag_str("presence") == Some("required")
    }

    fn delete_cascade(&self) -> bool {
        self.cascades("onDelete")
    }

    fn update_cascade(&self) -> bool {
        self.cascades("onUpdate")
    }

    fn date(&self) -> bool {
        self.logical_type == "date"
    }

    fn date_unix(&self) -> bool {
        self.flag_str("timestamp") == Some("unix")
    }

    fn float(&self) -> bool {
        self.flag_is("float")
    }

    fn precision_set(&self) -> bool {
        self.rule_is_set("precision")
    }

    fn double(&self) -> bool {
        self.flag_is("double")
    }

    fn port_set(&self) -> bool {
        self.rule_is_set("port")
    }

    fn strictly_positive(&self) -> bool {
        self.rule_is_set("positive")
    }

    fn enum_flag(&self) -> bool {
        self.flag_is("enum")
    }

    fn max_set(&self) -> bool {
        self.rule_present("max")
    }
}

impl FieldValues for FieldDescriptor {
    fn logical_type(&self) -> Result<LogicalType> {
        self.logical_type.parse()
    }

    fn foreign_key_target(&self) -> Result<(String, String)> {
        let invalid = |message: &str| ColumnError::InvalidConstraint {
            constraint: "references",
            message: message.to_string(),
        };
        match self.flags.get("references") {
            None | Some(Value::Null) => Err(ColumnError::MissingConstraint {
                constraint: "references",
            }),
            Some(Value::String(target)) => match target.split_once('.') {
                Some((table, column)) if !table.is_empty() && !column.is_empty() => {
                    Ok((table.to_string(), column.to_string()))
                }
                _ => Err(invalid("expected \"table.column\"")),
            },
            Some(Value::Object(target)) => {
                let table = target.get("table").and_then(Value::as_str);
                let column = target.get("column").and_then(Value::as_str);
                match (table, column) {
                    (Some(table), Some(column)) => Ok((table.to_string(), column.to_string())),
                    _ => Err(invalid("expected { \"table\": ..., \"column\": ... }")),
                }
            }
            Some(_) => Err(invalid("expected a string or an object")),
        }
    }

    fn default_literal(&self) -> Result<DefaultLiteral> {
        match self.flags.get("default") {
            None => Err(ColumnError::MissingConstraint {
                constraint: "default",
            }),
            Some(Value::Null) => Ok(DefaultLiteral::Null),
            Some(value) => scalar_text(value).map(DefaultLiteral::Value).ok_or_else(|| {
                ColumnError::InvalidConstraint {
                    constraint: "default",
                    message: format!("expected a scalar, got {value}"),
                }
            }),
        }
    }

    fn precision(&self) -> Result<Option<u32>> {
        let value = match self.rules.get("precision") {
            None | Some(Value::Null | Value::Bool(false)) => return Ok(None),
            Some(value) => value,
        };
        value
            .as_u64()
            .filter(|p| *p > 0)
            .and_then(|p| u32::try_from(p).ok())
            .map(Some)
            .ok_or_else(|| invalid_rule("precision", "a positive integer", value))
    }

    fn greater(&self) -> Result<Option<f64>> {
        self.rule_number("greater")
    }

    fn less(&self) -> Result<Option<f64>> {
        self.rule_number("less")
    }

    fn max(&self) -> Result<Option<f64>> {
        self.rule_number("max")
    }

    fn min(&self) -> Result<Option<f64>> {
        self.rule_number("min")
    }

    fn string_length_by_type(&self) -> Result<StringLength> {
        if self.flag_is("text") {
            return Ok(StringLength::Unbounded);
        }
        if let Some(value) = self.rules.get("length").filter(|v| !v.is_null()) {
            return value
                .as_u64()
                .map(StringLength::Bounded)
                .ok_or_else(|| invalid_rule("length", "a non-negative integer", value));
        }
        Ok(FORMAT_LENGTHS
            .iter()
            .find(|(format, _)| self.rule_is_set(format))
            .map_or(StringLength::Bounded(DEFAULT_STRING_LENGTH), |(_, len)| {
                StringLength::Bounded(*len)
            }))
    }

    fn allow(&self) -> Vec<String> {
        self.allow.iter().filter_map(scalar_text).collect()
    }
}

/// A field together with its column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedField {
    /// Column name.
    pub name: String,
    /// The field description.
    #[serde(flatten)]
    pub field: FieldDescriptor,
}

/// All fields of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Table name.
    pub table: String,
    /// Fields, in column order.
    pub fields: Vec<NamedField>,
}

impl TableDescriptor {
    /// Parses a table description from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
