//! Column plans.
//!
//! A [`ColumnPlan`] is the single description of a resolved column: one
//! storage type followed by an ordered list of modifiers. The live builder
//! calls (`ColumnPlan::apply`) and the migration source text
//! (`ColumnPlan::render`) are both produced from it, so they cannot drift.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Text storage classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextKind {
    /// Plain TEXT.
    Text,
    /// MEDIUMTEXT.
    MediumText,
    /// LONGTEXT.
    LongText,
}

impl TextKind {
    /// Returns the SQL name of this class.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::MediumText => "mediumtext",
            Self::LongText => "longtext",
        }
    }

    /// Looks up a text class by SQL name.
    #[must_use]
    pub fn from_sql(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "mediumtext" => Some(Self::MediumText),
            "longtext" => Some(Self::LongText),
            _ => None,
        }
    }
}

/// Foreign key referential action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForeignKeyAction {
    /// No action.
    NoAction,
    /// Restrict deletion/update.
    Restrict,
    /// Cascade the operation.
    Cascade,
    /// Set to NULL.
    SetNull,
    /// Set to default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// Returns the SQL representation of the action.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }

    /// Parses the SQL representation (case-insensitive).
    #[must_use]
    pub fn from_sql(action: &str) -> Option<Self> {
        match action.to_ascii_uppercase().as_str() {
            "NO ACTION" => Some(Self::NoAction),
            "RESTRICT" => Some(Self::Restrict),
            "CASCADE" => Some(Self::Cascade),
            "SET NULL" => Some(Self::SetNull),
            "SET DEFAULT" => Some(Self::SetDefault),
            _ => None,
        }
    }

    /// Name of the Rust variant, as written in generated source.
    #[must_use]
    pub fn variant_name(self) -> &'static str {
        match self {
            Self::NoAction => "NoAction",
            Self::Restrict => "Restrict",
            Self::Cascade => "Cascade",
            Self::SetNull => "SetNull",
            Self::SetDefault => "SetDefault",
        }
    }
}

/// Default value of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// A quoted literal.
    Literal(String),
    /// NULL.
    Null,
    /// The engine's current-time function (`knex.fn.now()`).
    Now,
    /// A raw SQL expression (e.g. `now()`).
    Raw(String),
}

impl DefaultValue {
    /// Returns the SQL representation of the default value.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Literal(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Null => String::from("NULL"),
            Self::Now => String::from("CURRENT_TIMESTAMP"),
            Self::Raw(expr) => expr.clone(),
        }
    }
}

/// The storage type a column is created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// A type given verbatim (e.g. "smallint unsigned").
    SpecificType(String),
    /// FLOAT(precision, scale).
    Float {
        /// Total digits.
        precision: u32,
        /// Digits after the decimal point.
        scale: u32,
    },
    /// VARCHAR(length).
    String(u64),
    /// One of the text classes.
    Text(TextKind),
    /// ENUM over the given literals, in order.
    Enum(Vec<String>),
    /// BOOLEAN.
    Boolean,
    /// TIMESTAMP.
    Timestamp,
    /// DATETIME.
    DateTime,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpecificType(name) => write!(f, "{name}"),
            Self::Float { precision, scale } => write!(f, "float({precision}, {scale})"),
            Self::String(len) => write!(f, "varchar({len})"),
            Self::Text(kind) => write!(f, "{}", kind.as_sql()),
            Self::Enum(values) => write!(f, "enum({})", values.join(", ")),
            Self::Boolean => write!(f, "boolean"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::DateTime => write!(f, "datetime"),
        }
    }
}

/// A clause chained after the column constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    /// UNIQUE.
    Unique,
    /// PRIMARY KEY.
    Primary,
    /// REFERENCES `table`(`column`), rendered as `references` + `inTable`.
    References {
        /// Referenced table.
        table: String,
        /// Referenced column.
        column: String,
    },
    /// DEFAULT.
    DefaultTo(DefaultValue),
    /// NOT NULL.
    NotNullable,
    /// ON DELETE action.
    OnDelete(ForeignKeyAction),
    /// ON UPDATE action.
    OnUpdate(ForeignKeyAction),
}

/// A fully resolved column: constructor plus chained modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPlan {
    /// Column name.
    pub name: String,
    /// Storage type.
    pub column_type: ColumnType,
    /// Modifiers, in application order.
    pub modifiers: Vec<Modifier>,
}

impl ColumnPlan {
    /// Creates a plan with no modifiers.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            modifiers: Vec::new(),
        }
    }

    /// Appends a modifier.
    #[must_use]
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Appends a modifier in place.
    pub fn push(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    /// Returns true if the plan carries the given modifier.
    #[must_use]
    pub fn has(&self, modifier: &Modifier) -> bool {
        self.modifiers.contains(modifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_value_to_sql() {
        assert_eq!(DefaultValue::Null.to_sql(), "NULL");
        assert_eq!(DefaultValue::Literal("hello".into()).to_sql(), "'hello'");
        assert_eq!(DefaultValue::Literal("it's".into()).to_sql(), "'it''s'");
        assert_eq!(DefaultValue::Now.to_sql(), "CURRENT_TIMESTAMP");
        assert_eq!(DefaultValue::Raw("now()".into()).to_sql(), "now()");
    }

    #[test]
    fn test_foreign_key_action_round_trips_sql() {
        for action in [
            ForeignKeyAction::NoAction,
            ForeignKeyAction::Restrict,
            ForeignKeyAction::Cascade,
            ForeignKeyAction::SetNull,
            ForeignKeyAction::SetDefault,
        ] {
            assert_eq!(ForeignKeyAction::from_sql(action.as_sql()), Some(action));
        }
        assert_eq!(
            ForeignKeyAction::from_sql("cascade"),
            Some(ForeignKeyAction::Cascade)
        );
        assert_eq!(ForeignKeyAction::from_sql("explode"), None);
    }

    #[test]
    fn test_plan_builder() {
        let plan = ColumnPlan::new("email", ColumnType::String(254))
            .with(Modifier::Unique)
            .with(Modifier::NotNullable);
        assert_eq!(plan.modifiers.len(), 2);
        assert!(plan.has(&Modifier::Unique));
        assert!(!plan.has(&Modifier::Primary));
        assert_eq!(plan.column_type.to_string(), "varchar(254)");
    }
}
