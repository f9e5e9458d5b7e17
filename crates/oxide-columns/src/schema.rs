//! In-memory table definitions.
//!
//! [`TableDefinition`] implements the builder traits by recording the
//! resulting column state. It is what the live side of resolution builds when
//! no external schema builder is attached, and what [`crate::dialect`] turns
//! into DDL.

use serde::{Deserialize, Serialize};

use crate::builder::{ColumnBuilder, TableBuilder};
use crate::plan::{ColumnType, DefaultValue, ForeignKeyAction, TextKind};

/// A foreign key target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    /// Referenced table name. Empty until `in_table` is called.
    pub table: String,
    /// Referenced column name.
    pub column: String,
}

/// Recorded state of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Storage type.
    pub column_type: ColumnType,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Default value, if any.
    pub default: Option<DefaultValue>,
    /// Whether this column is the primary key.
    pub primary_key: bool,
    /// Whether this column has a UNIQUE constraint.
    pub unique: bool,
    /// Foreign key reference, if any.
    pub references: Option<ForeignKeyRef>,
    /// Action on delete.
    pub on_delete: Option<ForeignKeyAction>,
    /// Action on update.
    pub on_update: Option<ForeignKeyAction>,
}

impl ColumnDefinition {
    /// Creates a nullable column with no constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            default: None,
            primary_key: false,
            unique: false,
            references: None,
            on_delete: None,
            on_update: None,
        }
    }
}

impl ColumnBuilder for ColumnDefinition {
    fn unique(&mut self) -> &mut Self {
        self.unique = true;
        self
    }

    fn primary(&mut self) -> &mut Self {
        self.primary_key = true;
        self.nullable = false; // Primary keys are implicitly NOT NULL
        self
    }

    fn references(&mut self, column: &str) -> &mut Self {
        let table = self
            .references
            .take()
            .map(|fk| fk.table)
            .unwrap_or_default();
        self.references = Some(ForeignKeyRef {
            table,
            column: column.to_string(),
        });
        self
    }

    fn in_table(&mut self, table: &str) -> &mut Self {
        match &mut self.references {
            Some(fk) => fk.table = table.to_string(),
            None => {
                self.references = Some(ForeignKeyRef {
                    table: table.to_string(),
                    column: String::new(),
                });
            }
        }
        self
    }

    fn default_to(&mut self, value: DefaultValue) -> &mut Self {
        self.default = Some(value);
        self
    }

    fn not_nullable(&mut self) -> &mut Self {
        self.nullable = false;
        self
    }

    fn on_delete(&mut self, action: ForeignKeyAction) -> &mut Self {
        self.on_delete = Some(action);
        self
    }

    fn on_update(&mut self, action: ForeignKeyAction) -> &mut Self {
        self.on_update = Some(action);
        self
    }
}

/// A table under construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table name.
    pub name: String,
    /// Columns, in declaration order.
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    /// Creates an empty table definition.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of the primary key columns.
    pub fn primary_key(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
    }

    fn add(&mut self, name: &str, column_type: ColumnType) -> &mut ColumnDefinition {
        self.columns.push(ColumnDefinition::new(name, column_type));
        let last = self.columns.len() - 1;
        &mut self.columns[last]
    }
}

impl TableBuilder for TableDefinition {
    type Column = ColumnDefinition;

    fn specific_type(&mut self, name: &str, sql_type: &str) -> &mut ColumnDefinition {
        self.add(name, ColumnType::SpecificType(sql_type.to_string()))
    }

    fn float(&mut self, name: &str, precision: u32, scale: u32) -> &mut ColumnDefinition {
        self.add(name, ColumnType::Float { precision, scale })
    }

    fn string(&mut self, name: &str, length: u64) -> &mut ColumnDefinition {
        self.add(name, ColumnType::String(length))
    }

    fn text(&mut self, name: &str, kind: TextKind) -> &mut ColumnDefinition {
        self.add(name, ColumnType::Text(kind))
    }

    fn enu(&mut self, name: &str, values: &[&str]) -> &mut ColumnDefinition {
        let values = values.iter().map(|v| (*v).to_string()).collect();
        self.add(name, ColumnType::Enum(values))
    }

    fn boolean(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add(name, ColumnType::Boolean)
    }

    fn timestamp(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add(name, ColumnType::Timestamp)
    }

    fn date_time(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add(name, ColumnType::DateTime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_chaining() {
        let mut table = TableDefinition::new("posts");
        table
            .specific_type("author_id", "int unsigned")
            .references("id")
            .in_table("users")
            .not_nullable()
            .on_delete(ForeignKeyAction::Cascade);

        let col = table.get_column("author_id").unwrap();
        assert!(!col.nullable);
        assert_eq!(
            col.references,
            Some(ForeignKeyRef {
                table: "users".into(),
                column: "id".into(),
            })
        );
        assert_eq!(col.on_delete, Some(ForeignKeyAction::Cascade));
        assert_eq!(col.on_update, None);
    }

    #[test]
    fn test_in_table_before_references() {
        let mut table = TableDefinition::new("posts");
        table.boolean("flag").in_table("users").references("id");
        let fk = table.get_column("flag").unwrap().references.clone().unwrap();
        assert_eq!(fk.table, "users");
        assert_eq!(fk.column, "id");
    }

    #[test]
    fn test_primary_key_columns() {
        let mut table = TableDefinition::new("users");
        table.specific_type("id", "int unsigned").primary();
        table.string("name", 100).unique();

        assert_eq!(table.primary_key().collect::<Vec<_>>(), vec!["id"]);
        let id = table.get_column("id").unwrap();
        assert!(!id.nullable); // Primary key implies NOT NULL
        assert!(table.get_column("name").unwrap().unique);
    }
}
