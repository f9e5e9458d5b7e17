//! SQL dialects for table definitions.
//!
//! A dialect turns a [`TableDefinition`] built by the live side of resolution
//! into DDL. Only MySQL is provided; its type catalog is the one the
//! resolvers select from.

use crate::plan::{ColumnType, DefaultValue};
use crate::schema::{ColumnDefinition, TableDefinition};

/// Trait for database-specific SQL generation.
pub trait MigrationDialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the SQL type name for the given column type.
    fn type_name(&self, column_type: &ColumnType) -> String;

    /// Quote an identifier (table name, column name, etc.).
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{name}\"")
    }

    /// Renders a default value for a column of the given type.
    fn default_sql(&self, column_type: &ColumnType, value: &DefaultValue) -> String {
        let _ = column_type;
        value.to_sql()
    }

    /// Generates column definition SQL, with the primary key inline.
    fn column_definition(&self, column: &ColumnDefinition) -> String {
        let mut parts = vec![
            self.quote_identifier(&column.name),
            self.type_name(&column.column_type),
        ];

        if !column.nullable && !column.primary_key {
            parts.push("NOT NULL".to_string());
        }

        if let Some(default) = &column.default {
            parts.push(format!(
                "DEFAULT {}",
                self.default_sql(&column.column_type, default)
            ));
        }

        if column.unique && !column.primary_key {
            parts.push("UNIQUE".to_string());
        }

        if column.primary_key {
            parts.push("PRIMARY KEY".to_string());
        }

        parts.join(" ")
    }

    /// Generates the `FOREIGN KEY` table constraint for a column, if it has a
    /// complete reference.
    fn foreign_key_constraint(&self, column: &ColumnDefinition) -> Option<String> {
        let fk = column.references.as_ref()?;
        if fk.table.is_empty() || fk.column.is_empty() {
            return None;
        }
        let mut sql = format!(
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            self.quote_identifier(&column.name),
            self.quote_identifier(&fk.table),
            self.quote_identifier(&fk.column)
        );
        if let Some(action) = column.on_delete {
            sql.push_str(" ON DELETE ");
            sql.push_str(action.as_sql());
        }
        if let Some(action) = column.on_update {
            sql.push_str(" ON UPDATE ");
            sql.push_str(action.as_sql());
        }
        Some(sql)
    }

    /// Generates SQL for creating a table.
    ///
    /// A single primary key column is declared inline; a composite key
    /// becomes a table constraint.
    fn create_table_sql(&self, table: &TableDefinition) -> String {
        let composite = table.primary_key().count() > 1;

        let mut entries: Vec<String> = table
            .columns
            .iter()
            .map(|column| {
                if composite && column.primary_key {
                    self.column_definition(&ColumnDefinition {
                        primary_key: false,
                        nullable: false,
                        ..column.clone()
                    })
                } else {
                    self.column_definition(column)
                }
            })
            .collect();

        if composite {
            let quoted: Vec<String> = table
                .primary_key()
                .map(|c| self.quote_identifier(c))
                .collect();
            entries.push(format!("PRIMARY KEY ({})", quoted.join(", ")));
        }

        entries.extend(
            table
                .columns
                .iter()
                .filter_map(|c| self.foreign_key_constraint(c)),
        );

        format!(
            "CREATE TABLE {} (\n  {}\n)",
            self.quote_identifier(&table.name),
            entries.join(",\n  ")
        )
    }

    /// Generates SQL for dropping a table.
    fn drop_table_sql(&self, name: &str) -> String {
        format!("DROP TABLE IF EXISTS {}", self.quote_identifier(name))
    }
}

/// MySQL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MigrationDialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn type_name(&self, column_type: &ColumnType) -> String {
        match column_type {
            ColumnType::SpecificType(name) => name.to_uppercase(),
            ColumnType::Float { precision, scale } => format!("FLOAT({precision}, {scale})"),
            ColumnType::String(length) => format!("VARCHAR({length})"),
            ColumnType::Text(kind) => kind.as_sql().to_uppercase(),
            ColumnType::Enum(values) => {
                let quoted: Vec<String> = values
                    .iter()
                    .map(|v| format!("'{}'", v.replace('\'', "''")))
                    .collect();
                format!("ENUM({})", quoted.join(","))
            }
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::DateTime => "DATETIME".to_string(),
        }
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    fn default_sql(&self, column_type: &ColumnType, value: &DefaultValue) -> String {
        match (column_type, value) {
            (ColumnType::Boolean, DefaultValue::Literal(v)) if v == "true" => "TRUE".to_string(),
            (ColumnType::Boolean, DefaultValue::Literal(v)) if v == "false" => "FALSE".to_string(),
            _ => value.to_sql(),
        }
    }
}
