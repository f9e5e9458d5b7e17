//! Table-definition builder seam.
//!
//! The live output of resolution is a sequence of calls against these traits.
//! Implement them for whatever schema builder executes the migration; the
//! crate ships [`TableDefinition`](crate::schema::TableDefinition) as an
//! in-memory implementation.

use crate::plan::{ColumnPlan, ColumnType, DefaultValue, ForeignKeyAction, Modifier, TextKind};

/// Fluent column-constructor API of a table-definition builder.
pub trait TableBuilder {
    /// The column handle returned by the constructors.
    type Column: ColumnBuilder;

    /// Adds a column with a verbatim SQL type.
    fn specific_type(&mut self, name: &str, sql_type: &str) -> &mut Self::Column;

    /// Adds a FLOAT(precision, scale) column.
    fn float(&mut self, name: &str, precision: u32, scale: u32) -> &mut Self::Column;

    /// Adds a VARCHAR(length) column.
    fn string(&mut self, name: &str, length: u64) -> &mut Self::Column;

    /// Adds a text column of the given class.
    fn text(&mut self, name: &str, kind: TextKind) -> &mut Self::Column;

    /// Adds an enumeration column.
    fn enu(&mut self, name: &str, values: &[&str]) -> &mut Self::Column;

    /// Adds a BOOLEAN column.
    fn boolean(&mut self, name: &str) -> &mut Self::Column;

    /// Adds a TIMESTAMP column.
    fn timestamp(&mut self, name: &str) -> &mut Self::Column;

    /// Adds a DATETIME column.
    fn date_time(&mut self, name: &str) -> &mut Self::Column;
}

/// Chaining modifiers of a column handle.
pub trait ColumnBuilder {
    /// Adds a UNIQUE constraint.
    fn unique(&mut self) -> &mut Self;

    /// Marks the column as PRIMARY KEY.
    fn primary(&mut self) -> &mut Self;

    /// Sets the referenced column of a foreign key.
    fn references(&mut self, column: &str) -> &mut Self;

    /// Sets the referenced table of a foreign key.
    fn in_table(&mut self, table: &str) -> &mut Self;

    /// Sets the default value.
    fn default_to(&mut self, value: DefaultValue) -> &mut Self;

    /// Adds a NOT NULL constraint.
    fn not_nullable(&mut self) -> &mut Self;

    /// Sets the ON DELETE action.
    fn on_delete(&mut self, action: ForeignKeyAction) -> &mut Self;

    /// Sets the ON UPDATE action.
    fn on_update(&mut self, action: ForeignKeyAction) -> &mut Self;
}

impl ColumnPlan {
    /// Replays this plan against a live table builder and returns the
    /// resulting column handle.
    pub fn apply<'t, T: TableBuilder>(&self, table: &'t mut T) -> &'t mut T::Column {
        let name = self.name.as_str();
        let column = match &self.column_type {
            ColumnType::SpecificType(sql_type) => table.specific_type(name, sql_type),
            ColumnType::Float { precision, scale } => table.float(name, *precision, *scale),
            ColumnType::String(length) => table.string(name, *length),
            ColumnType::Text(kind) => table.text(name, *kind),
            ColumnType::Enum(values) => {
                let values: Vec<&str> = values.iter().map(String::as_str).collect();
                table.enu(name, &values)
            }
            ColumnType::Boolean => table.boolean(name),
            ColumnType::Timestamp => table.timestamp(name),
            ColumnType::DateTime => table.date_time(name),
        };

        for modifier in &self.modifiers {
            match modifier {
                Modifier::Unique => {
                    column.unique();
                }
                Modifier::Primary => {
                    column.primary();
                }
                Modifier::References { table, column: key } => {
                    column.references(key).in_table(table);
                }
                Modifier::DefaultTo(value) => {
                    column.default_to(value.clone());
                }
                Modifier::NotNullable => {
                    column.not_nullable();
                }
                Modifier::OnDelete(action) => {
                    column.on_delete(*action);
                }
                Modifier::OnUpdate(action) => {
                    column.on_update(*action);
                }
            }
        }
        column
    }
}
