//! Field resolution.
//!
//! Turns a field description into a [`ColumnPlan`]: the logical type picks a
//! resolver for the storage type, then the modifier pipeline appends key,
//! default and cascade clauses.
//!
//! # Example
//!
//! ```rust
//! use oxide_columns::{FieldDescriptor, Resolver, SourceSyntax};
//!
//! let field = FieldDescriptor::new("number")
//!     .rule("min", 0)
//!     .rule("max", 300)
//!     .flag("required", true);
//!
//! let plan = Resolver::mysql().resolve("age", &field).unwrap();
//! assert_eq!(
//!     plan.render(SourceSyntax::Knex),
//!     ".specificType('age', 'smallint unsigned').notNullable()"
//! );
//! ```

pub mod modifiers;
pub mod numeric;
pub mod string;
pub mod temporal;

use tracing::debug;

use crate::accessor::{Constraints, LogicalType};
use crate::catalog::TypeCatalog;
use crate::error::Result;
use crate::field::TableDescriptor;
use crate::plan::{ColumnPlan, ColumnType};
use crate::schema::TableDefinition;

pub use numeric::{EffectiveBounds, NumericType};

/// Resolves fields against one type catalog.
///
/// Holds nothing but a shared reference to immutable data, so a resolver can
/// be copied freely and used from several threads at once.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'c> {
    catalog: &'c TypeCatalog,
}

impl Default for Resolver<'static> {
    fn default() -> Self {
        Self::mysql()
    }
}

impl Resolver<'static> {
    /// A resolver over the MySQL catalog.
    #[must_use]
    pub fn mysql() -> Self {
        Self {
            catalog: &TypeCatalog::MYSQL,
        }
    }
}

impl<'c> Resolver<'c> {
    /// Creates a resolver over the given catalog.
    #[must_use]
    pub fn new(catalog: &'c TypeCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog this resolver selects from.
    #[must_use]
    pub fn catalog(&self) -> &'c TypeCatalog {
        self.catalog
    }

    /// Resolves one field into a column plan.
    ///
    /// Errors are wrapped with the field name.
    pub fn resolve<F: Constraints + ?Sized>(&self, name: &str, field: &F) -> Result<ColumnPlan> {
        self.resolve_inner(name, field)
            .map_err(|e| e.in_field(name))
    }

    /// Resolves only the storage type of a field.
    pub fn column_type<F: Constraints + ?Sized>(
        &self,
        name: &str,
        field: &F,
    ) -> Result<ColumnType> {
        let column_type = match field.logical_type()? {
            LogicalType::Number => numeric::resolve(self.catalog, name, field)?.column_type(),
            LogicalType::String => string::resolve(self.catalog, field)?,
            LogicalType::Date => temporal::resolve_date(field),
            LogicalType::Boolean => temporal::resolve_boolean(),
        };
        debug!(field = name, %column_type, "Resolved storage type");
        Ok(column_type)
    }

    /// Resolves every field of a table, in declaration order.
    pub fn resolve_table(&self, table: &TableDescriptor) -> Result<Vec<ColumnPlan>> {
        table
            .fields
            .iter()
            .map(|f| self.resolve(&f.name, &f.field))
            .collect()
    }

    /// Resolves a table and applies every plan to an in-memory definition.
    pub fn build_table(&self, table: &TableDescriptor) -> Result<TableDefinition> {
        let mut definition = TableDefinition::new(&table.table);
        for plan in self.resolve_table(table)? {
            plan.apply(&mut definition);
        }
        Ok(definition)
    }

    fn resolve_inner<F: Constraints + ?Sized>(&self, name: &str, field: &F) -> Result<ColumnPlan> {
        let mut plan = ColumnPlan::new(name, self.column_type(name, field)?);
        modifiers::apply(&mut plan, field)?;
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ColumnError;
    use crate::field::FieldDescriptor;
    use crate::plan::{DefaultValue, Modifier};

    #[test]
    fn test_boolean_ignores_rules() {
        let field = FieldDescriptor::new("boolean")
            .rule("min", 5)
            .rule("max", 4000)
            .flag("enum", true);
        let plan = Resolver::mysql().resolve("active", &field).unwrap();
        assert_eq!(plan.column_type, ColumnType::Boolean);
        assert!(plan.modifiers.is_empty());
    }

    #[test]
    fn test_unknown_type_is_fatal() {
        let field = FieldDescriptor::new("object");
        let err = Resolver::mysql().resolve("meta", &field).unwrap_err();
        match err {
            ColumnError::Field { name, source } => {
                assert_eq!(name, "meta");
                assert!(matches!(*source, ColumnError::UnknownType(t) if t == "object"));
            }
            other => panic!("expected Field error, got {other:?}"),
        }
    }

    #[test]
    fn test_unix_date_with_now_default() {
        let field = FieldDescriptor::new("date")
            .flag("timestamp", "unix")
            .flag("default", "now")
            .flag("required", true);
        let plan = Resolver::default().resolve("created_at", &field).unwrap();
        assert_eq!(plan.column_type, ColumnType::Timestamp);
        assert_eq!(
            plan.modifiers,
            vec![Modifier::DefaultTo(DefaultValue::Now), Modifier::NotNullable]
        );
    }

    #[test]
    fn test_build_table() {
        let table = TableDescriptor::from_json(
            r#"{
                "table": "users",
                "fields": [
                    { "name": "id", "type": "number",
                      "flags": { "primary": true }, "rules": { "min": 1 } },
                    { "name": "email", "type": "string",
                      "flags": { "unique": true }, "rules": { "email": true } }
                ]
            }"#,
        )
        .unwrap();
        let definition = Resolver::mysql().build_table(&table).unwrap();
        assert_eq!(definition.name, "users");
        assert_eq!(definition.primary_key().collect::<Vec<_>>(), vec!["id"]);
        let email = definition.get_column("email").unwrap();
        assert_eq!(email.column_type, ColumnType::String(254));
        assert!(email.unique);
    }

    #[test]
    fn test_table_error_names_field() {
        let table = TableDescriptor::from_json(
            r#"{ "table": "t", "fields": [ { "name": "blob", "type": "binary" } ] }"#,
        )
        .unwrap();
        let err = Resolver::mysql().resolve_table(&table).unwrap_err();
        assert!(err.to_string().contains("'blob'"), "{err}");
    }

    #[test]
    fn test_resolver_is_shareable_across_threads() {
        let resolver = Resolver::mysql();
        let handles: Vec<_> = (0..4_i64)
            .map(|i| {
                std::thread::spawn(move || {
                    let field = FieldDescriptor::new("number")
                        .rule("min", 0)
                        .rule("max", 200 * (i + 1));
                    resolver.resolve("n", &field).unwrap()
                })
            })
            .collect();
        for handle in handles {
            let plan = handle.join().unwrap();
            assert_eq!(
                plan.column_type,
                ColumnType::SpecificType("smallint unsigned".into())
            );
        }
    }
}
