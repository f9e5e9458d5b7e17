//! Field constraints to MySQL columns.
//!
//! `oxide-columns` turns a validation-style field description (logical type,
//! flags such as `required` or `references`, rules such as `min`/`max` or
//! `email`) into the narrowest fitting MySQL column, and produces it twice:
//!
//! - **live**: [`ColumnPlan::apply`] drives a [`TableBuilder`], such as the
//!   in-memory [`TableDefinition`] that [`MysqlDialect`] turns into DDL;
//! - **source**: [`ColumnPlan::render`] yields the equivalent chained-call text
//!   for a migration file, in knex or Rust syntax.
//!
//! Both come from the same [`ColumnPlan`], so they cannot disagree.
//! [`replay::parse_column`] reads rendered text back for verification.
//!
//! # Architecture
//!
//! - **Accessor** - [`FieldPredicates`] / [`FieldValues`], implemented by
//!   [`FieldDescriptor`] over JSON
//! - **Catalog** - ordered MySQL integer and string classes
//! - **Resolve** - numeric, string, date and boolean resolvers plus the
//!   modifier pipeline
//! - **Render / Replay** - migration source text and its parser
//! - **Writer** - complete migration files
//!
//! # Example
//!
//! ```rust
//! use oxide_columns::prelude::*;
//!
//! let field = FieldDescriptor::new("string")
//!     .rule("email", true)
//!     .flag("unique", true)
//!     .flag("required", true);
//!
//! let plan = Resolver::mysql().resolve("email", &field).unwrap();
//! assert_eq!(
//!     plan.render(SourceSyntax::Knex),
//!     ".string('email', 254).unique().notNullable()"
//! );
//!
//! let mut table = TableDefinition::new("users");
//! plan.apply(&mut table);
//! assert_eq!(
//!     MysqlDialect::new().column_definition(&table.columns[0]),
//!     "`email` VARCHAR(254) NOT NULL UNIQUE"
//! );
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Print each column's migration text
//! oxide-columns column users.json
//!
//! # Print the MySQL CREATE TABLE statement
//! oxide-columns sql users.json
//!
//! # Write migrations/0001_create_users.rs
//! oxide-columns --syntax rust makemigration users.json --out migrations
//! ```

pub mod accessor;
pub mod builder;
pub mod catalog;
pub mod dialect;
pub mod error;
pub mod field;
pub mod plan;
pub mod render;
pub mod replay;
pub mod resolve;
pub mod schema;
pub mod writer;

pub use accessor::{Constraints, FieldPredicates, FieldValues, LogicalType};
pub use builder::{ColumnBuilder, TableBuilder};
pub use catalog::TypeCatalog;
pub use dialect::{MigrationDialect, MysqlDialect};
pub use error::{ColumnError, Result};
pub use field::{FieldDescriptor, NamedField, TableDescriptor};
pub use plan::{ColumnPlan, ColumnType, DefaultValue, ForeignKeyAction, Modifier, TextKind};
pub use render::SourceSyntax;
pub use resolve::Resolver;
pub use schema::{ColumnDefinition, TableDefinition};
pub use writer::{generate_migration_name, MigrationWriter};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::accessor::{
        Constraints, DefaultLiteral, FieldPredicates, FieldValues, LogicalType, StringLength,
    };
    pub use crate::builder::{ColumnBuilder, TableBuilder};
    pub use crate::catalog::TypeCatalog;
    pub use crate::dialect::{MigrationDialect, MysqlDialect};
    pub use crate::error::{ColumnError, Result};
    pub use crate::field::{FieldDescriptor, NamedField, TableDescriptor};
    pub use crate::plan::{
        ColumnPlan, ColumnType, DefaultValue, ForeignKeyAction, Modifier, TextKind,
    };
    pub use crate::render::SourceSyntax;
    pub use crate::replay::parse_column;
    pub use crate::resolve::Resolver;
    pub use crate::schema::{ColumnDefinition, ForeignKeyRef, TableDefinition};
    pub use crate::writer::{generate_migration_name, MigrationWriter};
}
