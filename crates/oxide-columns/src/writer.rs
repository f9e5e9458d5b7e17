//! Migration file generation.
//!
//! Resolves every field of a table description and writes a complete
//! migration source file in the chosen syntax: a knex module exporting
//! `up`/`down`, or a Rust module with `up`/`down` functions over
//! [`TableBuilder`](crate::builder::TableBuilder) and
//! [`MigrationDialect`](crate::dialect::MigrationDialect).

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ColumnError, Result};
use crate::field::TableDescriptor;
use crate::render::SourceSyntax;
use crate::resolve::Resolver;

impl SourceSyntax {
    /// File extension of migration files in this syntax.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Rust => "rs",
            Self::Knex => "js",
        }
    }
}

/// Generates a migration name from a number and description.
#[must_use]
pub fn generate_migration_name(number: u32, description: &str) -> String {
    format!("{number:04}_{description}")
}

/// Returns the number following the highest numbered migration in `dir`.
///
/// A missing directory yields 1.
pub fn next_migration_number(dir: &Path) -> Result<u32> {
    if !dir.exists() {
        return Ok(1);
    }
    let mut highest = 0;
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let digits: String = name.chars().take_while(char::is_ascii_digit).collect();
        if let Ok(number) = digits.parse::<u32>() {
            highest = highest.max(number);
        }
    }
    highest
        .checked_add(1)
        .ok_or_else(|| ColumnError::MigrationNumberExhausted {
            dir: dir.to_path_buf(),
            highest,
        })
}

/// Writes `CREATE TABLE` migrations for table descriptions.
#[derive(Debug, Clone, Copy)]
pub struct MigrationWriter<'c> {
    resolver: Resolver<'c>,
    syntax: SourceSyntax,
}

impl MigrationWriter<'static> {
    /// A writer over the MySQL catalog.
    #[must_use]
    pub fn new(syntax: SourceSyntax) -> Self {
        Self::with_resolver(Resolver::mysql(), syntax)
    }
}

impl<'c> MigrationWriter<'c> {
    /// A writer using the given resolver.
    #[must_use]
    pub const fn with_resolver(resolver: Resolver<'c>, syntax: SourceSyntax) -> Self {
        Self { resolver, syntax }
    }

    /// The syntax migrations are written in.
    #[must_use]
    pub const fn syntax(&self) -> SourceSyntax {
        self.syntax
    }

    /// Generates the migration source for one table.
    pub fn generate(&self, name: &str, table: &TableDescriptor) -> Result<String> {
        let plans = self.resolver.resolve_table(table)?;
        debug!(table = %table.table, columns = plans.len(), "Generating migration");

        let mut code = String::new();
        match self.syntax {
            SourceSyntax::Knex => {
                let quoted = self.syntax.quote(&table.table);
                let _ = writeln!(code, "// Migration: {name}");
                code.push('\n');
                code.push_str("exports.up = function (knex) {\n");
                let _ = writeln!(
                    code,
                    "  return knex.schema.createTable({quoted}, (table) => {{"
                );
                for plan in &plans {
                    let _ = writeln!(code, "    {}", plan.render_statement(self.syntax, "table"));
                }
                code.push_str("  });\n};\n\n");
                code.push_str("exports.down = function (knex) {\n");
                let _ = writeln!(code, "  return knex.schema.dropTableIfExists({quoted});");
                code.push_str("};\n");
            }
            SourceSyntax::Rust => {
                let _ = writeln!(code, "//! Migration: {name}");
                code.push('\n');
                code.push_str("use oxide_columns::prelude::*;\n\n");
                let _ = writeln!(
                    code,
                    "pub const TABLE: &str = {};",
                    self.syntax.quote(&table.table)
                );
                code.push('\n');
                code.push_str("pub fn up<T: TableBuilder>(table: &mut T) {\n");
                for plan in &plans {
                    let _ = writeln!(code, "    {}", plan.render_statement(self.syntax, "table"));
                }
                code.push_str("}\n\n");
                code.push_str("pub fn down<D: MigrationDialect>(dialect: &D) -> String {\n");
                code.push_str("    dialect.drop_table_sql(TABLE)\n");
                code.push_str("}\n");
            }
        }
        Ok(code)
    }

    /// Writes the migration for `table` into `dir` as `<name>.<ext>`.
    ///
    /// Creates the directory if needed and refuses to overwrite an existing
    /// file.
    pub fn write_to(&self, dir: &Path, name: &str, table: &TableDescriptor) -> Result<PathBuf> {
        let code = self.generate(name, table)?;
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{name}.{}", self.syntax.extension()));
        if path.exists() {
            return Err(ColumnError::MigrationExists(path));
        }
        fs::write(&path, code)?;
        info!("Created migration: {}", path.display());
        Ok(path)
    }
}
