//! oxide-columns CLI
//!
//! Resolves table descriptions into MySQL columns and migration files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_columns::prelude::*;
use oxide_columns::writer::next_migration_number;

/// Field constraints to MySQL columns and migration source.
#[derive(Parser)]
#[command(name = "oxide-columns")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Syntax of generated migration source.
    #[arg(short, long, env = "OXIDE_COLUMNS_SYNTAX", value_enum, default_value_t = Syntax::Knex)]
    syntax: Syntax,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Syntax {
    /// `oxide_columns::TableBuilder` calls.
    Rust,
    /// knex.js schema builder calls.
    Knex,
}

impl From<Syntax> for SourceSyntax {
    fn from(syntax: Syntax) -> Self {
        match syntax {
            Syntax::Rust => Self::Rust,
            Syntax::Knex => Self::Knex,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the migration text of every column.
    Column {
        /// Table description (JSON).
        file: PathBuf,
    },

    /// Print the MySQL CREATE TABLE statement.
    Sql {
        /// Table description (JSON).
        file: PathBuf,
    },

    /// Generate a migration file.
    #[command(name = "makemigration")]
    MakeMigration {
        /// Table description (JSON).
        file: PathBuf,

        /// Migration number (next free number in the output directory if not specified).
        #[arg(short, long)]
        number: Option<u32>,

        /// Migrations directory.
        #[arg(short, long, default_value = "migrations")]
        out: PathBuf,

        /// Print the migration without writing files (dry run).
        #[arg(long)]
        dry_run: bool,
    },
}

fn load(file: &Path) -> anyhow::Result<TableDescriptor> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    TableDescriptor::from_json(&json).with_context(|| format!("parsing {}", file.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let syntax = SourceSyntax::from(cli.syntax);
    let resolver = Resolver::mysql();

    match cli.command {
        Commands::Column { file } => {
            let table = load(&file)?;
            for plan in resolver.resolve_table(&table)? {
                println!("{}", plan.render_statement(syntax, "table"));
            }
        }

        Commands::Sql { file } => {
            let table = load(&file)?;
            let definition = resolver.build_table(&table)?;
            println!("{};", MysqlDialect::new().create_table_sql(&definition));
        }

        Commands::MakeMigration {
            file,
            number,
            out,
            dry_run,
        } => {
            let table = load(&file)?;
            let number = match number {
                Some(number) => number,
                None => next_migration_number(&out)?,
            };
            let name = generate_migration_name(number, &format!("create_{}", table.table));
            let writer = MigrationWriter::with_resolver(resolver, syntax);

            if dry_run {
                println!(
                    "Would create migration: {}",
                    out.join(format!("{name}.{}", syntax.extension())).display()
                );
                println!("\n{}", writer.generate(&name, &table)?);
            } else {
                let path = writer.write_to(&out, &name, &table)?;
                info!("{} columns written to {}", table.fields.len(), path.display());
            }
        }
    }

    Ok(())
}
