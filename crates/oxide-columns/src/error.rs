//! Error types for column resolution.

use std::path::PathBuf;

use crate::replay::ParseError;

/// Errors that can occur while resolving a field into a column.
#[derive(Debug, thiserror::Error)]
pub enum ColumnError {
    /// The field's logical type matches none of the known resolvers.
    #[error("Unknown logical type '{0}' (expected number, string, date or boolean)")]
    UnknownType(String),

    /// A predicate reported a constraint whose value is absent.
    #[error("Constraint '{constraint}' is set but has no value")]
    MissingConstraint {
        /// Name of the constraint (e.g. "references").
        constraint: &'static str,
    },

    /// A constraint value has the wrong shape.
    #[error("Constraint '{constraint}' is invalid: {message}")]
    InvalidConstraint {
        /// Name of the constraint.
        constraint: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// Resolution of a single field failed.
    #[error("Field '{name}': {source}")]
    Field {
        /// The field (column) name.
        name: String,
        /// The underlying error.
        #[source]
        source: Box<ColumnError>,
    },

    /// Rendered column source could not be parsed back.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Migration file already exists.
    #[error("Migration file already exists: {0}")]
    MigrationExists(PathBuf),

    /// The highest migration number in a directory has no successor.
    #[error("No migration number follows {highest} in {}", .dir.display())]
    MigrationNumberExhausted {
        /// The migrations directory.
        dir: PathBuf,
        /// The highest number found.
        highest: u32,
    },

    /// IO error (writing migration files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Descriptor (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ColumnError {
    /// Wraps this error with the name of the field being resolved.
    #[must_use]
    pub fn in_field(self, name: impl Into<String>) -> Self {
        match self {
            already @ Self::Field { .. } => already,
            other => Self::Field {
                name: name.into(),
                source: Box::new(other),
            },
        }
    }
}

/// Result type for column resolution.
pub type Result<T> = std::result::Result<T, ColumnError>;
