//! Date and boolean resolution.

use crate::accessor::FieldPredicates;
use crate::plan::ColumnType;

/// Resolves a `date` field: TIMESTAMP for unix time, DATETIME otherwise.
pub fn resolve_date<F: FieldPredicates + ?Sized>(field: &F) -> ColumnType {
    if field.date_unix() {
        ColumnType::Timestamp
    } else {
        ColumnType::DateTime
    }
}

/// Resolves a `boolean` field.
#[must_use]
pub fn resolve_boolean() -> ColumnType {
    ColumnType::Boolean
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDescriptor;

    #[test]
    fn test_date() {
        let field = FieldDescriptor::new("date");
        assert_eq!(resolve_date(&field), ColumnType::DateTime);

        let field = field.flag("timestamp", "unix");
        assert_eq!(resolve_date(&field), ColumnType::Timestamp);

        let field = FieldDescriptor::new("date").flag("timestamp", "javascript");
        assert_eq!(resolve_date(&field), ColumnType::DateTime);
    }
}
