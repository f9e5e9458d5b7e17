//! String type resolution.

use crate::accessor::{Constraints, StringLength};
use crate::catalog::TypeCatalog;
use crate::error::{ColumnError, Result};
use crate::plan::{ColumnType, TextKind};

/// Resolves the storage type of a `string` field.
pub fn resolve<F: Constraints + ?Sized>(catalog: &TypeCatalog, field: &F) -> Result<ColumnType> {
    if field.enum_flag() {
        return Ok(ColumnType::Enum(field.allow()));
    }
    if field.max_set() {
        if let Some(max) = field.max()? {
            return Ok(class_for_length(catalog, max_length(max)?));
        }
    }
    Ok(match field.string_length_by_type()? {
        StringLength::Unbounded => TextKind::from_sql(catalog.text).map_or_else(
            || ColumnType::SpecificType(catalog.text.to_string()),
            ColumnType::Text,
        ),
        StringLength::Bounded(length) => class_for_length(catalog, length),
    })
}

/// A string `max` rule must be a whole, non-negative number of characters.
#[allow(clippy::float_cmp, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn max_length(max: f64) -> Result<u64> {
    if max.is_finite() && max >= 0.0 && max.fract() == 0.0 {
        Ok(max as u64)
    } else {
        Err(ColumnError::InvalidConstraint {
            constraint: "max",
            message: format!("expected a non-negative integer length, got {max}"),
        })
    }
}

/// Maps a maximum length onto the narrowest string class.
///
/// Lengths within the bounded character class keep their exact length.
/// Longer ones take the first text class that holds them, clamped to the
/// largest.
#[must_use]
pub fn class_for_length(catalog: &TypeCatalog, length: u64) -> ColumnType {
    let bounded = catalog.bounded_string();
    if length <= bounded.max_length {
        return ColumnType::String(length);
    }
    let class = catalog.strings[1..]
        .iter()
        .find(|c| c.max_length >= length)
        .or_else(|| catalog.strings.last())
        .unwrap_or(bounded);
    TextKind::from_sql(class.name).map_or_else(
        || ColumnType::SpecificType(class.name.to_string()),
        ColumnType::Text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDescriptor;

    fn resolve_field(field: &FieldDescriptor) -> ColumnType {
        resolve(&TypeCatalog::MYSQL, field).unwrap()
    }

    #[test]
    fn test_enum_keeps_order() {
        let field = FieldDescriptor::new("string")
            .flag("enum", true)
            .allow_values(["a", "b", "c"])
            .rule("max", 1000);
        assert_eq!(
            resolve_field(&field),
            ColumnType::Enum(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn test_max_set() {
        let field = FieldDescriptor::new("string").rule("max", 40);
        assert_eq!(resolve_field(&field), ColumnType::String(40));

        let field = FieldDescriptor::new("string").rule("max", 300);
        assert_eq!(resolve_field(&field), ColumnType::Text(TextKind::MediumText));

        let field = FieldDescriptor::new("string").rule("max", 20_000_000);
        assert_eq!(resolve_field(&field), ColumnType::Text(TextKind::LongText));
    }

    #[test]
    fn test_malformed_length_rules_fail() {
        for field in [
            FieldDescriptor::new("string").rule("max", "300"),
            FieldDescriptor::new("string").rule("max", -1),
            FieldDescriptor::new("string").rule("max", 12.5),
            FieldDescriptor::new("string").rule("length", "long"),
        ] {
            let err = resolve(&TypeCatalog::MYSQL, &field).unwrap_err();
            assert!(
                matches!(err, ColumnError::InvalidConstraint { .. }),
                "{field:?}: {err}"
            );
        }
    }

    #[test]
    fn test_max_wins_over_format() {
        let field = FieldDescriptor::new("string")
            .rule("email", true)
            .rule("max", 64);
        assert_eq!(resolve_field(&field), ColumnType::String(64));
    }

    #[test]
    fn test_length_by_type() {
        let field = FieldDescriptor::new("string");
        assert_eq!(resolve_field(&field), ColumnType::String(255));

        let field = FieldDescriptor::new("string").rule("uri", true);
        assert_eq!(resolve_field(&field), ColumnType::Text(TextKind::MediumText));

        let field = FieldDescriptor::new("string").flag("text", true);
        assert_eq!(resolve_field(&field), ColumnType::Text(TextKind::Text));
    }

    #[test]
    fn test_threshold_boundaries_are_inclusive() {
        let catalog = TypeCatalog::MYSQL;
        assert_eq!(class_for_length(&catalog, 255), ColumnType::String(255));
        assert_eq!(
            class_for_length(&catalog, 256),
            ColumnType::Text(TextKind::MediumText)
        );
        assert_eq!(
            class_for_length(&catalog, 16_777_215),
            ColumnType::Text(TextKind::MediumText)
        );
        assert_eq!(
            class_for_length(&catalog, 16_777_216),
            ColumnType::Text(TextKind::LongText)
        );
        assert_eq!(
            class_for_length(&catalog, u64::MAX),
            ColumnType::Text(TextKind::LongText)
        );
    }

    #[test]
    fn test_chosen_class_holds_length() {
        let catalog = TypeCatalog::MYSQL;
        for length in [0, 1, 254, 255, 256, 65_535, 16_777_215, 16_777_216, 4_294_967_295] {
            let capacity = match class_for_length(&catalog, length) {
                ColumnType::String(len) => len,
                ColumnType::Text(kind) => catalog
                    .strings
                    .iter()
                    .find(|c| c.name == kind.as_sql())
                    .map(|c| c.max_length)
                    .unwrap(),
                other => panic!("unexpected {other:?}"),
            };
            assert!(capacity >= length, "{length} does not fit {capacity}");
        }
    }
}
