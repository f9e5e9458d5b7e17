//! Column modifiers.
//!
//! Appended in a fixed order regardless of the logical type: unique,
//! primary, foreign key, default, not-null, on-delete, on-update.

use crate::accessor::{Constraints, DefaultLiteral};
use crate::error::Result;
use crate::plan::{ColumnPlan, DefaultValue, ForeignKeyAction, Modifier};

/// Default literal that means "the current time" on date fields.
const NOW: &str = "now";

/// Appends every modifier the field asks for.
pub fn apply<F: Constraints + ?Sized>(plan: &mut ColumnPlan, field: &F) -> Result<()> {
    if field.unique() {
        plan.push(Modifier::Unique);
    }
    if field.primary_key() {
        plan.push(Modifier::Primary);
    }
    if field.foreign_key() {
        let (table, column) = field.foreign_key_target()?;
        plan.push(Modifier::References { table, column });
    }
    if field.default_value() {
        plan.push(Modifier::DefaultTo(default_value(field)?));
    }
    if field.required() {
        plan.push(Modifier::NotNullable);
    }
    if field.delete_cascade() {
        plan.push(Modifier::OnDelete(ForeignKeyAction::Cascade));
    }
    if field.update_cascade() {
        plan.push(Modifier::OnUpdate(ForeignKeyAction::Cascade));
    }
    Ok(())
}

fn default_value<F: Constraints + ?Sized>(field: &F) -> Result<DefaultValue> {
    Ok(match field.default_literal()? {
        DefaultLiteral::Null => DefaultValue::Null,
        DefaultLiteral::Value(value) if field.date() && value == NOW => {
            if field.date_unix() {
                DefaultValue::Now
            } else {
                DefaultValue::Raw(String::from("now()"))
            }
        }
        DefaultLiteral::Value(value) => DefaultValue::Literal(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ColumnError;
    use crate::field::FieldDescriptor;
    use crate::plan::ColumnType;

    fn modifiers(field: &FieldDescriptor) -> Result<Vec<Modifier>> {
        let mut plan = ColumnPlan::new("c", ColumnType::Boolean);
        apply(&mut plan, field)?;
        Ok(plan.modifiers)
    }

    #[test]
    fn test_fixed_order() {
        let field = FieldDescriptor::new("number")
            .flag("onUpdate", "cascade")
            .flag("onDelete", "cascade")
            .flag("required", true)
            .flag("default", 1)
            .flag("references", "users.id")
            .flag("primary", true)
            .flag("unique", true);

        assert_eq!(
            modifiers(&field).unwrap(),
            vec![
                Modifier::Unique,
                Modifier::Primary,
                Modifier::References {
                    table: "users".into(),
                    column: "id".into(),
                },
                Modifier::DefaultTo(DefaultValue::Literal("1".into())),
                Modifier::NotNullable,
                Modifier::OnDelete(ForeignKeyAction::Cascade),
                Modifier::OnUpdate(ForeignKeyAction::Cascade),
            ]
        );
    }

    #[test]
    fn test_no_modifiers() {
        assert!(modifiers(&FieldDescriptor::new("string")).unwrap().is_empty());
    }

    #[test]
    fn test_date_now_default() {
        let unix = FieldDescriptor::new("date")
            .flag("timestamp", "unix")
            .flag("default", "now");
        assert_eq!(
            modifiers(&unix).unwrap(),
            vec![Modifier::DefaultTo(DefaultValue::Now)]
        );

        let datetime = FieldDescriptor::new("date").flag("default", "now");
        assert_eq!(
            modifiers(&datetime).unwrap(),
            vec![Modifier::DefaultTo(DefaultValue::Raw("now()".into()))]
        );
    }

    #[test]
    fn test_now_is_literal_outside_dates() {
        let field = FieldDescriptor::new("string").flag("default", "now");
        assert_eq!(
            modifiers(&field).unwrap(),
            vec![Modifier::DefaultTo(DefaultValue::Literal("now".into()))]
        );
    }

    #[test]
    fn test_missing_foreign_key_target_fails() {
        let field = FieldDescriptor::new("number").flag("references", serde_json::Value::Null);
        assert!(matches!(
            modifiers(&field),
            Err(ColumnError::MissingConstraint {
                constraint: "references"
            })
        ));
    }
}
