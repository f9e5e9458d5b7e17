//! End-to-end resolution of field descriptions.

mod common;

use common::*;
use oxide_columns::prelude::*;
use serde_json::json;

#[test]
fn test_min_zero_max_300_is_two_byte_unsigned() {
    let plan = resolve("age", json!({ "type": "number", "rules": { "min": 0, "max": 300 } }));
    assert_eq!(
        plan.column_type,
        ColumnType::SpecificType("smallint unsigned".into())
    );
    assert_eq!(plan.render(SourceSyntax::Knex), ".specificType('age', 'smallint unsigned')");
}

#[test]
fn test_large_negative_greater_walks_by_maximum() {
    // The default maximum outweighs |greater|, so int is chosen by its max.
    let plan = resolve("delta", json!({ "type": "number", "rules": { "greater": -5_000_000 } }));
    assert_eq!(plan.column_type, ColumnType::SpecificType("int".into()));
}

#[test]
fn test_min_biggest_walks_by_minimum() {
    let plan = resolve(
        "offset",
        json!({ "type": "number", "rules": { "min": -40_000, "max": 10 } }),
    );
    assert_eq!(plan.column_type, ColumnType::SpecificType("mediumint".into()));
}

#[test]
fn test_zero_bounds_are_honoured() {
    let plan = resolve(
        "n",
        json!({
            "type": "number",
            "rules": { "min": 0, "greater": -1_000_000, "max": 0, "less": 9_000_000 }
        }),
    );
    assert_eq!(
        plan.column_type,
        ColumnType::SpecificType("tinyint unsigned".into())
    );
}

#[test]
fn test_out_of_range_falls_back_to_double() {
    let plan = resolve("huge", json!({ "type": "number", "rules": { "min": 0, "max": 1e30 } }));
    assert_eq!(
        plan.column_type,
        ColumnType::SpecificType("double unsigned".into())
    );
}

#[test]
fn test_float_and_port() {
    let plan = resolve("price", json!({ "type": "number", "flags": { "float": true } }));
    assert_eq!(
        plan.column_type,
        ColumnType::Float {
            precision: 8,
            scale: 2
        }
    );

    let plan = resolve("port", json!({ "type": "number", "rules": { "port": true } }));
    assert_eq!(
        plan.column_type,
        ColumnType::SpecificType("smallint unsigned".into())
    );
}

#[test]
fn test_string_max_300_is_first_text_class() {
    let plan = resolve("summary", json!({ "type": "string", "rules": { "max": 300 } }));
    assert_eq!(plan.column_type, ColumnType::Text(TextKind::MediumText));
    assert_eq!(plan.render(SourceSyntax::Knex), ".text('summary', 'mediumtext')");
}

#[test]
fn test_string_formats() {
    let cases = [
        (json!({ "email": true }), 254),
        (json!({ "uri": true }), 2083),
        (json!({ "uuid": true }), 36),
        (json!({ "ip": true }), 45),
        (json!({ "length": 12 }), 12),
        (json!({}), 255),
    ];
    for (rules, expected) in cases {
        let plan = resolve("s", json!({ "type": "string", "rules": rules.clone() }));
        let expected = if expected <= 255 {
            ColumnType::String(expected)
        } else {
            ColumnType::Text(TextKind::MediumText)
        };
        assert_eq!(plan.column_type, expected, "{rules}");
    }
}

#[test]
fn test_enum_preserves_order_and_quotes_each_value() {
    let plan = resolve(
        "grade",
        json!({ "type": "string", "flags": { "enum": true }, "allow": ["a", "b", "c"] }),
    );
    assert_eq!(
        plan.column_type,
        ColumnType::Enum(vec!["a".into(), "b".into(), "c".into()])
    );
    assert_eq!(plan.render(SourceSyntax::Knex), ".enum('grade', ['a','b','c'])");
}

#[test]
fn test_boolean_ignores_rules() {
    let plan = resolve(
        "flag",
        json!({ "type": "boolean", "rules": { "min": 3, "max": 99999, "email": true } }),
    );
    assert_eq!(plan.column_type, ColumnType::Boolean);
}

#[test]
fn test_foreign_key_with_cascades() {
    let plan = resolve(
        "owner_id",
        json!({
            "type": "number",
            "flags": { "references": { "table": "users", "column": "id" }, "onDelete": "cascade" },
            "rules": { "min": 1 }
        }),
    );
    assert_eq!(
        plan.render(SourceSyntax::Knex),
        concat!(
            ".specificType('owner_id', 'int unsigned')",
            ".references('id').inTable('users').onDelete('CASCADE')",
        )
    );
}

#[test]
fn test_errors_name_the_field() {
    let err = resolve_err("meta", json!({ "type": "object" }));
    assert_eq!(
        err.to_string(),
        "Field 'meta': Unknown logical type 'object' (expected number, string, date or boolean)"
    );

    let err = resolve_err(
        "owner",
        json!({ "type": "number", "flags": { "references": null } }),
    );
    assert!(err.to_string().contains("'references'"), "{err}");

    let err = resolve_err("tags", json!({ "type": "string", "flags": { "default": ["a"] } }));
    assert!(err.to_string().contains("'default'"), "{err}");
}

#[test]
fn test_malformed_rule_values_fail_loudly() {
    for precision in [json!("high"), json!(-3), json!(4.5), json!(0)] {
        let err = resolve_err(
            "price",
            json!({ "type": "number", "rules": { "precision": precision.clone() } }),
        );
        assert!(
            err.to_string()
                .starts_with("Field 'price': Constraint 'precision' is invalid"),
            "{precision}: {err}"
        );
    }

    let err = resolve_err("bio", json!({ "type": "string", "rules": { "max": "300" } }));
    assert!(err.to_string().contains("'max'"), "{err}");

    let err = resolve_err("code", json!({ "type": "string", "rules": { "length": 4.5 } }));
    assert!(err.to_string().contains("'length'"), "{err}");

    let err = resolve_err("age", json!({ "type": "number", "rules": { "min": "0" } }));
    assert!(err.to_string().contains("'min'"), "{err}");
}

#[test]
fn test_blog_posts_table() {
    let plans = Resolver::mysql().resolve_table(&blog_posts()).unwrap();
    let text: Vec<String> = plans
        .iter()
        .map(|p| p.render_statement(SourceSyntax::Knex, "table"))
        .collect();
    assert_eq!(
        text,
        vec![
            "table.specificType('id', 'int unsigned').primary();",
            "table.specificType('author_id', 'int unsigned').references('id').inTable('users')\
             .notNullable().onDelete('CASCADE').onUpdate('CASCADE');",
            "table.string('slug', 120).unique().notNullable();",
            "table.string('title', 255).defaultTo('Untitled');",
            "table.text('body');",
            "table.enum('state', ['draft','published','it\\'s archived']).defaultTo('draft');",
            "table.float('rating', 4, 2);",
            "table.specificType('score', 'double').defaultTo('0');",
            "table.specificType('port', 'smallint unsigned');",
            "table.specificType('offset', 'mediumint');",
            "table.boolean('published').defaultTo('false').notNullable();",
            "table.timestamp('created_at').defaultTo(knex.fn.now());",
            "table.dateTime('seen_at').defaultTo(knex.raw('now()'));",
            "table.dateTime('deleted_at').defaultTo(null);",
        ]
    );
}
