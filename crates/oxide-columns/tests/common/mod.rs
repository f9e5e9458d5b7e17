#![allow(dead_code)]

use oxide_columns::prelude::*;
use serde_json::Value;

pub fn field(json: Value) -> FieldDescriptor {
    serde_json::from_value(json).unwrap_or_else(|e| panic!("Invalid field description: {e}"))
}

pub fn resolve(name: &str, json: Value) -> ColumnPlan {
    Resolver::mysql()
        .resolve(name, &field(json))
        .unwrap_or_else(|e| panic!("Failed to resolve {name}: {e}"))
}

pub fn resolve_err(name: &str, json: Value) -> ColumnError {
    Resolver::mysql()
        .resolve(name, &field(json))
        .expect_err(&format!("Expected resolution error for: {name}"))
}

pub fn table(json: Value) -> TableDescriptor {
    serde_json::from_value(json).unwrap_or_else(|e| panic!("Invalid table description: {e}"))
}

/// A table exercising every resolver and modifier.
pub fn blog_posts() -> TableDescriptor {
    table(serde_json::json!({
        "table": "posts",
        "fields": [
            { "name": "id", "type": "number", "flags": { "primary": true },
              "rules": { "min": 1, "max": 16000000 } },
            { "name": "author_id", "type": "number",
              "flags": { "references": "users.id", "required": true,
                         "onDelete": "cascade", "onUpdate": "CASCADE" },
              "rules": { "min": 1, "max": 16000000 } },
            { "name": "slug", "type": "string", "flags": { "unique": true, "required": true },
              "rules": { "max": 120 } },
            { "name": "title", "type": "string", "flags": { "default": "Untitled" } },
            { "name": "body", "type": "string", "flags": { "text": true } },
            { "name": "state", "type": "string", "flags": { "enum": true, "default": "draft" },
              "allow": ["draft", "published", "it's archived"] },
            { "name": "rating", "type": "number", "flags": { "float": true },
              "rules": { "precision": 4 } },
            { "name": "score", "type": "number", "flags": { "double": true, "default": 0 } },
            { "name": "port", "type": "number", "rules": { "port": true } },
            { "name": "offset", "type": "number", "rules": { "min": -40000, "max": 10 } },
            { "name": "published", "type": "boolean",
              "flags": { "default": false, "required": true } },
            { "name": "created_at", "type": "date",
              "flags": { "timestamp": "unix", "default": "now" } },
            { "name": "seen_at", "type": "date", "flags": { "default": "now" } },
            { "name": "deleted_at", "type": "date", "flags": { "default": null } }
        ]
    }))
}

/// Applies a plan to a fresh table and returns the recorded column.
pub fn live(plan: &ColumnPlan) -> ColumnDefinition {
    let mut table = TableDefinition::new("t");
    plan.apply(&mut table);
    table.columns.remove(0)
}

/// Checks that the rendered text of `plan`, read back, drives the live
/// builder to exactly the same column in both syntaxes.
pub fn assert_mirrors(plan: &ColumnPlan) {
    let expected = live(plan);
    for syntax in [SourceSyntax::Knex, SourceSyntax::Rust] {
        let text = plan.render_statement(syntax, "table");
        let replayed = parse_column(&text)
            .unwrap_or_else(|e| panic!("Failed to parse: {text}\nError: {e}"));
        assert_eq!(&replayed, plan, "Replay differs for: {text}");
        assert_eq!(live(&replayed), expected, "Live column differs for: {text}");
    }
}
