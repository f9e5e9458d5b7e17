//! Source rendering of column plans.
//!
//! Produces the chained-call text that, placed after a table receiver in a
//! migration file, performs the same builder calls as
//! [`ColumnPlan::apply`](crate::plan::ColumnPlan).

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::plan::{ColumnPlan, ColumnType, DefaultValue, ForeignKeyAction, Modifier, TextKind};

/// Target language of rendered migration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SourceSyntax {
    /// This crate's [`TableBuilder`](crate::builder::TableBuilder) API.
    Rust,
    /// The knex.js schema builder.
    #[default]
    Knex,
}

impl SourceSyntax {
    /// Quotes a string literal.
    #[must_use]
    pub fn quote(self, value: &str) -> String {
        match self {
            Self::Rust => format!("{value:?}"),
            Self::Knex => {
                let mut out = String::with_capacity(value.len() + 2);
                out.push('\'');
                for ch in value.chars() {
                    match ch {
                        '\'' => out.push_str("\\'"),
                        '\\' => out.push_str("\\\\"),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\t' => out.push_str("\\t"),
                        c if c.is_control() || matches!(c, '\u{2028}' | '\u{2029}') => {
                            let _ = write!(out, "\\u{{{:x}}}", u32::from(c));
                        }
                        other => out.push(other),
                    }
                }
                out.push('\'');
                out
            }
        }
    }

    fn pick(self, rust: &'static str, knex: &'static str) -> &'static str {
        match self {
            Self::Rust => rust,
            Self::Knex => knex,
        }
    }

    fn text_kind(self, kind: TextKind) -> Option<String> {
        match (self, kind) {
            (Self::Knex, TextKind::Text) => None,
            (Self::Knex, kind) => Some(self.quote(kind.as_sql())),
            (Self::Rust, TextKind::Text) => Some("TextKind::Text".into()),
            (Self::Rust, TextKind::MediumText) => Some("TextKind::MediumText".into()),
            (Self::Rust, TextKind::LongText) => Some("TextKind::LongText".into()),
        }
    }

    fn action(self, action: ForeignKeyAction) -> String {
        match self {
            Self::Rust => format!("ForeignKeyAction::{}", action.variant_name()),
            Self::Knex => self.quote(action.as_sql()),
        }
    }

    fn default_value(self, value: &DefaultValue) -> String {
        match (self, value) {
            (Self::Rust, DefaultValue::Literal(v)) => {
                format!("DefaultValue::Literal({}.into())", self.quote(v))
            }
            (Self::Rust, DefaultValue::Null) => "DefaultValue::Null".into(),
            (Self::Rust, DefaultValue::Now) => "DefaultValue::Now".into(),
            (Self::Rust, DefaultValue::Raw(expr)) => {
                format!("DefaultValue::Raw({}.into())", self.quote(expr))
            }
            (Self::Knex, DefaultValue::Literal(v)) => self.quote(v),
            (Self::Knex, DefaultValue::Null) => "null".into(),
            (Self::Knex, DefaultValue::Now) => "knex.fn.now()".into(),
            (Self::Knex, DefaultValue::Raw(expr)) => format!("knex.raw({})", self.quote(expr)),
        }
    }
}

/// Appends `.method(arg, arg, ...)`.
fn call(out: &mut String, method: &str, args: &[String]) {
    let _ = write!(out, ".{method}({})", args.join(", "));
}

fn render_constructor(out: &mut String, syntax: SourceSyntax, plan: &ColumnPlan) {
    let name = syntax.quote(&plan.name);
    match &plan.column_type {
        ColumnType::SpecificType(sql_type) => call(
            out,
            syntax.pick("specific_type", "specificType"),
            &[name, syntax.quote(sql_type)],
        ),
        ColumnType::Float { precision, scale } => call(
            out,
            "float",
            &[name, precision.to_string(), scale.to_string()],
        ),
        ColumnType::String(length) => call(out, "string", &[name, length.to_string()]),
        ColumnType::Text(kind) => {
            let mut args = vec![name];
            args.extend(syntax.text_kind(*kind));
            call(out, "text", &args);
        }
        ColumnType::Enum(values) => {
            let quoted: Vec<String> = values.iter().map(|v| syntax.quote(v)).collect();
            let list = match syntax {
                SourceSyntax::Rust => format!("&[{}]", quoted.join(", ")),
                SourceSyntax::Knex => format!("[{}]", quoted.join(",")),
            };
            call(out, syntax.pick("enu", "enum"), &[name, list]);
        }
        ColumnType::Boolean => call(out, "boolean", &[name]),
        ColumnType::Timestamp => call(out, "timestamp", &[name]),
        ColumnType::DateTime => call(out, syntax.pick("date_time", "dateTime"), &[name]),
    }
}

fn render_modifier(out: &mut String, syntax: SourceSyntax, modifier: &Modifier) {
    match modifier {
        Modifier::Unique => call(out, "unique", &[]),
        Modifier::Primary => call(out, "primary", &[]),
        Modifier::References { table, column } => {
            call(out, "references", &[syntax.quote(column)]);
            call(out, syntax.pick("in_table", "inTable"), &[syntax.quote(table)]);
        }
        Modifier::DefaultTo(value) => call(
            out,
            syntax.pick("default_to", "defaultTo"),
            &[syntax.default_value(value)],
        ),
        Modifier::NotNullable => call(out, syntax.pick("not_nullable", "notNullable"), &[]),
        Modifier::OnDelete(action) => call(
            out,
            syntax.pick("on_delete", "onDelete"),
            &[syntax.action(*action)],
        ),
        Modifier::OnUpdate(action) => call(
            out,
            syntax.pick("on_update", "onUpdate"),
            &[syntax.action(*action)],
        ),
    }
}

impl ColumnPlan {
    /// Renders the plan as a chained-call expression starting with `.`.
    #[must_use]
    pub fn render(&self, syntax: SourceSyntax) -> String {
        let mut out = String::new();
        render_constructor(&mut out, syntax, self);
        for modifier in &self.modifiers {
            render_modifier(&mut out, syntax, modifier);
        }
        out
    }

    /// Renders the plan as a complete statement on `receiver`.
    #[must_use]
    pub fn render_statement(&self, syntax: SourceSyntax, receiver: &str) -> String {
        format!("{receiver}{};", self.render(syntax))
    }
}
