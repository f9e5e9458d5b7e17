//! Parsing rendered column source back into plans.
//!
//! Accepts the text produced by [`ColumnPlan::render`] in either syntax, with
//! or without a leading receiver and trailing semicolon, and rebuilds the
//! [`ColumnPlan`] it describes. Used to check generated migration files
//! against the columns they are supposed to create.

use crate::plan::{ColumnPlan, ColumnType, DefaultValue, ForeignKeyAction, Modifier, TextKind};

/// A byte range in the parsed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A replay parse error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at position {}..{}", .span.start, .span.end)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

type ParseResult<T> = std::result::Result<T, ParseError>;

// =============================================================================
// Lexer
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    Str(String),
    Number(u64),
    Dot,
    PathSep,
    Comma,
    Amp,
    Semicolon,
    LParen,
    RParen,
    LBracket,
    RBracket,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    span: Span,
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }
            let start = self.pos;
            let Some(c) = self.advance() else {
                return Ok(tokens);
            };
            let kind = match c {
                '.' => TokenKind::Dot,
                ',' => TokenKind::Comma,
                '&' => TokenKind::Amp,
                ';' => TokenKind::Semicolon,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                ':' if self.peek() == Some(':') => {
                    self.advance();
                    TokenKind::PathSep
                }
                '\'' | '"' => TokenKind::Str(self.scan_string(c, start)?),
                c if c.is_ascii_digit() => {
                    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.advance();
                    }
                    let digits = &self.input[start..self.pos];
                    let value = digits.parse().map_err(|_| {
                        ParseError::new("Number out of range", Span::new(start, self.pos))
                    })?;
                    TokenKind::Number(value)
                }
                c if c.is_alphabetic() || c == '_' => {
                    while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                        self.advance();
                    }
                    TokenKind::Ident(self.input[start..self.pos].to_string())
                }
                other => {
                    return Err(ParseError::new(
                        format!("Unexpected character '{other}'"),
                        Span::new(start, self.pos),
                    ));
                }
            };
            tokens.push(Token {
                kind,
                span: Span::new(start, self.pos),
            });
        }
    }

    /// Scans a quoted string; the opening quote is already consumed.
    fn scan_string(&mut self, quote: char, start: usize) -> ParseResult<String> {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some(c) if c == quote => return Ok(value),
                Some('\\') => value.push(self.scan_escape(start)?),
                Some(c) if c.is_control() => {
                    return Err(ParseError::new(
                        "Unescaped control character in string literal",
                        Span::new(start, self.pos),
                    ));
                }
                Some(c) => value.push(c),
                None => {
                    return Err(ParseError::new(
                        "Unterminated string literal",
                        Span::new(start, self.pos),
                    ));
                }
            }
        }
    }

    fn scan_escape(&mut self, start: usize) -> ParseResult<char> {
        let invalid = |pos| ParseError::new("Invalid escape sequence", Span::new(start, pos));
        match self.advance() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('r') => Ok('\r'),
            Some('0') => Ok('\0'),
            Some(c @ ('\\' | '\'' | '"')) => Ok(c),
            Some('u') => {
                if self.advance() != Some('{') {
                    return Err(invalid(self.pos));
                }
                let digits_start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    self.advance();
                }
                let digits = &self.input[digits_start..self.pos];
                if self.advance() != Some('}') {
                    return Err(invalid(self.pos));
                }
                u32::from_str_radix(digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| invalid(self.pos))
            }
            _ => Err(invalid(self.pos)),
        }
    }
}

// =============================================================================
// Parser
// =============================================================================

/// A call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Arg {
    Str(String),
    Number(u64),
    List(Vec<String>),
    /// `a.b::c` or `a.b(args)`.
    Path {
        segments: Vec<String>,
        call: Option<Vec<Arg>>,
    },
}

/// A chained `.method(args)` call.
#[derive(Debug)]
struct Call {
    method: String,
    args: Vec<Arg>,
    span: Span,
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn peek_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map_or(Span::new(self.end, self.end), |t| t.span)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> ParseResult<Span> {
        let span = self.span();
        match self.next() {
            Some(token) if &token.kind == kind => Ok(token.span),
            Some(token) => Err(ParseError::new(
                format!("Expected {what}, found {:?}", token.kind),
                token.span,
            )),
            None => Err(ParseError::new(format!("Expected {what}, found end of input"), span)),
        }
    }

    fn ident(&mut self) -> ParseResult<String> {
        let span = self.span();
        match self.next() {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => Ok(name),
            _ => Err(ParseError::new("Expected identifier", span)),
        }
    }

    fn calls(&mut self) -> ParseResult<Vec<Call>> {
        if matches!(self.peek(), Some(TokenKind::Ident(_))) {
            self.pos += 1; // receiver
        }
        let mut calls = Vec::new();
        while self.peek() == Some(&TokenKind::Dot) {
            let start = self.span().start;
            self.pos += 1;
            let method = self.ident()?;
            let args = self.arg_list()?;
            let end = self.tokens[self.pos - 1].span.end;
            calls.push(Call {
                method,
                args,
                span: Span::new(start, end),
            });
        }
        if self.peek() == Some(&TokenKind::Semicolon) {
            self.pos += 1;
        }
        if let Some(token) = self.next() {
            return Err(ParseError::new(
                format!("Unexpected {:?} after column expression", token.kind),
                token.span,
            ));
        }
        if calls.is_empty() {
            return Err(ParseError::new("Expected a column constructor call", self.span()));
        }
        Ok(calls)
    }

    /// Parses `( arg, ... )`.
    fn arg_list(&mut self) -> ParseResult<Vec<Arg>> {
        self.expect(&TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        if self.peek() == Some(&TokenKind::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.arg()?);
            match self.peek() {
                Some(TokenKind::Comma) => self.pos += 1,
                _ => break,
            }
        }
        self.expect(&TokenKind::RParen, "')'")?;
        Ok(args)
    }

    fn arg(&mut self) -> ParseResult<Arg> {
        let span = self.span();
        match self.next().map(|t| t.kind) {
            Some(TokenKind::Str(value)) => {
                self.skip_into()?;
                Ok(Arg::Str(value))
            }
            Some(TokenKind::Number(value)) => Ok(Arg::Number(value)),
            Some(TokenKind::Amp) => {
                self.expect(&TokenKind::LBracket, "'['")?;
                self.list()
            }
            Some(TokenKind::LBracket) => self.list(),
            Some(TokenKind::Ident(first)) => {
                let mut segments = vec![first];
                while matches!(self.peek(), Some(TokenKind::Dot | TokenKind::PathSep)) {
                    self.pos += 1;
                    segments.push(self.ident()?);
                }
                let call = if self.peek() == Some(&TokenKind::LParen) {
                    Some(self.arg_list()?)
                } else {
                    None
                };
                Ok(Arg::Path { segments, call })
            }
            _ => Err(ParseError::new("Expected an argument", span)),
        }
    }

    /// Skips a `.into()` conversion after a string literal.
    fn skip_into(&mut self) -> ParseResult<()> {
        if self.peek() == Some(&TokenKind::Dot)
            && self.peek_at(1) == Some(&TokenKind::Ident("into".into()))
        {
            self.pos += 2;
            self.expect(&TokenKind::LParen, "'('")?;
            self.expect(&TokenKind::RParen, "')'")?;
        }
        Ok(())
    }

    /// Parses string items up to `]`; the `[` is already consumed.
    fn list(&mut self) -> ParseResult<Arg> {
        let mut items = Vec::new();
        loop {
            let span = self.span();
            match self.next().map(|t| t.kind) {
                Some(TokenKind::RBracket) => return Ok(Arg::List(items)),
                Some(TokenKind::Str(value)) => {
                    items.push(value);
                    match self.peek() {
                        Some(TokenKind::Comma) => self.pos += 1,
                        Some(TokenKind::RBracket) => {}
                        _ => return Err(ParseError::new("Expected ',' or ']'", self.span())),
                    }
                }
                _ => return Err(ParseError::new("Expected a string list item", span)),
            }
        }
    }
}

// =============================================================================
// Interpretation
// =============================================================================

/// Converts `camelCase` method names to `snake_case`.
fn normalize_method(method: &str) -> String {
    let mut out = String::with_capacity(method.len() + 4);
    for ch in method.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    if out == "enum" {
        out = String::from("enu");
    }
    out
}

fn path_is(arg: &Arg, expected: &[&str]) -> bool {
    matches!(
        arg,
        Arg::Path { segments, .. }
            if segments.iter().map(String::as_str).eq(expected.iter().copied())
    )
}

impl Call {
    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.span)
    }

    fn arity(&self, min: usize, max: usize) -> ParseResult<()> {
        if self.args.len() < min || self.args.len() > max {
            return Err(self.error(format!(
                "{}() takes {} argument(s), got {}",
                self.method,
                if min == max {
                    min.to_string()
                } else {
                    format!("{min}-{max}")
                },
                self.args.len()
            )));
        }
        Ok(())
    }

    fn str_arg(&self, index: usize) -> ParseResult<String> {
        match self.args.get(index) {
            Some(Arg::Str(value)) => Ok(value.clone()),
            _ => Err(self.error(format!(
                "{}(): argument {} must be a string",
                self.method,
                index + 1
            ))),
        }
    }

    fn number_arg(&self, index: usize) -> ParseResult<u64> {
        match self.args.get(index) {
            Some(Arg::Number(value)) => Ok(*value),
            _ => Err(self.error(format!(
                "{}(): argument {} must be a number",
                self.method,
                index + 1
            ))),
        }
    }

    fn u32_arg(&self, index: usize) -> ParseResult<u32> {
        u32::try_from(self.number_arg(index)?).map_err(|_| {
            self.error(format!(
                "{}(): argument {} is too large",
                self.method,
                index + 1
            ))
        })
    }

    fn text_kind_arg(&self, index: usize) -> ParseResult<TextKind> {
        let kind = match self.args.get(index) {
            None => Some(TextKind::Text),
            Some(Arg::Str(name)) => TextKind::from_sql(name),
            Some(Arg::Path {
                segments,
                call: None,
            }) if segments.len() == 2 && segments[0] == "TextKind" => match segments[1].as_str() {
                "Text" => Some(TextKind::Text),
                "MediumText" => Some(TextKind::MediumText),
                "LongText" => Some(TextKind::LongText),
                _ => None,
            },
            Some(_) => None,
        };
        kind.ok_or_else(|| self.error("text(): unknown text class"))
    }

    fn action_arg(&self) -> ParseResult<ForeignKeyAction> {
        let action = match self.args.first() {
            Some(Arg::Str(sql)) => ForeignKeyAction::from_sql(sql),
            Some(Arg::Path {
                segments,
                call: None,
            }) if segments.len() == 2 && segments[0] == "ForeignKeyAction" => {
                [
                    ForeignKeyAction::NoAction,
                    ForeignKeyAction::Restrict,
                    ForeignKeyAction::Cascade,
                    ForeignKeyAction::SetNull,
                    ForeignKeyAction::SetDefault,
                ]
                .into_iter()
                .find(|a| a.variant_name() == segments[1])
            }
            _ => None,
        };
        action.ok_or_else(|| {
            self.error(format!(
                "{}(): unknown referential action",
                self.method
            ))
        })
    }

    fn default_arg(&self) -> ParseResult<DefaultValue> {
        let Some(arg) = self.args.first() else {
            return Err(self.error("default_to(): missing value"));
        };
        let single_str = |call: &Option<Vec<Arg>>| match call.as_deref() {
            Some([Arg::Str(value)]) => Some(value.clone()),
            _ => None,
        };
        let value = match arg {
            Arg::Str(value) => Some(DefaultValue::Literal(value.clone())),
            Arg::Path { call: None, .. }
                if path_is(arg, &["null"]) || path_is(arg, &["DefaultValue", "Null"]) =>
            {
                Some(DefaultValue::Null)
            }
            Arg::Path { call: None, .. } if path_is(arg, &["DefaultValue", "Now"]) => {
                Some(DefaultValue::Now)
            }
            Arg::Path {
                call: Some(args), ..
            } if args.is_empty() && path_is(arg, &["knex", "fn", "now"]) => Some(DefaultValue::Now),
            Arg::Path { call, .. }
                if path_is(arg, &["knex", "raw"]) || path_is(arg, &["DefaultValue", "Raw"]) =>
            {
                single_str(call).map(DefaultValue::Raw)
            }
            Arg::Path { call, .. } if path_is(arg, &["DefaultValue", "Literal"]) => {
                single_str(call).map(DefaultValue::Literal)
            }
            _ => None,
        };
        value.ok_or_else(|| self.error("default_to(): unsupported default expression"))
    }

    fn column_type(&self) -> ParseResult<(String, ColumnType)> {
        let method = normalize_method(&self.method);
        let column_type = match method.as_str() {
            "specific_type" => {
                self.arity(2, 2)?;
                ColumnType::SpecificType(self.str_arg(1)?)
            }
            "float" => {
                self.arity(3, 3)?;
                ColumnType::Float {
                    precision: self.u32_arg(1)?,
                    scale: self.u32_arg(2)?,
                }
            }
            "string" => {
                self.arity(2, 2)?;
                ColumnType::String(self.number_arg(1)?)
            }
            "text" => {
                self.arity(1, 2)?;
                ColumnType::Text(self.text_kind_arg(1)?)
            }
            "enu" => {
                self.arity(2, 2)?;
                match &self.args[1] {
                    Arg::List(values) => ColumnType::Enum(values.clone()),
                    _ => return Err(self.error("enum(): values must be a list of strings")),
                }
            }
            "boolean" => {
                self.arity(1, 1)?;
                ColumnType::Boolean
            }
            "timestamp" => {
                self.arity(1, 1)?;
                ColumnType::Timestamp
            }
            "date_time" => {
                self.arity(1, 1)?;
                ColumnType::DateTime
            }
            _ => {
                return Err(self.error(format!("'{}' is not a column constructor", self.method)));
            }
        };
        Ok((self.str_arg(0)?, column_type))
    }
}

/// Parses rendered column source into the plan it describes.
///
/// # Errors
///
/// Returns a [`ParseError`] pointing at the offending span when the text is
/// not a single column expression.
pub fn parse_column(source: &str) -> ParseResult<ColumnPlan> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: source.len(),
    };
    let calls = parser.calls()?;

    let (name, column_type) = calls[0].column_type()?;
    let mut plan = ColumnPlan::new(name, column_type);
    let mut pending_reference: Option<(String, &Call)> = None;

    for call in &calls[1..] {
        let method = normalize_method(&call.method);
        if method != "in_table" {
            if let Some((target, references)) = pending_reference.take() {
                plan.push(split_reference(&target, references)?);
            }
        }
        match method.as_str() {
            "unique" => {
                call.arity(0, 0)?;
                plan.push(Modifier::Unique);
            }
            "primary" => {
                call.arity(0, 0)?;
                plan.push(Modifier::Primary);
            }
            "references" => {
                call.arity(1, 1)?;
                pending_reference = Some((call.str_arg(0)?, call));
            }
            "in_table" => {
                call.arity(1, 1)?;
                let Some((column, _)) = pending_reference.take() else {
                    return Err(call.error("inTable() must follow references()"));
                };
                plan.push(Modifier::References {
                    table: call.str_arg(0)?,
                    column,
                });
            }
            "default_to" => {
                call.arity(1, 1)?;
                plan.push(Modifier::DefaultTo(call.default_arg()?));
            }
            "not_nullable" => {
                call.arity(0, 0)?;
                plan.push(Modifier::NotNullable);
            }
            "on_delete" => {
                call.arity(1, 1)?;
                plan.push(Modifier::OnDelete(call.action_arg()?));
            }
            "on_update" => {
                call.arity(1, 1)?;
                plan.push(Modifier::OnUpdate(call.action_arg()?));
            }
            _ => return Err(call.error(format!("Unknown column modifier '{}'", call.method))),
        }
    }
    if let Some((target, references)) = pending_reference {
        plan.push(split_reference(&target, references)?);
    }
    Ok(plan)
}

/// Handles the `references('table.column')` shorthand.
fn split_reference(target: &str, call: &Call) -> ParseResult<Modifier> {
    match target.split_once('.') {
        Some((table, column)) => Ok(Modifier::References {
            table: table.to_string(),
            column: column.to_string(),
        }),
        None => Err(call.error("references() without inTable() needs a 'table.column' target")),
    }
}
