//! # Query Tokenizer
//!
//! Turns a raw query string into span-annotated [`Token`]s.
//!
//! Scanning is driven by an ordered table of rules. At each position the scanner skips
//! whitespace, then tries every rule against the remaining suffix and keeps the first
//! one that produces a token:
//!
//! | # | Rule               | Example              | Token kind            |
//! |---|--------------------|----------------------|-----------------------|
//! | 1 | quoted phrase      | `"null pointer"`     | `text`                |
//! | 2 | negated field      | `-is:ignored`        | `field` / `sort`      |
//! | 3 | field              | `count:>=10`         | `field` / `sort`      |
//! | 4 | `OR` keyword       | `OR `                | `operator`            |
//! | 5 | incomplete field   | `level:`             | `field` (empty value) |
//! | 6 | word               | `timeout`            | `text`                |
//!
//! Field rules only fire when the name resolves against the [`FieldSchema`] (or is the
//! `sort` keyword); anything else falls through to the word rule. If no rule matches the
//! scanner advances by one character, so every input terminates.
//!
//! Spans are byte offsets. Tokens never overlap and, together with the skipped
//! whitespace, cover the whole input.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::schema::{FieldSchema, Operator, SORT_KEYWORD};

/// Kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Field,
    Text,
    Operator,
    Sort,
}

/// A typed, span-located unit of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Canonical field name for `field` tokens, `sort` for sort tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    pub value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub negated: bool,
    /// Exact source text of the token.
    pub raw: String,
    pub start_index: usize,
    pub end_index: usize,
}

impl Token {
    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    /// True for `field` and `sort` tokens.
    #[inline]
    pub fn is_filter(&self) -> bool {
        matches!(self.kind, TokenKind::Field | TokenKind::Sort)
    }
}

/// Token produced by a rule before it is placed in the input.
struct Draft {
    kind: TokenKind,
    field: Option<String>,
    operator: Option<Operator>,
    value: String,
    negated: bool,
    len: usize,
}

impl Draft {
    fn text(value: &str, len: usize) -> Self {
        Self {
            kind: TokenKind::Text,
            field: None,
            operator: None,
            value: value.to_string(),
            negated: false,
            len,
        }
    }
}

type Build = fn(&Captures<'_>, &FieldSchema) -> Option<Draft>;

/// One entry of the scanner table: a pattern anchored at the current position and the
/// constructor that turns its captures into a token.
struct Rule {
    name: &'static str,
    pattern: &'static Lazy<Regex>,
    build: Build,
}

impl Rule {
    fn apply(&self, rest: &str, schema: &FieldSchema) -> Option<Draft> {
        let captures = self.pattern.captures(rest)?;
        (self.build)(&captures, schema).filter(|draft| draft.len > 0)
    }
}

static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^"([^"]*)"?"#).expect("valid quoted pattern"));
static NEGATED_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^-([A-Za-z_][A-Za-z0-9_]*):(>=|<=|!=|>|<|!|=)?("[^"]*"?|\S*)"#).expect("valid negated field pattern")
});
static FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^([A-Za-z_][A-Za-z0-9_]*):(>=|<=|!=|>|<|!|=)?("[^"]*"?|\S*)"#).expect("valid field pattern")
});
static OR_KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^OR\s").expect("valid OR pattern"));
static INCOMPLETE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?)([A-Za-z_][A-Za-z0-9_]*):(?:\s|$)").expect("valid incomplete field pattern"));
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+").expect("valid word pattern"));

static RULES: &[Rule] = &[
    Rule {
        name: "quoted",
        pattern: &QUOTED,
        build: build_quoted,
    },
    Rule {
        name: "negated_field",
        pattern: &NEGATED_FIELD,
        build: build_negated_field,
    },
    Rule {
        name: "field",
        pattern: &FIELD,
        build: build_field,
    },
    Rule {
        name: "or",
        pattern: &OR_KEYWORD,
        build: build_or,
    },
    Rule {
        name: "incomplete_field",
        pattern: &INCOMPLETE_FIELD,
        build: build_incomplete_field,
    },
    Rule {
        name: "word",
        pattern: &WORD,
        build: build_word,
    },
];

fn build_quoted(captures: &Captures<'_>, _schema: &FieldSchema) -> Option<Draft> {
    let whole = captures.get(0)?;
    let inner = captures.get(1).map_or("", |m| m.as_str());
    Some(Draft::text(inner, whole.len()))
}

fn build_negated_field(captures: &Captures<'_>, schema: &FieldSchema) -> Option<Draft> {
    build_filter(captures, schema, true)
}

fn build_field(captures: &Captures<'_>, schema: &FieldSchema) -> Option<Draft> {
    build_filter(captures, schema, false)
}

fn build_filter(captures: &Captures<'_>, schema: &FieldSchema, negated: bool) -> Option<Draft> {
    let whole = captures.get(0)?;
    let name = captures.get(1)?.as_str();
    let symbol = captures.get(2).map(|m| m.as_str());
    let value = captures.get(3).map_or("", |m| m.as_str());

    // `field:` followed by whitespace belongs to the incomplete-field rule
    if symbol.is_none() && value.is_empty() {
        return None;
    }

    let (kind, field) = resolve_name(name, schema)?;
    let operator = Operator::from_symbol(symbol.unwrap_or(""))?;
    Some(Draft {
        kind,
        field: Some(field),
        operator: Some(operator),
        value: unquote(value).to_string(),
        negated,
        len: whole.len(),
    })
}

fn build_or(_captures: &Captures<'_>, _schema: &FieldSchema) -> Option<Draft> {
    Some(Draft {
        kind: TokenKind::Operator,
        field: None,
        operator: None,
        value: "OR".to_string(),
        negated: false,
        len: 2,
    })
}

fn build_incomplete_field(captures: &Captures<'_>, schema: &FieldSchema) -> Option<Draft> {
    let negated = captures.get(1).is_some_and(|m| !m.as_str().is_empty());
    let name = captures.get(2)?;
    let (kind, field) = resolve_name(name.as_str(), schema)?;
    Some(Draft {
        kind,
        field: Some(field),
        operator: Some(Operator::Eq),
        value: String::new(),
        negated,
        // name + colon, plus the leading dash when negated
        len: name.end() + 1,
    })
}

fn build_word(captures: &Captures<'_>, _schema: &FieldSchema) -> Option<Draft> {
    let whole = captures.get(0)?;
    Some(Draft::text(whole.as_str(), whole.len()))
}

fn resolve_name(name: &str, schema: &FieldSchema) -> Option<(TokenKind, String)> {
    if FieldSchema::is_sort_keyword(name) {
        return Some((TokenKind::Sort, SORT_KEYWORD.to_string()));
    }
    schema
        .lookup(name)
        .map(|config| (TokenKind::Field, config.name.to_string()))
}

/// Strip one pair of surrounding quotes; an unterminated leading quote is dropped too.
fn unquote(value: &str) -> &str {
    match value.strip_prefix('"') {
        Some(inner) => inner.strip_suffix('"').unwrap_or(inner),
        None => value,
    }
}

/// Scanner bound to a field schema.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    schema: &'a FieldSchema,
}

impl<'a> Tokenizer<'a> {
    pub fn new(schema: &'a FieldSchema) -> Self {
        Self { schema }
    }

    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < input.len() {
            let rest = &input[pos..];
            let trimmed = rest.trim_start();
            pos += rest.len() - trimmed.len();
            if trimmed.is_empty() {
                break;
            }

            let matched = RULES
                .iter()
                .find_map(|rule| rule.apply(trimmed, self.schema).map(|draft| (rule.name, draft)));

            match matched {
                Some((rule, draft)) => {
                    let end = pos + draft.len;
                    log::trace!("rule {rule} matched {:?} at {pos}..{end}", &input[pos..end]);
                    tokens.push(Token {
                        kind: draft.kind,
                        field: draft.field,
                        operator: draft.operator,
                        value: draft.value,
                        negated: draft.negated,
                        raw: input[pos..end].to_string(),
                        start_index: pos,
                        end_index: end,
                    });
                    pos = end;
                }
                None => {
                    let skipped = trimmed.chars().next().map_or(1, char::len_utf8);
                    log::trace!("no rule matched at {pos}, skipping {skipped} byte(s)");
                    pos += skipped;
                }
            }
        }

        tokens
    }
}

/// Tokenize against the shared standard schema.
pub fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::new(FieldSchema::global()).tokenize(input)
}
