//! # Query Parser
//!
//! Turns a query string into a [`ParsedQuery`]: structured filters for the search API,
//! an optional sort, the free-text remainder, and every problem found along the way.
//!
//! Parsing never fails. A malformed token adds a [`ParseError`] with its span and the
//! remaining tokens are still processed, so a UI can apply the valid filters immediately
//! while underlining the bad ones.
//!
//! Current semantics worth knowing:
//!
//! - All filters are ANDed. `OR` is tokenized but has no effect yet.
//! - Negated filters (`-is:ignored`, `is:!ignored`) are validated but not applied; there
//!   is no exclusion filter in the payload.
//! - `users:N` is approximated by the open range `(N-1, N+1)`.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{ParseError, ParseErrorKind, QueryError};
use crate::filters::{Clause, SearchFilters, SortConfig, SortDirection, normalize_field};
use crate::schema::{FieldSchema, Operator, SORTABLE_FIELDS};
use crate::tokenizer::{Token, TokenKind, Tokenizer};

/// Free-text words shaped like a field filter (`name:value`, `-name:value`).
static FIELD_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?([A-Za-z_][A-Za-z0-9_]*):").expect("valid field-like pattern"));

/// Result of parsing one query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuery {
    pub tokens: Vec<Token>,
    /// Plain words, quoted phrases and text-field values, space-joined in query order.
    pub free_text: String,
    pub filters: SearchFilters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortConfig>,
    pub errors: Vec<ParseError>,
}

impl ParsedQuery {
    #[inline]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Strict view: `Err` if any token was rejected.
    pub fn ensure_valid(&self) -> Result<(), QueryError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(QueryError::new(self.errors.iter().cloned()))
        }
    }

    /// True when the query mentions `field` (canonical name) as a filter, negated or not.
    pub fn mentions_field(&self, field: &str) -> bool {
        self.tokens
            .iter()
            .any(|token| token.is_filter() && token.field.as_deref() == Some(field))
    }
}

/// Parser bound to a schema and a reference time for relative dates.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    schema: &'a FieldSchema,
    now: DateTime<Utc>,
}

impl<'a> Parser<'a> {
    pub fn new(schema: &'a FieldSchema) -> Self {
        Self {
            schema,
            now: Utc::now(),
        }
    }

    /// Pin the clock used for `today`, `7d` and friends.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn parse(&self, query: &str) -> ParsedQuery {
        let tokens = Tokenizer::new(self.schema).tokenize(query);
        let mut filters = SearchFilters::default();
        let mut sort = None;
        let mut errors = Vec::new();
        let mut words: Vec<String> = Vec::new();

        for token in &tokens {
            match token.kind {
                TokenKind::Text => match self.check_field_like(token) {
                    Some(error) => errors.push(error),
                    None if !token.value.is_empty() => words.push(token.value.clone()),
                    None => {}
                },
                TokenKind::Operator => {
                    log::debug!("operator {} at {}..{} has no effect", token.value, token.start_index, token.end_index);
                }
                TokenKind::Sort => match parse_sort(token) {
                    Ok(Some(config)) => sort = Some(config),
                    Ok(None) => {}
                    Err(kind) => errors.push(ParseError::at(token, kind)),
                },
                TokenKind::Field => {
                    let Some(config) = token.field.as_deref().and_then(|name| self.schema.lookup(name)) else {
                        continue;
                    };
                    match normalize_field(config, token, self.now) {
                        Ok(Some(_)) if is_negation(token) => {
                            log::debug!("negated filter {} is not applied", token.raw);
                        }
                        Ok(Some(Clause::Text(value))) => words.push(value),
                        Ok(Some(clause)) => filters.apply(clause),
                        Ok(None) => {}
                        Err(kind) => errors.push(ParseError::at(token, kind)),
                    }
                }
            }
        }

        let free_text = words.join(" ");
        if !free_text.is_empty() {
            filters.text = Some(free_text.clone());
        }

        ParsedQuery {
            tokens,
            free_text,
            filters,
            sort,
            errors,
        }
    }

    /// Unquoted words that look like `name:value` with an unknown `name`.
    fn check_field_like(&self, token: &Token) -> Option<ParseError> {
        if token.raw.starts_with('"') {
            return None;
        }
        let captures = FIELD_LIKE.captures(&token.raw)?;
        let name = &captures[1];
        if FieldSchema::is_sort_keyword(name) || self.schema.lookup(name).is_some() {
            return None;
        }
        Some(ParseError::at(
            token,
            ParseErrorKind::UnknownField {
                field: name.to_string(),
            },
        ))
    }
}

fn is_negation(token: &Token) -> bool {
    token.negated || token.operator == Some(Operator::Ne)
}

/// `count`, `count:asc`, `last_seen:desc`. Empty values mean the user is still typing.
fn parse_sort(token: &Token) -> Result<Option<SortConfig>, ParseErrorKind> {
    let value = token.value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let (field, direction) = match value.split_once(':') {
        Some((field, direction)) => (field, direction),
        None => (value, ""),
    };
    let field = field.to_ascii_lowercase();
    if !FieldSchema::is_sortable(&field) {
        return Err(ParseErrorKind::InvalidSortField {
            field,
            allowed: SORTABLE_FIELDS.iter().map(|f| f.to_string()).collect(),
        });
    }
    let direction = if direction.eq_ignore_ascii_case("asc") {
        SortDirection::Asc
    } else {
        SortDirection::Desc
    };
    Ok(Some(SortConfig { field, direction }))
}

/// Parse against the shared standard schema, with the current time for relative dates.
pub fn parse_query(query: &str) -> ParsedQuery {
    Parser::new(FieldSchema::global()).parse(query)
}
