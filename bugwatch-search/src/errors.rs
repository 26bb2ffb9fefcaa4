use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tokenizer::Token;

/// Reason a token could not be turned into a filter.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseErrorKind {
    /// `name:value` where `name` is neither a field nor an alias.
    #[error("unknown field \"{field}\"")]
    UnknownField { field: String },

    #[error("invalid value \"{value}\" for {field}; expected one of: {}", .allowed.join(", "))]
    InvalidEnumValue {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("invalid number \"{value}\" for {field}")]
    InvalidNumber { field: String, value: String },

    #[error("{field} must not be negative (got {value})")]
    NegativeNumberRejected { field: String, value: String },

    #[error("invalid date \"{value}\" for {field}")]
    InvalidDate { field: String, value: String },

    #[error("cannot sort by \"{field}\"; expected one of: {}", .allowed.join(", "))]
    InvalidSortField { field: String, allowed: Vec<String> },

    /// Operator outside the field's operator list, e.g. `users:>=5`.
    #[error("operator {operator} is not supported for {field}")]
    UnsupportedOperator { field: String, operator: String },
}

/// Non-fatal problem attached to the span of the token that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub start_index: usize,
    pub end_index: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Range<usize>) -> Self {
        Self {
            message: kind.to_string(),
            kind,
            start_index: span.start,
            end_index: span.end,
        }
    }

    /// Convenience helper for an error covering a whole token.
    pub fn at(token: &Token, kind: ParseErrorKind) -> Self {
        Self::new(kind, token.span())
    }

    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.start_index..self.end_index
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at {}..{})", self.message, self.start_index, self.end_index)
    }
}

/// All problems found in a query, for callers that treat any of them as fatal.
#[derive(Debug, Clone, Error)]
#[error("query has {} error(s): {}", .errors.len(), summarize(.errors))]
pub struct QueryError {
    pub errors: Vec<ParseError>,
}

impl QueryError {
    pub fn new<I>(errors: I) -> Self
    where
        I: IntoIterator<Item = ParseError>,
    {
        Self {
            errors: errors.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

fn summarize(errors: &[ParseError]) -> String {
    errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_come_from_the_kind() {
        let error = ParseError::new(
            ParseErrorKind::InvalidEnumValue {
                field: "level".to_string(),
                value: "loud".to_string(),
                allowed: vec!["error".to_string(), "info".to_string()],
            },
            3..13,
        );
        assert_eq!(error.message, "invalid value \"loud\" for level; expected one of: error, info");
        assert_eq!(error.span(), 3..13);
        assert_eq!(error.to_string(), format!("{} (at 3..13)", error.message));
    }

    #[test]
    fn query_error_summarizes_all_messages() {
        let err = QueryError::new([
            ParseError::new(
                ParseErrorKind::UnknownField {
                    field: "bogus".to_string(),
                },
                0..7,
            ),
            ParseError::new(
                ParseErrorKind::InvalidNumber {
                    field: "count".to_string(),
                    value: "many".to_string(),
                },
                8..18,
            ),
        ]);
        assert!(!err.is_empty());
        assert_eq!(
            err.to_string(),
            "query has 2 error(s): unknown field \"bogus\"; invalid number \"many\" for count"
        );
    }
}
