//! Per-type normalizers for field tokens.
//!
//! Each normalizer validates a token against its [`FieldConfig`] and returns a
//! [`Clause`] describing the filter update, without touching any filter state. The
//! parser decides whether to apply it (negated tokens are validated but not applied).

use chrono::{DateTime, Duration, Utc};

use crate::dates::{is_representable, resolve_date};
use crate::errors::ParseErrorKind;
use crate::schema::{FieldConfig, FieldType, Operator};
use crate::tokenizer::Token;

/// A validated filter update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Enum {
        field: &'static str,
        value: String,
    },
    Number {
        field: &'static str,
        operator: Operator,
        value: i64,
    },
    Date {
        field: &'static str,
        operator: Operator,
        at: DateTime<Utc>,
    },
    /// Text fields search the same free-text pool as plain words.
    Text(String),
}

/// Normalize a field token. Returns `Ok(None)` for an empty value (the user is still
/// typing), which is neither an error nor a filter.
pub fn normalize_field(
    config: &FieldConfig,
    token: &Token,
    now: DateTime<Utc>,
) -> Result<Option<Clause>, ParseErrorKind> {
    let value = token.value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let operator = token.operator.unwrap_or_default();
    if !config.allows(operator) {
        return Err(ParseErrorKind::UnsupportedOperator {
            field: config.name.to_string(),
            operator: operator.as_str().to_string(),
        });
    }

    let clause = match config.field_type {
        FieldType::Enum => normalize_enum(config, value)?,
        FieldType::Number => Clause::Number {
            field: config.name,
            operator,
            value: parse_non_negative(config, value)?,
        },
        FieldType::Date => Clause::Date {
            field: config.name,
            operator,
            at: resolve_window(operator, value, now).ok_or_else(|| ParseErrorKind::InvalidDate {
                field: config.name.to_string(),
                value: value.to_string(),
            })?,
        },
        FieldType::Text => Clause::Text(value.to_string()),
    };
    Ok(Some(clause))
}

/// Resolves a date value. Equality covers the following day too, so its end must
/// also be a representable date.
fn resolve_window(operator: Operator, value: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let at = resolve_date(value, now)?;
    if operator == Operator::Eq {
        at.checked_add_signed(Duration::days(1)).filter(|end| is_representable(*end))?;
    }
    Some(at)
}

/// Lowercases the value and checks it against the allowed list.
pub fn normalize_enum(config: &FieldConfig, value: &str) -> Result<Clause, ParseErrorKind> {
    let lowered = value.to_lowercase();
    if !config.accepts_value(&lowered) {
        return Err(ParseErrorKind::InvalidEnumValue {
            field: config.name.to_string(),
            value: value.to_string(),
            allowed: config.values.iter().map(|v| v.to_string()).collect(),
        });
    }
    Ok(Clause::Enum {
        field: config.name,
        value: lowered,
    })
}

/// Parses a non-negative integer. Negative values are rejected whatever the operator.
pub fn parse_non_negative(config: &FieldConfig, value: &str) -> Result<i64, ParseErrorKind> {
    match value.parse::<i64>() {
        Ok(number) if number < 0 => Err(ParseErrorKind::NegativeNumberRejected {
            field: config.name.to_string(),
            value: value.to_string(),
        }),
        Ok(number) => Ok(number),
        Err(_) if is_negative_integer(value) => Err(ParseErrorKind::NegativeNumberRejected {
            field: config.name.to_string(),
            value: value.to_string(),
        }),
        Err(_) => Err(ParseErrorKind::InvalidNumber {
            field: config.name.to_string(),
            value: value.to_string(),
        }),
    }
}

/// `-` followed only by digits; covers values too large for `i64`.
fn is_negative_integer(value: &str) -> bool {
    value
        .strip_prefix('-')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
