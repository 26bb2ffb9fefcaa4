//! Filter payload sent to the issue search API, and the normalizers that turn
//! individual field tokens into updates of that payload.

pub mod normalizers;

pub use normalizers::*;

use chrono::Duration;
use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

use crate::dates::format_date;
use crate::schema::Operator;

/// Structured filters, shaped exactly like the backend's `SearchFiltersRequest`.
///
/// All fields are optional; absent ones are omitted from the JSON body.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_gt: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_lt: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_gte: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_lte: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users_gt: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users_lt: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_seen_after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_seen_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fold one normalized clause into the filters.
    ///
    /// `users` equality is approximate: `users:N` becomes the open range `(N-1, N+1)`
    /// because the backend only supports strict bounds for that column.
    pub fn apply(&mut self, clause: Clause) {
        match clause {
            Clause::Enum { field, value } => {
                let target = match field {
                    "is" => &mut self.status,
                    "level" => &mut self.level,
                    other => {
                        log::debug!("enum field {other} has no filter slot; ignoring {value}");
                        return;
                    }
                };
                let values = target.get_or_insert_with(Vec::new);
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            Clause::Number { field, operator, value } => match (field, operator) {
                ("count", Operator::Gt) => self.count_gt = Some(value),
                ("count", Operator::Lt) => self.count_lt = Some(value),
                ("count", Operator::Gte) => self.count_gte = Some(value),
                ("count", Operator::Lte) => self.count_lte = Some(value),
                ("count", Operator::Eq) => {
                    self.count_gte = Some(value);
                    self.count_lte = Some(value);
                }
                ("users", Operator::Gt) => self.users_gt = Some(value),
                ("users", Operator::Lt) => self.users_lt = Some(value),
                ("users", Operator::Eq) => {
                    self.users_gt = Some(value.saturating_sub(1));
                    self.users_lt = Some(value.saturating_add(1));
                }
                (field, operator) => {
                    log::debug!("no filter slot for {field} {}; ignoring {value}", operator.as_str());
                }
            },
            Clause::Date { field, operator, at } => {
                let (after, before) = match field {
                    "first_seen" => (&mut self.first_seen_after, &mut self.first_seen_before),
                    "last_seen" => (&mut self.last_seen_after, &mut self.last_seen_before),
                    other => {
                        log::debug!("date field {other} has no filter slot");
                        return;
                    }
                };
                match operator {
                    Operator::Gt => *after = Some(format_date(at)),
                    Operator::Lt => *before = Some(format_date(at)),
                    Operator::Eq => {
                        *after = Some(format_date(at));
                        *before = at.checked_add_signed(Duration::days(1)).map(format_date);
                    }
                    other => log::debug!("no filter slot for {field} {}", other.as_str()),
                }
            }
            Clause::Text(_) => {
                // free text is accumulated by the parser, which owns word order
            }
        }
    }
}

/// Sort direction; descending unless `:asc` is given.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub field: String,
    pub direction: SortDirection,
}
