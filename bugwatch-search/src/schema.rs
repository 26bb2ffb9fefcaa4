//! # Field Schema
//!
//! Static table of the filter fields the query language understands.
//!
//! | field         | type   | values / operators                  | aliases          |
//! |---------------|--------|-------------------------------------|------------------|
//! | `is`          | enum   | unresolved, resolved, ignored       | status           |
//! | `level`       | enum   | fatal, error, warning, info         | severity         |
//! | `count`       | number | eq, gt, lt, gte, lte                | events           |
//! | `users`       | number | eq, gt, lt                          | user_count       |
//! | `first_seen`  | date   | eq, gt, lt                          | created, opened  |
//! | `last_seen`   | date   | eq, gt, lt                          | updated, recent  |
//! | `title`       | text   |                                     | message, error   |
//! | `fingerprint` | text   |                                     | hash, id         |
//!
//! `sort` is not a field of the table; it is recognized by the tokenizer as a keyword
//! and validated against [`SORTABLE_FIELDS`].
//!
//! The alias reverse lookup is computed once in [`FieldSchema::new`] and never mutated
//! afterwards. Callers normally share one schema by reference, either one they built
//! themselves or the process-wide [`FieldSchema::global`].

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

/// Keyword that introduces a sort clause (`sort:last_seen:asc`).
pub const SORT_KEYWORD: &str = "sort";

/// Fields accepted by `sort:`.
pub const SORTABLE_FIELDS: &[&str] = &["count", "users", "last_seen", "first_seen"];

/// Value type of a filter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Enum,
    Number,
    Date,
    Text,
}

impl FieldType {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldType::Enum => "enum",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Text => "text",
        }
    }
}

/// Comparison operator embedded in a field filter (`count:>=10`).
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    #[default]
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
    Ne,
}

impl Operator {
    /// Name used in the schema table and in JSON output.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
            Operator::Ne => "ne",
        }
    }

    /// Symbol written in a query string. `Eq` is implicit and renders as nothing.
    #[inline]
    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Ne => "!",
        }
    }

    /// Parse an operator symbol as it appears after the colon.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "" | "=" => Some(Operator::Eq),
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            ">=" => Some(Operator::Gte),
            "<=" => Some(Operator::Lte),
            "!" | "!=" => Some(Operator::Ne),
            _ => None,
        }
    }
}

/// Description of one filterable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldConfig {
    /// Canonical name, as written in the first column of the table.
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Allowed values for `enum` fields; empty otherwise.
    pub values: &'static [&'static str],
    pub operators: &'static [Operator],
    pub description: &'static str,
    pub aliases: &'static [&'static str],
}

impl FieldConfig {
    #[inline]
    pub fn allows(&self, operator: Operator) -> bool {
        self.operators.contains(&operator)
    }

    /// Case-insensitive membership test for enum values.
    pub fn accepts_value(&self, value: &str) -> bool {
        self.values.iter().any(|allowed| allowed.eq_ignore_ascii_case(value))
    }
}

const ENUM_OPERATORS: &[Operator] = &[Operator::Eq, Operator::Ne];
const DATE_OPERATORS: &[Operator] = &[Operator::Eq, Operator::Gt, Operator::Lt];
const TEXT_OPERATORS: &[Operator] = &[Operator::Eq];

const STANDARD_FIELDS: &[FieldConfig] = &[
    FieldConfig {
        name: "is",
        field_type: FieldType::Enum,
        values: &["unresolved", "resolved", "ignored"],
        operators: ENUM_OPERATORS,
        description: "Issue status",
        aliases: &["status"],
    },
    FieldConfig {
        name: "level",
        field_type: FieldType::Enum,
        values: &["fatal", "error", "warning", "info"],
        operators: ENUM_OPERATORS,
        description: "Error severity level",
        aliases: &["severity"],
    },
    FieldConfig {
        name: "count",
        field_type: FieldType::Number,
        values: &[],
        operators: &[Operator::Eq, Operator::Gt, Operator::Lt, Operator::Gte, Operator::Lte],
        description: "Number of events",
        aliases: &["events"],
    },
    FieldConfig {
        name: "users",
        field_type: FieldType::Number,
        values: &[],
        operators: &[Operator::Eq, Operator::Gt, Operator::Lt],
        description: "Number of affected users",
        aliases: &["user_count"],
    },
    FieldConfig {
        name: "first_seen",
        field_type: FieldType::Date,
        values: &[],
        operators: DATE_OPERATORS,
        description: "When the issue was first seen",
        aliases: &["created", "opened"],
    },
    FieldConfig {
        name: "last_seen",
        field_type: FieldType::Date,
        values: &[],
        operators: DATE_OPERATORS,
        description: "When the issue was last seen",
        aliases: &["updated", "recent"],
    },
    FieldConfig {
        name: "title",
        field_type: FieldType::Text,
        values: &[],
        operators: TEXT_OPERATORS,
        description: "Search in error title/message",
        aliases: &["message", "error"],
    },
    FieldConfig {
        name: "fingerprint",
        field_type: FieldType::Text,
        values: &[],
        operators: TEXT_OPERATORS,
        description: "Issue fingerprint",
        aliases: &["hash", "id"],
    },
];

static GLOBAL_SCHEMA: Lazy<FieldSchema> = Lazy::new(FieldSchema::standard);

/// Immutable field table plus its precomputed name/alias lookup.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    fields: Vec<FieldConfig>,
    /// Lowercased canonical names and aliases -> position in `fields`.
    lookup: HashMap<String, usize>,
}

impl FieldSchema {
    /// Build a schema from a field table. Later entries never shadow earlier ones:
    /// if two fields claim the same name or alias, the first one keeps it.
    pub fn new(fields: impl IntoIterator<Item = FieldConfig>) -> Self {
        let fields: Vec<FieldConfig> = fields.into_iter().collect();
        let mut lookup = HashMap::with_capacity(fields.len() * 3);
        for (index, field) in fields.iter().enumerate() {
            lookup.entry(field.name.to_ascii_lowercase()).or_insert(index);
        }
        for (index, field) in fields.iter().enumerate() {
            for alias in field.aliases {
                lookup.entry(alias.to_ascii_lowercase()).or_insert(index);
            }
        }
        Self { fields, lookup }
    }

    /// The issue-search field table.
    pub fn standard() -> Self {
        Self::new(STANDARD_FIELDS.iter().copied())
    }

    /// Process-wide shared instance of [`FieldSchema::standard`].
    pub fn global() -> &'static FieldSchema {
        &GLOBAL_SCHEMA
    }

    /// Resolve a canonical name or alias, ignoring ASCII case.
    pub fn lookup(&self, name: &str) -> Option<&FieldConfig> {
        self.lookup.get(&name.to_ascii_lowercase()).map(|&i| &self.fields[i])
    }

    /// Fields in table order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldConfig> {
        self.fields.iter()
    }

    /// True for the `sort` keyword, in any case.
    #[inline]
    pub fn is_sort_keyword(name: &str) -> bool {
        name.eq_ignore_ascii_case(SORT_KEYWORD)
    }

    #[inline]
    pub fn is_sortable(field: &str) -> bool {
        SORTABLE_FIELDS.contains(&field)
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::standard()
    }
}
