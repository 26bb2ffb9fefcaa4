//! # Autocomplete Suggestions
//!
//! Given the raw query, the cursor, and what the caller knows (history, saved searches,
//! facet counts), produce a ranked list of completions. The engine classifies the text
//! under the cursor:
//!
//! - **empty query**: saved searches, then recent history, then `is:` / `level:` stubs
//! - **`field:` under the cursor**: values for that field (enum values with facet
//!   counts, date shortcuts, number operators, sortable fields)
//! - **partial word**: field names ranked by [`fuzzy_score`], skipping fields already
//!   used in the query
//! - **anything else**: quick-filter presets
//!
//! Outside the empty state, history entries containing the query are appended last.
//! At most [`MAX_SUGGESTIONS`] are returned. Output is a pure function of the inputs.
//!
//! Suggestion values are complete replacements for the word under the cursor.

pub mod fuzzy;

pub use fuzzy::fuzzy_score;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

use crate::schema::{FieldConfig, FieldSchema, FieldType, Operator, SORT_KEYWORD, SORTABLE_FIELDS};
use crate::tokenizer::Tokenizer;

pub const MAX_SUGGESTIONS: usize = 10;
const MAX_SAVED: usize = 3;
const MAX_RECENT: usize = 5;
const MAX_HISTORY_MATCHES: usize = 3;

const CATEGORY_SAVED: &str = "Saved Searches";
const CATEGORY_RECENT: &str = "Recent";
const CATEGORY_QUICK_START: &str = "Quick Start";
const CATEGORY_FIELDS: &str = "Fields";
const CATEGORY_VALUES: &str = "Values";
const CATEGORY_OPERATORS: &str = "Operators";
const CATEGORY_SUGGESTED: &str = "Suggested";

const DATE_SHORTCUTS: &[(&str, &str)] = &[
    ("today", "Today"),
    ("7d", "Last 7 days"),
    ("14d", "Last 14 days"),
    ("30d", "Last 30 days"),
    ("90d", "Last 90 days"),
];

const NUMBER_OPERATORS: &[(Operator, &str)] = &[
    (Operator::Gt, "Greater than"),
    (Operator::Lt, "Less than"),
    (Operator::Gte, "Greater than or equal"),
    (Operator::Lte, "Less than or equal"),
];

/// `[-]name:[op]partial` under the cursor.
static FIELD_IN_PROGRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?)([A-Za-z_][A-Za-z0-9_]*):(>=|<=|!=|>|<|!|=)?(.*)$").expect("valid field-in-progress pattern")
});

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Field,
    Value,
    History,
    Saved,
    Operator,
}

/// A ranked completion candidate. Higher `score` wins; ties keep insertion order.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    pub score: f64,
}

impl Suggestion {
    fn new(kind: SuggestionType, label: impl Into<String>, value: impl Into<String>, score: f64) -> Self {
        Self {
            kind,
            label: label.into(),
            value: value.into(),
            description: None,
            icon: None,
            category: None,
            count: None,
            score,
        }
    }

    fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }
}

/// Raw query text plus cursor position (byte offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionContext<'a> {
    pub query: &'a str,
    pub cursor: usize,
}

impl<'a> SuggestionContext<'a> {
    pub fn new(query: &'a str, cursor: usize) -> Self {
        Self { query, cursor }
    }

    /// Cursor after the last character.
    pub fn at_end(query: &'a str) -> Self {
        Self {
            query,
            cursor: query.len(),
        }
    }

    /// Cursor clamped to the query and moved back onto a char boundary.
    fn clamped_cursor(&self) -> usize {
        let mut cursor = self.cursor.min(self.query.len());
        while !self.query.is_char_boundary(cursor) {
            cursor -= 1;
        }
        cursor
    }

    /// The whitespace-delimited word that ends at the cursor.
    pub fn current_word(&self) -> &'a str {
        let before = &self.query[..self.clamped_cursor()];
        let start = before
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(index, c)| index + c.len_utf8());
        &before[start..]
    }
}

/// Live result counts per enum value, supplied by the search API.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    #[serde(default)]
    pub level: BTreeMap<String, u32>,
    #[serde(default)]
    pub status: BTreeMap<String, u32>,
}

impl Facets {
    /// Counts for a canonical enum field name.
    pub fn counts_for(&self, field: &str) -> Option<&BTreeMap<String, u32>> {
        match field {
            "is" => Some(&self.status),
            "level" => Some(&self.level),
            _ => None,
        }
    }
}

/// A user-named query persisted by the caller. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub id: String,
    pub name: String,
    pub query: String,
    #[serde(alias = "projectId")]
    pub project_id: String,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "isDefault")]
    pub is_default: bool,
}

/// Saved searches belonging to one project: the default search first, the rest in
/// their original order.
pub fn scope_saved_searches(saved: &[SavedSearch], project_id: &str) -> Vec<SavedSearch> {
    let mut scoped: Vec<SavedSearch> = saved.iter().filter(|s| s.project_id == project_id).cloned().collect();
    scoped.sort_by_key(|s| !s.is_default);
    scoped
}

/// Suggestion engine bound to a field schema.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionEngine<'a> {
    schema: &'a FieldSchema,
}

impl<'a> SuggestionEngine<'a> {
    pub fn new(schema: &'a FieldSchema) -> Self {
        Self { schema }
    }

    pub fn suggest(
        &self,
        context: SuggestionContext<'_>,
        history: &[String],
        saved_searches: &[SavedSearch],
        facets: Option<&Facets>,
    ) -> Vec<Suggestion> {
        if context.query.trim().is_empty() {
            let mut suggestions = empty_state(history, saved_searches);
            rank(&mut suggestions);
            suggestions.truncate(MAX_SUGGESTIONS);
            return suggestions;
        }

        let word = context.current_word();
        let mut suggestions = match FIELD_IN_PROGRESS.captures(word) {
            Some(captures) => {
                let name = captures.get(2).map_or("", |m| m.as_str());
                let operator = captures.get(3).and_then(|m| Operator::from_symbol(m.as_str()));
                let partial = captures.get(4).map_or("", |m| m.as_str());
                let prefix = &word[..word.len() - partial.len()];
                let values = self.value_suggestions(name, operator, partial, prefix, facets);
                values.unwrap_or_else(|| self.presets(context.query))
            }
            None if !word.is_empty() => {
                let fields = self.field_suggestions(word, context.query);
                if fields.is_empty() {
                    self.presets(context.query)
                } else {
                    fields
                }
            }
            None => self.presets(context.query),
        };
        log::debug!("{} suggestion(s) for word {word:?}", suggestions.len());

        rank(&mut suggestions);
        suggestions.extend(history_matches(context.query, history, &suggestions));
        suggestions.truncate(MAX_SUGGESTIONS);
        suggestions
    }

    /// `None` when `name` is not a field, so the caller can fall back to presets.
    fn value_suggestions(
        &self,
        name: &str,
        operator: Option<Operator>,
        partial: &str,
        prefix: &str,
        facets: Option<&Facets>,
    ) -> Option<Vec<Suggestion>> {
        if FieldSchema::is_sort_keyword(name) {
            return Some(sort_values(partial, prefix));
        }
        let config = self.schema.lookup(name)?;
        let suggestions = match config.field_type {
            FieldType::Enum => enum_values(config, partial, prefix, facets),
            FieldType::Date => date_values(operator, partial, prefix),
            FieldType::Number => number_operators(config, operator, partial, prefix),
            FieldType::Text => Vec::new(),
        };
        Some(suggestions)
    }

    fn field_suggestions(&self, word: &str, query: &str) -> Vec<Suggestion> {
        let (negation, needle) = match word.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", word),
        };
        let used = used_fields(self.schema, query);

        let mut suggestions = Vec::new();
        for config in self.schema.fields() {
            if used.iter().any(|u| u == config.name) {
                continue;
            }
            let score = config
                .aliases
                .iter()
                .map(|alias| fuzzy_score(alias, needle))
                .fold(fuzzy_score(config.name, needle), f64::max);
            if score > 0.0 {
                suggestions.push(
                    Suggestion::new(
                        SuggestionType::Field,
                        format!("{}:", config.name),
                        format!("{negation}{}:", config.name),
                        score,
                    )
                    .describe(config.description)
                    .category(CATEGORY_FIELDS),
                );
            }
        }

        if !used.iter().any(|u| u == SORT_KEYWORD) {
            let score = fuzzy_score(SORT_KEYWORD, needle);
            if score > 0.0 {
                suggestions.push(
                    Suggestion::new(
                        SuggestionType::Field,
                        format!("{SORT_KEYWORD}:"),
                        format!("{SORT_KEYWORD}:"),
                        score,
                    )
                    .describe("Sort results")
                    .category(CATEGORY_FIELDS),
                );
            }
        }
        suggestions
    }

    fn presets(&self, query: &str) -> Vec<Suggestion> {
        let used = used_fields(self.schema, query);
        let mut suggestions = Vec::new();
        if !used.iter().any(|u| u == "is") {
            suggestions.push(
                Suggestion::new(SuggestionType::Field, "is:unresolved", "is:unresolved", 30.0)
                    .describe("Show unresolved issues")
                    .category(CATEGORY_SUGGESTED),
            );
        }
        if !used.iter().any(|u| u == "level") {
            suggestions.push(
                Suggestion::new(SuggestionType::Field, "level:error", "level:error", 29.0)
                    .describe("Show errors only")
                    .category(CATEGORY_SUGGESTED),
            );
        }
        suggestions.push(
            Suggestion::new(SuggestionType::Field, "last_seen:>1d", "last_seen:>1d", 28.0)
                .describe("Seen in the last 24 hours")
                .category(CATEGORY_SUGGESTED),
        );
        suggestions
    }
}

/// Canonical names of the fields (and `sort`) already used as filters in `query`.
fn used_fields(schema: &FieldSchema, query: &str) -> Vec<String> {
    Tokenizer::new(schema)
        .tokenize(query)
        .into_iter()
        .filter(|token| token.is_filter())
        .filter_map(|token| token.field)
        .collect()
}

fn empty_state(history: &[String], saved_searches: &[SavedSearch]) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for (index, saved) in saved_searches.iter().take(MAX_SAVED).enumerate() {
        suggestions.push(
            Suggestion::new(SuggestionType::Saved, &saved.name, &saved.query, 100.0 - index as f64)
                .describe(&saved.query)
                .icon("bookmark")
                .category(CATEGORY_SAVED),
        );
    }

    for (index, entry) in history.iter().take(MAX_RECENT).enumerate() {
        suggestions.push(
            Suggestion::new(SuggestionType::History, entry, entry, 80.0 - index as f64)
                .icon("clock")
                .category(CATEGORY_RECENT),
        );
    }

    suggestions.push(
        Suggestion::new(SuggestionType::Field, "is:", "is:", 60.0)
            .describe("Filter by status")
            .category(CATEGORY_QUICK_START),
    );
    suggestions.push(
        Suggestion::new(SuggestionType::Field, "level:", "level:", 59.0)
            .describe("Filter by level")
            .category(CATEGORY_QUICK_START),
    );
    suggestions
}

fn enum_values(config: &FieldConfig, partial: &str, prefix: &str, facets: Option<&Facets>) -> Vec<Suggestion> {
    let partial = partial.to_lowercase();
    let counts = facets.and_then(|f| f.counts_for(config.name));
    config
        .values
        .iter()
        .filter(|value| value.starts_with(&partial))
        .enumerate()
        .map(|(index, value)| {
            let mut suggestion = Suggestion::new(
                SuggestionType::Value,
                *value,
                format!("{prefix}{value}"),
                50.0 - index as f64,
            )
            .category(CATEGORY_VALUES);
            suggestion.count = counts.map(|c| c.get(*value).copied().unwrap_or(0));
            suggestion
        })
        .collect()
}

fn date_values(operator: Option<Operator>, partial: &str, prefix: &str) -> Vec<Suggestion> {
    let partial = partial.to_lowercase();
    // shortcuts mean "since", so default to `>` when no operator was typed
    let implied = if operator.is_none() { ">" } else { "" };

    let mut suggestions: Vec<Suggestion> = DATE_SHORTCUTS
        .iter()
        .filter(|(value, _)| value.starts_with(&partial))
        .enumerate()
        .map(|(index, (value, label))| {
            Suggestion::new(
                SuggestionType::Value,
                *label,
                format!("{prefix}{implied}{value}"),
                50.0 - index as f64,
            )
            .category(CATEGORY_VALUES)
        })
        .collect();

    if operator.is_none() && partial.is_empty() {
        suggestions.push(
            Suggestion::new(SuggestionType::Operator, ">", format!("{prefix}>"), 40.0)
                .describe("After a date")
                .category(CATEGORY_OPERATORS),
        );
        suggestions.push(
            Suggestion::new(SuggestionType::Operator, "<", format!("{prefix}<"), 39.0)
                .describe("Before a date")
                .category(CATEGORY_OPERATORS),
        );
    }
    suggestions
}

fn number_operators(
    config: &FieldConfig,
    operator: Option<Operator>,
    partial: &str,
    prefix: &str,
) -> Vec<Suggestion> {
    if operator.is_some() || !partial.is_empty() {
        return Vec::new();
    }
    NUMBER_OPERATORS
        .iter()
        .filter(|(op, _)| config.allows(*op))
        .enumerate()
        .map(|(index, (op, description))| {
            Suggestion::new(
                SuggestionType::Operator,
                op.symbol(),
                format!("{prefix}{}", op.symbol()),
                40.0 - index as f64,
            )
            .describe(*description)
            .category(CATEGORY_OPERATORS)
        })
        .collect()
}

fn sort_values(partial: &str, prefix: &str) -> Vec<Suggestion> {
    let partial = partial.to_lowercase();
    SORTABLE_FIELDS
        .iter()
        .filter(|field| field.starts_with(&partial))
        .enumerate()
        .map(|(index, field)| {
            Suggestion::new(SuggestionType::Value, *field, format!("{prefix}{field}"), 50.0 - index as f64)
                .describe(format!("Sort by {}", field.replace('_', " ")))
                .category(CATEGORY_VALUES)
        })
        .collect()
}

/// History entries containing the query, excluding the query itself and values already
/// suggested.
fn history_matches(query: &str, history: &[String], existing: &[Suggestion]) -> Vec<Suggestion> {
    let trimmed = query.trim();
    let needle = trimmed.to_lowercase();
    history
        .iter()
        .filter(|entry| entry.trim() != trimmed)
        .filter(|entry| entry.to_lowercase().contains(&needle))
        .filter(|entry| !existing.iter().any(|s| &s.value == *entry))
        .take(MAX_HISTORY_MATCHES)
        .enumerate()
        .map(|(index, entry)| {
            Suggestion::new(SuggestionType::History, entry, entry, 10.0 - index as f64)
                .icon("clock")
                .category(CATEGORY_RECENT)
        })
        .collect()
}

/// Highest score first; the sort is stable so equal scores keep insertion order.
fn rank(suggestions: &mut [Suggestion]) {
    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Suggestions against the shared standard schema.
pub fn get_suggestions(
    context: SuggestionContext<'_>,
    history: &[String],
    saved_searches: &[SavedSearch],
    facets: Option<&Facets>,
) -> Vec<Suggestion> {
    SuggestionEngine::new(FieldSchema::global()).suggest(context, history, saved_searches, facets)
}
