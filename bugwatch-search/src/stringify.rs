//! Canonical query string for a parsed query, used for shareable and bookmarkable URLs.
//!
//! Clauses are emitted in a fixed order: status, level, count, users, first_seen,
//! last_seen, sort, then free text. Only the filters survive a round trip; token order
//! and spacing of the original string do not.

use crate::filters::{SearchFilters, SortConfig, SortDirection};
use crate::parser::{ParsedQuery, parse_query};

pub fn stringify_query(parsed: &ParsedQuery) -> String {
    stringify_parts(&parsed.filters, parsed.sort.as_ref())
}

/// Same as [`stringify_query`] for callers holding only the API payload.
pub fn stringify_parts(filters: &SearchFilters, sort: Option<&SortConfig>) -> String {
    let mut parts: Vec<String> = Vec::new();

    for status in filters.status.iter().flatten() {
        parts.push(format!("is:{status}"));
    }
    for level in filters.level.iter().flatten() {
        parts.push(format!("level:{level}"));
    }

    match (filters.count_gte, filters.count_lte) {
        (Some(low), Some(high)) if low == high => parts.push(format!("count:{low}")),
        (low, high) => {
            if let Some(low) = low {
                parts.push(format!("count:>={low}"));
            }
            if let Some(high) = high {
                parts.push(format!("count:<={high}"));
            }
        }
    }
    if let Some(value) = filters.count_gt {
        parts.push(format!("count:>{value}"));
    }
    if let Some(value) = filters.count_lt {
        parts.push(format!("count:<{value}"));
    }
    match (filters.users_gt, filters.users_lt) {
        // the open range produced by `users:N`
        (Some(low), Some(high)) if high.checked_sub(low) == Some(2) => parts.push(format!("users:{}", low + 1)),
        (low, high) => {
            if let Some(low) = low {
                parts.push(format!("users:>{low}"));
            }
            if let Some(high) = high {
                parts.push(format!("users:<{high}"));
            }
        }
    }

    push_dates(&mut parts, "first_seen", &filters.first_seen_after, &filters.first_seen_before);
    push_dates(&mut parts, "last_seen", &filters.last_seen_after, &filters.last_seen_before);

    if let Some(sort) = sort {
        match sort.direction {
            SortDirection::Desc => parts.push(format!("sort:{}", sort.field)),
            SortDirection::Asc => parts.push(format!("sort:{}:asc", sort.field)),
        }
    }

    if let Some(text) = filters.text.as_deref().filter(|t| !t.is_empty()) {
        parts.push(quote_text(text));
    }

    parts.join(" ")
}

fn push_dates(parts: &mut Vec<String>, field: &str, after: &Option<String>, before: &Option<String>) {
    if let Some(after) = after {
        parts.push(format!("{field}:>{after}"));
    }
    if let Some(before) = before {
        parts.push(format!("{field}:<{before}"));
    }
}

/// Quote text that would otherwise re-tokenize as something other than plain words.
/// Whitespace inside the text is kept exactly; the parser joins tokens with one space.
fn quote_text(text: &str) -> String {
    let has_whitespace = text.chars().any(char::is_whitespace);
    if !has_whitespace && is_plain_word(text) {
        return text.to_string();
    }
    if !text.contains('"') {
        return format!("\"{text}\"");
    }

    // a phrase cannot hold a quote character: such words go out bare and the
    // runs between them are quoted with their spacing intact
    let mut parts: Vec<String> = Vec::new();
    let mut run: Vec<&str> = Vec::new();
    for piece in text.split(' ') {
        if piece.contains('"') {
            push_phrase(&mut parts, &run);
            run.clear();
            parts.push(quoted_word(piece));
        } else {
            run.push(piece);
        }
    }
    push_phrase(&mut parts, &run);
    parts.join(" ")
}

fn push_phrase(parts: &mut Vec<String>, run: &[&str]) {
    let phrase = run.join(" ");
    if phrase.is_empty() {
        return;
    }
    if !phrase.contains(char::is_whitespace) && is_plain_word(&phrase) {
        parts.push(phrase);
    } else {
        parts.push(format!("\"{phrase}\""));
    }
}

/// A word holding `"`. Written bare when it reads back as text, otherwise as a
/// `title:` value; a word that fits neither loses its quote characters.
fn quoted_word(word: &str) -> String {
    [word.to_string(), format!("title:{word}")]
        .into_iter()
        .find(|candidate| reads_back_as_text(candidate, word))
        .unwrap_or_else(|| format!("\"{}\"", word.replace('"', "")))
}

fn reads_back_as_text(candidate: &str, text: &str) -> bool {
    let parsed = parse_query(candidate);
    parsed.errors.is_empty()
        && parsed.sort.is_none()
        && parsed.filters
            == SearchFilters {
                text: Some(text.to_string()),
                ..SearchFilters::default()
            }
}

fn is_plain_word(word: &str) -> bool {
    !word.is_empty() && !word.contains(':') && !word.starts_with('-') && !word.starts_with('"') && word != "OR"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_canonical_order() {
        let parsed = parse_query("crash sort:count:asc count:>10 level:error is:unresolved");
        assert_eq!(
            stringify_query(&parsed),
            "is:unresolved level:error count:>10 sort:count:asc crash"
        );
    }

    #[test]
    fn count_equality_collapses() {
        assert_eq!(stringify_query(&parse_query("count:50")), "count:50");
        assert_eq!(
            stringify_query(&parse_query("count:>=5 count:<=9")),
            "count:>=5 count:<=9"
        );
    }

    #[test]
    fn multi_word_text_is_quoted() {
        assert_eq!(stringify_query(&parse_query("null pointer")), "\"null pointer\"");
        assert_eq!(stringify_query(&parse_query("\"level:error\"")), "\"level:error\"");
        assert_eq!(stringify_query(&parse_query("\"-x\"")), "\"-x\"");
    }

    #[test]
    fn users_range_is_written_as_bounds() {
        assert_eq!(stringify_query(&parse_query("users:10")), "users:10");
        assert_eq!(stringify_query(&parse_query("users:0")), "users:0");
        assert_eq!(stringify_query(&parse_query("users:>3 users:<9")), "users:>3 users:<9");
    }

    #[test]
    fn text_with_quote_characters_falls_back_to_words() {
        assert_eq!(stringify_query(&parse_query("say\"hi there")), "say\"hi there");
    }

    #[test]
    fn phrase_spacing_is_preserved() {
        assert_eq!(stringify_query(&parse_query("\"  hello\"")), "\"  hello\"");
        assert_eq!(stringify_query(&parse_query("\"a  b\" c\"d")), "\"a  b\" c\"d");
        assert_eq!(stringify_query(&parse_query("x\"y \" a \" \"b \"")), "x\"y \" a  b \"");
    }

    #[test]
    fn quote_word_with_colon_goes_through_a_text_field() {
        let parsed = parse_query("title:ab:c\"d");
        assert_eq!(parsed.filters.text.as_deref(), Some("ab:c\"d"));
        assert_eq!(stringify_query(&parsed), "title:ab:c\"d");
    }

    #[test]
    fn empty_query_stringifies_to_empty() {
        assert_eq!(stringify_query(&parse_query("")), "");
        assert_eq!(stringify_query(&parse_query("bogus:1")), "");
    }
}
