use bugwatch_search::{
    FieldSchema, ParseErrorKind, Parser, SearchRequest, SortDirection, TokenKind, parse_query, tokenize,
};
use chrono::{TimeZone, Utc};

fn parse_at_fixed_time(query: &str) -> bugwatch_search::ParsedQuery {
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 15, 30, 0).single().expect("valid timestamp");
    Parser::new(FieldSchema::global()).with_now(now).parse(query)
}

#[test]
fn raw_tokens_rebuild_the_input() {
    let input = "  is:unresolved   \"null pointer\" -level:info count:>=10\tsort:users:asc crash ";
    let tokens = tokenize(input);

    let mut rebuilt = String::new();
    let mut cursor = 0;
    for token in &tokens {
        rebuilt.push_str(&input[cursor..token.start_index]);
        rebuilt.push_str(&token.raw);
        cursor = token.end_index;
    }
    rebuilt.push_str(&input[cursor..]);
    assert_eq!(rebuilt, input);
    assert_eq!(tokens.len(), 6);
}

#[test]
fn status_and_level() {
    let parsed = parse_query("is:unresolved level:error");
    assert_eq!(parsed.filters.status, Some(vec!["unresolved".to_string()]));
    assert_eq!(parsed.filters.level, Some(vec!["error".to_string()]));
    assert!(parsed.errors.is_empty());
}

#[test]
fn count_operators() {
    assert_eq!(parse_query("count:>100").filters.count_gt, Some(100));

    let equal = parse_query("count:50");
    assert_eq!(equal.filters.count_gte, Some(50));
    assert_eq!(equal.filters.count_lte, Some(50));
}

#[test]
fn unknown_field_keeps_the_rest() {
    let parsed = parse_query("bogus_field:x level:error");
    assert_eq!(parsed.errors.len(), 1);
    let error = &parsed.errors[0];
    assert_eq!(error.span(), 0..13);
    assert!(matches!(error.kind, ParseErrorKind::UnknownField { ref field } if field == "bogus_field"));
    assert_eq!(parsed.filters.level, Some(vec!["error".to_string()]));
    assert_eq!(parsed.free_text, "");
}

#[test]
fn quoted_phrase_and_filter() {
    let parsed = parse_query("\"hello world\" level:info");
    assert_eq!(parsed.free_text, "hello world");
    assert_eq!(parsed.filters.text.as_deref(), Some("hello world"));
    assert_eq!(parsed.filters.level, Some(vec!["info".to_string()]));
}

#[test]
fn negative_count_sets_nothing() {
    let parsed = parse_query("count:-5");
    assert_eq!(parsed.errors.len(), 1);
    assert!(matches!(parsed.errors[0].kind, ParseErrorKind::NegativeNumberRejected { .. }));
    assert_eq!(parsed.filters.count_gt, None);
    assert_eq!(parsed.filters.count_lt, None);
    assert_eq!(parsed.filters.count_gte, None);
    assert_eq!(parsed.filters.count_lte, None);
}

#[test]
fn every_error_points_at_its_token() {
    let query = "is:closed users:>=5 count:lots sort:title first_seen:whenever level:warning";
    let parsed = parse_query(query);

    let kinds: Vec<&str> = parsed
        .errors
        .iter()
        .map(|e| match e.kind {
            ParseErrorKind::InvalidEnumValue { .. } => "enum",
            ParseErrorKind::UnsupportedOperator { .. } => "operator",
            ParseErrorKind::InvalidNumber { .. } => "number",
            ParseErrorKind::InvalidSortField { .. } => "sort",
            ParseErrorKind::InvalidDate { .. } => "date",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["enum", "operator", "number", "sort", "date"]);

    for error in &parsed.errors {
        let token = parsed
            .tokens
            .iter()
            .find(|t| t.span() == error.span())
            .expect("error span matches a token");
        assert_eq!(&query[error.span()], token.raw);
    }
    assert_eq!(parsed.filters.level, Some(vec!["warning".to_string()]));
    assert!(parsed.ensure_valid().is_err());
}

#[test]
fn relative_dates_use_the_pinned_clock() {
    let parsed = parse_at_fixed_time("last_seen:>7d first_seen:today");
    assert_eq!(parsed.filters.last_seen_after.as_deref(), Some("2026-10-09T15:30:00.000Z"));
    assert_eq!(parsed.filters.first_seen_after.as_deref(), Some("2026-10-16T00:00:00.000Z"));
    assert_eq!(parsed.filters.first_seen_before.as_deref(), Some("2026-10-17T00:00:00.000Z"));
}

#[test]
fn aliases_behave_like_canonical_fields() {
    let by_alias = parse_query("status:resolved severity:fatal events:>3 user_count:<9");
    let canonical = parse_query("is:resolved level:fatal count:>3 users:<9");
    assert_eq!(by_alias.filters, canonical.filters);
    assert!(by_alias.errors.is_empty());
}

#[test]
fn or_and_negation_do_not_change_filters() {
    let parsed = parse_query("level:error OR level:fatal -is:ignored is:!resolved");
    assert_eq!(
        parsed.filters.level,
        Some(vec!["error".to_string(), "fatal".to_string()])
    );
    assert_eq!(parsed.filters.status, None);
    assert!(parsed.errors.is_empty());
    assert!(parsed.tokens.iter().any(|t| t.kind == TokenKind::Operator));
    assert!(parsed.mentions_field("is"));
}

#[test]
fn sort_and_request_body() {
    let parsed = parse_query("sort:LAST_SEEN:ASC level:error");
    let sort = parsed.sort.clone().expect("sort parsed");
    assert_eq!(sort.field, "last_seen");
    assert_eq!(sort.direction, SortDirection::Asc);

    let request = SearchRequest::from_parsed(&parsed, Default::default());
    let json = serde_json::to_value(&request).expect("serializable");
    assert_eq!(json["filters"]["level"], serde_json::json!(["error"]));
    assert_eq!(json["sort"]["direction"], "asc");
    assert_eq!(json["per_page"], 50);
}

#[test]
fn parsed_query_serializes_camel_case() {
    let parsed = parse_query("crash level:error");
    let json = serde_json::to_value(&parsed).expect("serializable");
    assert_eq!(json["freeText"], "crash");
    assert_eq!(json["tokens"][1]["startIndex"], 6);
    assert_eq!(json["tokens"][1]["type"], "field");
    assert_eq!(json["filters"]["text"], "crash");
}
