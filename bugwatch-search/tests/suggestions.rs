use bugwatch_search::{
    Facets, SavedSearch, SuggestionContext, SuggestionType, get_suggestions, scope_saved_searches,
};
use chrono::{TimeZone, Utc};

fn saved_search(id: &str, name: &str, query: &str) -> SavedSearch {
    SavedSearch {
        id: id.to_string(),
        name: name.to_string(),
        query: query.to_string(),
        project_id: "web".to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).single().expect("valid timestamp"),
        is_default: false,
    }
}

fn history() -> Vec<String> {
    [
        "level:error crash",
        "is:unresolved",
        "count:>100",
        "sort:users",
        "timeout",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[test]
fn empty_query_orders_saved_before_history() {
    let saved = vec![
        saved_search("1", "Open errors", "is:unresolved level:error"),
        saved_search("2", "Noisy", "count:>1000"),
    ];
    let suggestions = get_suggestions(SuggestionContext::at_end(""), &history(), &saved, None);

    let first_history = suggestions
        .iter()
        .position(|s| s.kind == SuggestionType::History)
        .expect("history present");
    let last_saved = suggestions
        .iter()
        .rposition(|s| s.kind == SuggestionType::Saved)
        .expect("saved present");
    assert!(last_saved < first_history);

    assert_eq!(suggestions[0].label, "Open errors");
    assert_eq!(suggestions[0].value, "is:unresolved level:error");
    assert_eq!(suggestions[0].category.as_deref(), Some("Saved Searches"));
    assert_eq!(suggestions[2].category.as_deref(), Some("Recent"));
    assert_eq!(
        suggestions.iter().filter(|s| s.kind == SuggestionType::History).count(),
        5
    );
}

#[test]
fn level_values_carry_facet_counts() {
    let facets: Facets = serde_json::from_value(serde_json::json!({
        "level": { "fatal": 2, "error": 40, "warning": 7, "info": 0 }
    }))
    .expect("valid facets");

    let suggestions = get_suggestions(SuggestionContext::at_end("level:"), &[], &[], Some(&facets));
    assert_eq!(suggestions.len(), 4);
    for suggestion in &suggestions {
        assert_eq!(suggestion.kind, SuggestionType::Value);
        assert!(["fatal", "error", "warning", "info"].contains(&suggestion.label.as_str()));
        assert!(suggestion.count.is_some());
    }
    assert_eq!(suggestions[1].count, Some(40));
}

#[test]
fn cursor_in_the_middle_completes_the_word_before_it() {
    let query = "is: level:error";
    let suggestions = get_suggestions(SuggestionContext::new(query, 3), &[], &[], None);
    let values: Vec<&str> = suggestions.iter().map(|s| s.value.as_str()).collect();
    assert_eq!(values, vec!["is:unresolved", "is:resolved", "is:ignored"]);
}

#[test]
fn history_matches_follow_specific_suggestions() {
    let suggestions = get_suggestions(SuggestionContext::at_end("cra"), &history(), &[], None);
    let last = suggestions.last().expect("suggestions");
    assert_eq!(last.kind, SuggestionType::History);
    assert_eq!(last.value, "level:error crash");
}

#[test]
fn suggestion_json_uses_camel_case() {
    let suggestions = get_suggestions(SuggestionContext::at_end("sort:"), &[], &[], None);
    let json = serde_json::to_value(&suggestions[0]).expect("serializable");
    assert_eq!(json["type"], "value");
    assert_eq!(json["value"], "sort:count");
    assert!(json.get("count").is_none());
}

#[test]
fn saved_searches_from_json_are_scoped() {
    let saved: Vec<SavedSearch> = serde_json::from_value(serde_json::json!([
        { "id": "a", "name": "A", "query": "is:unresolved", "projectId": "web", "createdAt": "2026-09-01T00:00:00Z" },
        { "id": "b", "name": "B", "query": "level:fatal", "projectId": "api", "createdAt": "2026-09-02T00:00:00Z", "isDefault": true },
        { "id": "c", "name": "C", "query": "sort:users", "projectId": "web", "createdAt": "2026-09-03T00:00:00Z", "isDefault": true }
    ]))
    .expect("valid saved searches");

    let scoped = scope_saved_searches(&saved, "web");
    let ids: Vec<&str> = scoped.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a"]);
}
