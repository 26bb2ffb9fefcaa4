use bugwatch_search::{SuggestionContext, get_suggestions, parse_query, stringify_query, tokenize};
use proptest::prelude::*;

const CLAUSES: &[&str] = &[
    "is:unresolved",
    "is:ignored",
    "status:resolved",
    "level:error",
    "level:FATAL",
    "severity:info",
    "count:>10",
    "count:<=99",
    "count:5",
    "events:>=2",
    "users:>3",
    "users:7",
    "last_seen:>7d",
    "last_seen:today",
    "first_seen:<2026-01-01",
    "created:2025-12-24",
    "sort:users",
    "sort:last_seen:asc",
    "-level:info",
    "is:!resolved",
    "title:timeout",
    "\"null pointer\"",
    "OR",
    "first_seen:9999-12-30",
    "first_seen:>9999-12-31",
    "last_seen:<9999-12-31T23:59:59Z",
    "last_seen:0001-01-01",
    "first_seen:>0001-01-01T00:00:00Z",
];

fn query_strategy() -> impl Strategy<Value = String> {
    let clause = prop_oneof![
        6 => prop::sample::select(CLAUSES).prop_map(str::to_string),
        2 => "[a-z]{1,8}",
        // phrases with edge and doubled spaces
        1 => "\"[ ]{0,2}[a-z]{1,5}([ ]{1,3}[a-z]{1,5})?[ ]{0,2}\"",
        1 => "\"[ ]{1,3}\"",
        // words holding a quote character, bare or as a text-field value
        1 => "[a-z]{1,4}\"[a-z]{0,4}",
        1 => "title:[a-z]{1,3}:[a-z]{0,3}\"[a-z]{0,3}",
    ];
    prop::collection::vec(clause, 0..8).prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn tokens_partition_the_input(input in "\\PC*") {
        let tokens = tokenize(&input);
        let mut cursor = 0;
        for token in &tokens {
            prop_assert!(token.start_index >= cursor);
            prop_assert!(token.end_index > token.start_index);
            prop_assert!(input[cursor..token.start_index].chars().all(char::is_whitespace));
            prop_assert_eq!(&input[token.span()], token.raw.as_str());
            cursor = token.end_index;
        }
        prop_assert!(input[cursor..].chars().all(char::is_whitespace));
    }

    #[test]
    fn parsing_is_total(input in "\\PC*") {
        let parsed = parse_query(&input);
        for error in &parsed.errors {
            prop_assert!(error.end_index <= input.len());
            prop_assert!(parsed.tokens.iter().any(|t| t.span() == error.span()));
        }
    }

    #[test]
    fn suggestions_are_bounded(input in "\\PC{0,40}", cursor in 0usize..64) {
        let suggestions = get_suggestions(SuggestionContext::new(&input, cursor), &[], &[], None);
        prop_assert!(suggestions.len() <= 10);
        // no history supplied, so nothing is appended after the ranked block
        for pair in suggestions.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn well_formed_queries_round_trip(query in query_strategy()) {
        let first = parse_query(&query);
        prop_assert!(first.errors.is_empty(), "{:?}: {:?}", query, first.errors);
        let second = parse_query(&stringify_query(&first));
        prop_assert_eq!(&second.filters, &first.filters);
        prop_assert_eq!(&second.sort, &first.sort);
        prop_assert!(second.errors.is_empty());
    }
}
