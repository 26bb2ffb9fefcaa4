//! Bugwatch issue search query language.
//!
//! A small GitHub-style filter syntax for the issue list:
//!
//! ```text
//! is:unresolved level:error count:>100 last_seen:>7d sort:users "null pointer"
//! ```
//!
//! The crate turns such strings into the structured payload the search API accepts,
//! turns payloads back into canonical strings, and produces autocomplete suggestions
//! while the user types.
//!
//! - [`schema`]: the table of filterable fields and their aliases
//! - [`tokenizer`]: span-annotated tokens for highlighting and cursor lookups
//! - [`parser`]: tokens to [`SearchFilters`] plus free text, sort and errors
//! - [`stringify`]: filters back to a canonical query string
//! - [`suggest`]: ranked completions for the word under the cursor
//! - [`request`]: the paginated request body sent to the API
//!
//! Everything here is synchronous and free of I/O. Relative dates are resolved against
//! the clock given to [`Parser::with_now`], or the system clock for [`parse_query`].
//!
//! ```
//! use bugwatch_search::{parse_query, stringify_query};
//!
//! let parsed = parse_query("level:ERROR is:unresolved timeout");
//! assert!(parsed.errors.is_empty());
//! assert_eq!(parsed.filters.level, Some(vec!["error".to_string()]));
//! assert_eq!(parsed.free_text, "timeout");
//! assert_eq!(stringify_query(&parsed), "is:unresolved level:error timeout");
//! ```

pub mod dates;
pub mod errors;
pub mod filters;
pub mod parser;
pub mod request;
pub mod schema;
pub mod stringify;
pub mod suggest;
pub mod tokenizer;

pub use errors::{ParseError, ParseErrorKind, QueryError};
pub use filters::{SearchFilters, SortConfig, SortDirection};
pub use parser::{ParsedQuery, Parser, parse_query};
pub use request::{Pagination, SearchRequest};
pub use schema::{FieldConfig, FieldSchema, FieldType, Operator, SORTABLE_FIELDS};
pub use stringify::{stringify_parts, stringify_query};
pub use suggest::{
    Facets, SavedSearch, Suggestion, SuggestionContext, SuggestionEngine, SuggestionType, fuzzy_score,
    get_suggestions, scope_saved_searches,
};
pub use tokenizer::{Token, TokenKind, Tokenizer, tokenize};
