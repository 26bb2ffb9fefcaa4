//! Match-quality score used to rank field suggestions.
//!
//! | Match                                   | Score                 |
//! |-----------------------------------------|-----------------------|
//! | exact                                   | `100`                 |
//! | prefix                                  | `90 + proportion`     |
//! | substring                               | `70 + proportion`     |
//! | in-order subsequence of every character | `10` per character    |
//! | anything else                           | `0`                   |
//!
//! `proportion` is `query chars / target chars`. Comparison ignores case. Ordering
//! tests depend on these constants; treat them as fixed.

pub const EXACT_SCORE: f64 = 100.0;
pub const PREFIX_SCORE: f64 = 90.0;
pub const SUBSTRING_SCORE: f64 = 70.0;
pub const SUBSEQUENCE_CHAR_SCORE: f64 = 10.0;

pub fn fuzzy_score(target: &str, query: &str) -> f64 {
    let target = target.to_lowercase();
    let query = query.to_lowercase();

    if target == query {
        return EXACT_SCORE;
    }

    let target_len = target.chars().count();
    let proportion = if target_len == 0 {
        0.0
    } else {
        query.chars().count() as f64 / target_len as f64
    };

    if target.starts_with(&query) {
        return PREFIX_SCORE + proportion;
    }
    if target.contains(&query) {
        return SUBSTRING_SCORE + proportion;
    }

    let mut remaining = target.chars();
    let mut matched = 0usize;
    for wanted in query.chars() {
        if !remaining.any(|c| c == wanted) {
            return 0.0;
        }
        matched += 1;
    }
    SUBSEQUENCE_CHAR_SCORE * matched as f64
}
