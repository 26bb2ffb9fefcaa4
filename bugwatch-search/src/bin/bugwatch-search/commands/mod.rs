pub mod fields;
pub mod normalize;
pub mod parse;
pub mod request;
pub mod suggest;
pub mod tokens;

/// Column under a byte span, measured in characters so multi-byte text lines up.
pub fn caret_line(query: &str, start: usize, end: usize) -> String {
    let start = floor_char_boundary(query, start);
    let end = floor_char_boundary(query, end.max(start));
    let pad = query[..start].chars().count();
    let width = query[start..end].chars().count().max(1);
    format!("{}{}", " ".repeat(pad), crate::theme::ICONS.caret.repeat(width))
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caret_line_under_span() {
        assert_eq!(caret_line("is:nope crash", 0, 7), "^^^^^^^");
        assert_eq!(caret_line("crash count:-1", 6, 14), "      ^^^^^^^^");
    }

    #[test]
    fn test_caret_line_counts_characters() {
        // `é` is two bytes but one column
        assert_eq!(caret_line("é is:x", 3, 7), "  ^^^^");
        assert_eq!(caret_line("abc", 3, 3), "   ^");
    }
}
