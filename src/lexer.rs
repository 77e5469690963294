//! Whitespace tokenizer for input lines.
//!
//! The shell has no quoting, escaping or operators: a token is any maximal run
//! of characters that are not delimiters. Tokens borrow from the line they were
//! split from, so a token sequence can never outlive its line.

/// Characters that separate tokens: space, tab, carriage return, newline and bell.
pub const DELIMITERS: [char; 5] = [' ', '\t', '\r', '\n', '\x07'];

const INITIAL_CAPACITY: usize = 64;

/// Returns true if `c` separates two tokens.
pub fn is_delimiter(c: char) -> bool {
    DELIMITERS.contains(&c)
}

/// Splits `line` into tokens on runs of [`DELIMITERS`].
///
/// Consecutive delimiters collapse, so no empty tokens are produced. An empty or
/// all-delimiter line yields an empty vector.
pub fn split_into_tokens(line: &str) -> Vec<&str> {
    let mut tokens = Vec::with_capacity(INITIAL_CAPACITY);
    tokens.extend(line.split(is_delimiter).filter(|token| !token.is_empty()));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_blank_lines_yield_no_tokens() {
        assert!(split_into_tokens("").is_empty());
        assert!(split_into_tokens("   ").is_empty());
        assert!(split_into_tokens(" \t\r\n\x07 ").is_empty());
    }

    #[test]
    fn test_consecutive_delimiters_collapse() {
        assert_eq!(
            split_into_tokens("  copy\t\ta.txt   b.txt\r\n"),
            vec!["copy", "a.txt", "b.txt"]
        );
    }

    #[test]
    fn test_bell_is_a_delimiter() {
        assert_eq!(split_into_tokens("cd\x07/tmp"), vec!["cd", "/tmp"]);
    }

    #[test]
    fn test_quotes_are_not_special() {
        assert_eq!(
            split_into_tokens("echo \"hello world\""),
            vec!["echo", "\"hello", "world\""]
        );
    }

    #[test]
    fn test_other_unicode_whitespace_is_kept_inside_tokens() {
        // form feed is not in the delimiter set
        assert_eq!(split_into_tokens("a\x0cb c"), vec!["a\x0cb", "c"]);
    }

    #[test]
    fn test_grows_past_initial_capacity() {
        let line = (0..1000).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let tokens = split_into_tokens(&line);
        assert_eq!(tokens.len(), 1000);
        assert_eq!(tokens[0], "0");
        assert_eq!(tokens[999], "999");
    }

    #[test]
    fn test_tokens_borrow_from_line() {
        let line = String::from("dog notes.txt");
        let tokens = split_into_tokens(&line);
        let start = line.as_ptr() as usize;
        assert_eq!(tokens[1].as_ptr() as usize, start + 4);
    }
}
