// file: src/text/patterns.rs
// description: compiled regex patterns for text cleaning and tokenization
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref WHITESPACE_RUN: Regex =
        Regex::new(r"\s+").expect("WHITESPACE_RUN regex is valid");

    // Anything that is neither alphanumeric nor whitespace, Unicode-aware.
    pub static ref PUNCTUATION: Regex =
        Regex::new(r"[^\p{Alphabetic}\p{Nd}\p{Nl}\p{No}\s]").expect("PUNCTUATION regex is valid");
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_pattern() {
        assert_eq!(PUNCTUATION.replace_all("Hello, World! 42", ""), "Hello World 42");
        assert_eq!(PUNCTUATION.replace_all("café-au-lait", ""), "caféaulait");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \t b\n\nc  "), "a b c");
    }
}
