// file: src/text/tokenizer.rs
// description: whitespace tokenization

use crate::error::Result;
use crate::pipeline::processor::{FromParams, Params, Processor, expect_str, parse_params};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenizeOptions {
    pub lowercase: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TextTokenizer {
    options: TokenizeOptions,
}

impl TextTokenizer {
    pub fn new(options: TokenizeOptions) -> Self {
        Self { options }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|token| {
                if self.options.lowercase {
                    token.to_lowercase()
                } else {
                    token.to_string()
                }
            })
            .collect()
    }
}

impl FromParams for TextTokenizer {
    fn from_params(params: &Params) -> Result<Self> {
        Ok(Self::new(parse_params("tokenize", params)?))
    }
}

impl Processor for TextTokenizer {
    fn name(&self) -> &str {
        "tokenize"
    }

    fn process(&self, input: Value) -> Result<Value> {
        let tokens = self.tokenize(expect_str("tokenize", &input)?);
        Ok(Value::Array(tokens.into_iter().map(Value::String).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tokenize() {
        let tokenizer = TextTokenizer::default();
        assert_eq!(
            tokenizer
                .process(json!("Hello World This is a test 12345"))
                .unwrap(),
            json!(["Hello", "World", "This", "is", "a", "test", "12345"])
        );
    }

    #[test]
    fn test_tokenize_lowercase_and_blank() {
        let tokenizer = TextTokenizer::new(TokenizeOptions { lowercase: true });
        assert_eq!(tokenizer.tokenize(" Big\tsmall\n"), vec!["big", "small"]);
        assert!(tokenizer.tokenize("   ").is_empty());
    }
}
