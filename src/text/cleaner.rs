// file: src/text/cleaner.rs
// description: strips punctuation and symbols, keeping letters, digits and whitespace

use crate::error::Result;
use crate::pipeline::processor::{FromParams, Params, Processor, expect_str, parse_params};
use crate::text::patterns::{PUNCTUATION, collapse_whitespace};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    pub lowercase: bool,
    pub collapse_whitespace: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TextCleaner {
    options: CleanOptions,
}

impl TextCleaner {
    pub fn new(options: CleanOptions) -> Self {
        Self { options }
    }

    pub fn clean(&self, text: &str) -> String {
        let mut cleaned = PUNCTUATION.replace_all(text, "").into_owned();

        if self.options.collapse_whitespace {
            cleaned = collapse_whitespace(&cleaned);
        }
        if self.options.lowercase {
            cleaned = cleaned.to_lowercase();
        }

        cleaned
    }
}

impl FromParams for TextCleaner {
    fn from_params(params: &Params) -> Result<Self> {
        Ok(Self::new(parse_params("clean", params)?))
    }
}

impl Processor for TextCleaner {
    fn name(&self) -> &str {
        "clean"
    }

    fn process(&self, input: Value) -> Result<Value> {
        Ok(Value::String(self.clean(expect_str("clean", &input)?)))
    }
}
