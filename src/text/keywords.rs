// file: src/text/keywords.rs
// description: word frequency counting and top-k keyword extraction

use crate::error::{PipelineError, Result};
use crate::pipeline::processor::{FromParams, Params, Processor, kind_of, parse_params};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Word counts in first-seen order.
pub fn count_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for word in words {
        match positions.get(word) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                positions.insert(word, counts.len());
                counts.push((word, 1));
            }
        }
    }

    counts
}

#[derive(Debug, Clone, Default)]
pub struct WordCounter;

impl FromParams for WordCounter {
    fn from_params(_params: &Params) -> Result<Self> {
        Ok(Self)
    }
}

impl Processor for WordCounter {
    fn name(&self) -> &str {
        "word_count"
    }

    fn process(&self, input: Value) -> Result<Value> {
        let words = words_of("word_count", &input)?;
        let counts: Map<String, Value> = count_words(words)
            .into_iter()
            .map(|(word, count)| (word.to_string(), Value::from(count)))
            .collect();
        Ok(Value::Object(counts))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeywordOptions {
    pub top_k: usize,
}

impl Default for KeywordOptions {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Most frequent words first; ties keep the order in which words first appeared.
#[derive(Debug, Clone, Default)]
pub struct KeywordExtractor {
    options: KeywordOptions,
}

impl KeywordExtractor {
    pub fn new(options: KeywordOptions) -> Self {
        Self { options }
    }

    pub fn extract<'a>(&self, words: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        let mut counts = count_words(words);
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .take(self.options.top_k)
            .map(|(word, _)| word)
            .collect()
    }
}

impl FromParams for KeywordExtractor {
    fn from_params(params: &Params) -> Result<Self> {
        Ok(Self::new(parse_params("keywords", params)?))
    }
}

impl Processor for KeywordExtractor {
    fn name(&self) -> &str {
        "keywords"
    }

    fn process(&self, input: Value) -> Result<Value> {
        let words = words_of("keywords", &input)?;
        Ok(Value::Array(
            self.extract(words)
                .into_iter()
                .map(|w| Value::String(w.to_string()))
                .collect(),
        ))
    }
}

/// Accepts either raw text (split on whitespace) or an array of strings.
fn words_of<'a>(processor: &str, input: &'a Value) -> Result<Vec<&'a str>> {
    match input {
        Value::String(text) => Ok(text.split_whitespace().collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().ok_or_else(|| {
                    PipelineError::invalid_input(processor, "array of strings", kind_of(item))
                })
            })
            .collect(),
        other => Err(PipelineError::invalid_input(
            processor,
            "string or array of strings",
            kind_of(other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_word_counter() {
        let counter = WordCounter;
        let result = counter
            .process(json!("apple banana apple orange banana apple"))
            .unwrap();
        assert_eq!(result, json!({"apple": 3, "banana": 2, "orange": 1}));
    }

    #[test]
    fn test_keyword_extractor_text_and_list() {
        let extractor = KeywordExtractor::new(KeywordOptions { top_k: 2 });

        assert_eq!(
            extractor
                .process(json!("python is great and python is powerful"))
                .unwrap(),
            json!(["python", "is"])
        );
        assert_eq!(
            extractor
                .process(json!(["python", "is", "great", "python", "is", "powerful"]))
                .unwrap(),
            json!(["python", "is"])
        );
    }

    #[test]
    fn test_keyword_ties_keep_first_seen_order() {
        let extractor = KeywordExtractor::new(KeywordOptions { top_k: 3 });
        assert_eq!(
            extractor.extract(["b", "a", "c", "a", "d"]),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_keyword_default_top_k() {
        let extractor = KeywordExtractor::from_params(&Params::new()).unwrap();
        assert_eq!(extractor.extract("a b c d e f g".split(' ')).len(), 5);
    }

    #[test]
    fn test_keyword_invalid_input() {
        let extractor = KeywordExtractor::default();
        let err = extractor.process(json!(42)).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput { .. }));

        let err = extractor.process(json!(["ok", 1])).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput { .. }));
    }
}
