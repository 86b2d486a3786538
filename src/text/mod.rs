// file: src/text/mod.rs
// description: text processing module exports and registration
// reference: internal module structure

pub mod cleaner;
pub mod keywords;
pub mod patterns;
pub mod tokenizer;

pub use cleaner::{CleanOptions, TextCleaner};
pub use keywords::{KeywordExtractor, KeywordOptions, WordCounter};
pub use tokenizer::{TextTokenizer, TokenizeOptions};

use crate::pipeline::ProcessorRegistry;

pub fn register_builtins(registry: &mut ProcessorRegistry) {
    registry.register_type::<TextCleaner>("clean");
    registry.register_type::<TextTokenizer>("tokenize");
    registry.register_type::<WordCounter>("word_count");
    registry.register_type::<KeywordExtractor>("keywords");
}
