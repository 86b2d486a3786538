// file: src/pipeline/registry.rs
// description: name to processor-factory mapping, plus the process-wide instance
// reference: factory registration with explicit overwrite semantics

use crate::error::{PipelineError, Result};
use crate::pipeline::processor::{FromParams, Params, Processor};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Builds a fresh processor from its parameters.
pub type ProcessorFactory = Arc<dyn Fn(&Params) -> Result<Box<dyn Processor>> + Send + Sync>;

/// Maps processor names to the factories that construct them.
///
/// Registering a name that already exists replaces the earlier factory; every
/// later `create` for that name uses the replacement.
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    factories: HashMap<String, ProcessorFactory>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in text, file and matrix processor.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::text::register_builtins(&mut registry);
        crate::files::register_builtins(&mut registry);
        crate::matrix::register_builtins(&mut registry);
        registry
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Params) -> Result<Box<dyn Processor>> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.contains_key(&name) {
            debug!("Overwriting processor registration: {}", name);
        }
        self.factories.insert(name, Arc::new(factory));
    }

    pub fn register_type<P>(&mut self, name: impl Into<String>)
    where
        P: Processor + FromParams + 'static,
    {
        self.register(name, |params: &Params| {
            Ok(Box::new(P::from_params(params)?) as Box<dyn Processor>)
        });
    }

    pub fn create(&self, name: &str, params: &Params) -> Result<Box<dyn Processor>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| PipelineError::UnknownProcessor {
                name: name.to_string(),
                available: self.list_names(),
            })?;
        factory(params)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

lazy_static! {
    static ref GLOBAL_REGISTRY: RwLock<ProcessorRegistry> =
        RwLock::new(ProcessorRegistry::with_builtins());
}

/// Runs `f` against the process-wide registry.
pub fn with_global<R>(f: impl FnOnce(&ProcessorRegistry) -> R) -> R {
    let guard = GLOBAL_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    f(&guard)
}

pub fn register_global<F>(name: impl Into<String>, factory: F)
where
    F: Fn(&Params) -> Result<Box<dyn Processor>> + Send + Sync + 'static,
{
    GLOBAL_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(name, factory);
}

/// Drops every runtime registration and restores the built-in set.
pub fn reset_global() {
    *GLOBAL_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner) = ProcessorRegistry::with_builtins();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processor::{FnProcessor, expect_str};
    use serde_json::{Value, json};

    fn constant(
        name: &'static str,
        output: &'static str,
    ) -> impl Fn(&Params) -> Result<Box<dyn Processor>> + Send + Sync + 'static {
        move |_: &Params| {
            Ok(Box::new(FnProcessor::new(name, move |_| Ok(json!(output)))) as Box<dyn Processor>)
        }
    }

    #[test]
    fn test_create_unknown_name() {
        let mut registry = ProcessorRegistry::new();
        registry.register("known", constant("known", "x"));

        let err = registry.create("missing", &Params::new()).err().unwrap();
        match err {
            PipelineError::UnknownProcessor { name, available } => {
                assert_eq!(name, "missing");
                assert_eq!(available, vec!["known".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_registration_overwrites() {
        let mut registry = ProcessorRegistry::new();
        registry.register("greet", constant("greet", "first"));
        registry.register("greet", constant("greet", "second"));

        assert_eq!(registry.len(), 1);
        let processor = registry.create("greet", &Params::new()).unwrap();
        assert_eq!(processor.process(Value::Null).unwrap(), json!("second"));
    }

    #[test]
    fn test_create_returns_independent_instances() {
        let mut registry = ProcessorRegistry::new();
        registry.register("param", |params: &Params| {
            let suffix = params
                .get("suffix")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            Ok(Box::new(FnProcessor::new("param", move |v: Value| {
                Ok(json!(format!("{}{}", expect_str("param", &v)?, suffix)))
            })) as Box<dyn Processor>)
        });

        let mut bang = Params::new();
        bang.insert("suffix".to_string(), json!("!"));
        let first = registry.create("param", &bang).unwrap();
        let second = registry.create("param", &Params::new()).unwrap();

        assert_eq!(first.process(json!("hi")).unwrap(), json!("hi!"));
        assert_eq!(second.process(json!("hi")).unwrap(), json!("hi"));
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = ProcessorRegistry::with_builtins();
        for name in [
            "clean",
            "tokenize",
            "word_count",
            "keywords",
            "text_file",
            "csv_file",
            "csv_extract",
            "multi_column_csv",
            "file_to_text",
            "csv_to_matrix_file",
            "file_metadata",
            "csv_content_to_matrix",
            "csv_to_matrix",
            "batch_processor",
            "matrix_row",
            "matrix_col",
            "matrix_element",
            "matrix_transpose",
            "matrix_filter",
            "matrix_sort",
            "matrix_convert",
            "matrix_aggregate",
            "matrix_reshape",
        ] {
            assert!(registry.is_registered(name), "missing builtin {name}");
        }
    }

    #[test]
    fn test_list_names_sorted() {
        let mut registry = ProcessorRegistry::new();
        registry.register("zeta", constant("zeta", "z"));
        registry.register("alpha", constant("alpha", "a"));
        assert_eq!(registry.list_names(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_global_registration_visible() {
        register_global("registry_test_probe", constant("registry_test_probe", "ok"));
        let output = with_global(|registry| {
            registry
                .create("registry_test_probe", &Params::new())
                .and_then(|p| p.process(Value::Null))
        })
        .unwrap();
        assert_eq!(output, json!("ok"));
    }
}
