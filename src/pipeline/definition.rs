// file: src/pipeline/definition.rs
// description: declarative stage lists and their resolution into processors
// reference: serde untagged enums for string-or-pair stage entries

use crate::error::{PipelineError, Result};
use crate::pipeline::composite::CompositeProcessor;
use crate::pipeline::decorator::{DEFAULT_PREVIEW_CHARS, LoggingProcessor};
use crate::pipeline::processor::{Params, Processor, kind_of};
use crate::pipeline::registry::ProcessorRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// One pipeline entry: a bare processor name, or a name with its parameters.
///
/// Deserializes from `"clean"` or `["keywords", {"top_k": 3}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StageDefinition {
    Name(String),
    WithParams(String, Value),
}

pub type PipelineDefinition = Vec<StageDefinition>;

impl StageDefinition {
    pub fn new(name: impl Into<String>, params: Value) -> Self {
        StageDefinition::WithParams(name.into(), params)
    }

    pub fn name(&self) -> &str {
        match self {
            StageDefinition::Name(name) | StageDefinition::WithParams(name, _) => name,
        }
    }

    /// Stage parameters laid over the shared ones; stage keys win.
    pub fn merged_params(&self, shared: &Params) -> Result<Params> {
        let mut merged = shared.clone();
        match self {
            StageDefinition::Name(_) => {}
            StageDefinition::WithParams(_, Value::Null) => {}
            StageDefinition::WithParams(_, Value::Object(own)) => {
                merged.extend(own.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            StageDefinition::WithParams(name, other) => {
                return Err(PipelineError::parameter(
                    name.as_str(),
                    "params",
                    format!("expected an object, got {}", kind_of(other)),
                ));
            }
        }
        Ok(merged)
    }
}

impl From<&str> for StageDefinition {
    fn from(name: &str) -> Self {
        StageDefinition::Name(name.to_string())
    }
}

impl From<String> for StageDefinition {
    fn from(name: String) -> Self {
        StageDefinition::Name(name)
    }
}

impl From<(&str, Value)> for StageDefinition {
    fn from((name, params): (&str, Value)) -> Self {
        StageDefinition::new(name, params)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Wrap every stage in a [`LoggingProcessor`].
    pub decorate_stages: bool,
    pub preview_chars: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            decorate_stages: true,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl BuildOptions {
    /// Parameter keys under which the options reach processors that build
    /// nested pipelines.
    pub const DECORATE_KEY: &'static str = "decorate_stages";
    pub const PREVIEW_KEY: &'static str = "preview_chars";

    /// Adds the options to `params` unless the caller already set them.
    pub fn seed(&self, params: &mut Params) {
        params
            .entry(Self::DECORATE_KEY)
            .or_insert(Value::Bool(self.decorate_stages));
        params
            .entry(Self::PREVIEW_KEY)
            .or_insert(Value::from(self.preview_chars));
    }
}

/// Resolves every stage through `registry`, failing on the first unknown name.
pub fn build_stages(
    registry: &ProcessorRegistry,
    definition: &[StageDefinition],
    shared: &Params,
    options: BuildOptions,
) -> Result<Vec<Box<dyn Processor>>> {
    definition
        .iter()
        .map(|stage| {
            let params = stage.merged_params(shared)?;
            let processor = registry.create(stage.name(), &params)?;
            debug!("Built stage {} with {} params", stage.name(), params.len());

            Ok(if options.decorate_stages {
                Box::new(
                    LoggingProcessor::new(processor).with_preview_chars(options.preview_chars),
                ) as Box<dyn Processor>
            } else {
                processor
            })
        })
        .collect()
}

pub fn build_pipeline(
    registry: &ProcessorRegistry,
    definition: &[StageDefinition],
    shared: &Params,
    options: BuildOptions,
) -> Result<CompositeProcessor> {
    let mut pipeline = CompositeProcessor::new();
    for stage in build_stages(registry, definition, shared, options)? {
        pipeline.add(stage);
    }
    Ok(pipeline)
}
