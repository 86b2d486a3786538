// file: src/pipeline/composite.rs
// description: ordered chain of processors applied left to right
// reference: composite stage execution with per-stage error context

use crate::error::{PipelineError, Result};
use crate::pipeline::processor::Processor;
use serde_json::Value;
use tracing::debug;

/// Runs its stages in insertion order, feeding each output to the next stage.
///
/// An empty pipeline is the identity. The first failing stage aborts the run
/// and its error comes back wrapped in [`PipelineError::Stage`].
#[derive(Default)]
pub struct CompositeProcessor {
    processors: Vec<Box<dyn Processor>>,
}

impl CompositeProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, processor: Box<dyn Processor>) {
        self.processors.push(processor);
    }

    pub fn with(mut self, processor: Box<dyn Processor>) -> Self {
        self.add(processor);
        self
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }
}

impl Processor for CompositeProcessor {
    fn name(&self) -> &str {
        "pipeline"
    }

    fn process(&self, input: Value) -> Result<Value> {
        let mut current = input;

        for (index, processor) in self.processors.iter().enumerate() {
            debug!("Running stage {} ({})", index, processor.name());
            current = processor
                .process(current)
                .map_err(|source| PipelineError::Stage {
                    index,
                    processor: processor.name().to_string(),
                    source: Box::new(source),
                })?;
        }

        Ok(current)
    }

    fn reads_path(&self) -> bool {
        self.processors.first().is_some_and(|p| p.reads_path())
    }
}
