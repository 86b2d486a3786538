// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline composition

pub mod composite;
pub mod decorator;
pub mod definition;
pub mod processor;
pub mod registry;

pub use composite::CompositeProcessor;
pub use decorator::{LoggingGuard, LoggingProcessor, logging_enabled, scoped_logging, set_logging};
pub use definition::{
    BuildOptions, PipelineDefinition, StageDefinition, build_pipeline, build_stages,
};
pub use processor::{FnProcessor, FromParams, Params, Processor};
pub use registry::{ProcessorFactory, ProcessorRegistry};
