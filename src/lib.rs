// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns

pub mod api;
pub mod config;
pub mod error;
pub mod files;
pub mod matrix;
pub mod pipeline;
pub mod text;
pub mod utils;

pub use api::TextProcessingApi;
pub use config::{Config, FileConfig, LoggingConfig, PipelineConfig};
pub use error::{Axis, PipelineError, Result};
pub use files::{FileType, detect_file_type};
pub use matrix::{Matrix, MatrixValidator};
pub use pipeline::{
    BuildOptions, CompositeProcessor, FnProcessor, FromParams, LoggingProcessor, Params,
    PipelineDefinition, Processor, ProcessorRegistry, StageDefinition, build_pipeline,
    set_logging,
};
pub use utils::Validator;
