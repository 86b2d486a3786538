// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Matrix axis named in index and dimension errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Unknown processor '{name}' (available: {})", .available.join(", "))]
    UnknownProcessor {
        name: String,
        available: Vec<String>,
    },

    #[error("Invalid matrix: {0}")]
    InvalidMatrix(String),

    #[error("{axis} index {index} out of range for length {len}")]
    IndexOutOfRange { axis: Axis, index: i64, len: usize },

    #[error("Dimension mismatch in {operation}: expected {dimension} {expected}, got {actual}")]
    DimensionMismatch {
        operation: String,
        dimension: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unsupported file type: {file_type}")]
    UnsupportedFileType { file_type: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Processor '{processor}' received invalid input: expected {expected}, got {actual}")]
    InvalidInput {
        processor: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid parameter '{parameter}' for processor '{processor}': {message}")]
    Parameter {
        processor: String,
        parameter: String,
        message: String,
    },

    #[error("Pipeline stage {index} ({processor}) failed: {source}")]
    Stage {
        index: usize,
        processor: String,
        #[source]
        source: Box<PipelineError>,
    },

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn parameter(
        processor: impl Into<String>,
        parameter: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Parameter {
            processor: processor.into(),
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    pub fn dimension_mismatch(
        operation: impl Into<String>,
        dimension: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::DimensionMismatch {
            operation: operation.into(),
            dimension: dimension.into(),
            expected,
            actual,
        }
    }

    pub fn invalid_input(
        processor: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            processor: processor.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Strips any stage wrapping and returns the error that was raised first.
    pub fn root(&self) -> &PipelineError {
        match self {
            PipelineError::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    /// Stage index and processor name of the outermost failing stage, if any.
    pub fn stage(&self) -> Option<(usize, &str)> {
        match self {
            PipelineError::Stage {
                index, processor, ..
            } => Some((*index, processor.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_unwraps_nested_stages() {
        let inner = PipelineError::IndexOutOfRange {
            axis: Axis::Row,
            index: 5,
            len: 2,
        };
        let err = PipelineError::Stage {
            index: 1,
            processor: "matrix_row".to_string(),
            source: Box::new(PipelineError::Stage {
                index: 0,
                processor: "inner".to_string(),
                source: Box::new(inner),
            }),
        };

        assert!(matches!(
            err.root(),
            PipelineError::IndexOutOfRange { index: 5, .. }
        ));
        assert_eq!(err.stage(), Some((1, "matrix_row")));
    }

    #[test]
    fn test_unknown_processor_message_lists_names() {
        let err = PipelineError::UnknownProcessor {
            name: "nope".to_string(),
            available: vec!["clean".to_string(), "tokenize".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown processor 'nope' (available: clean, tokenize)"
        );
    }

    #[test]
    fn test_index_message() {
        let err = PipelineError::IndexOutOfRange {
            axis: Axis::Column,
            index: -1,
            len: 3,
        };
        assert_eq!(err.to_string(), "column index -1 out of range for length 3");
    }
}
