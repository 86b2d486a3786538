// file: src/utils/validation.rs
// description: path validation and text helpers shared by processors
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use crate::pipeline::processor::kind_of;
use serde_json::Value;
use std::fs::File;
use std::path::{Path, PathBuf};

pub struct Validator;

impl Validator {
    /// Pipeline input that should carry a path. Anything but a string is an
    /// invalid path.
    pub fn path_input(value: &Value) -> Result<&str> {
        value.as_str().ok_or_else(|| {
            PipelineError::InvalidPath(format!("expected a path string, got {}", kind_of(value)))
        })
    }

    /// Checks that `path` is non-empty and names a readable regular file.
    pub fn validate_file_path(path: &str) -> Result<PathBuf> {
        if path.trim().is_empty() {
            return Err(PipelineError::InvalidPath("path is empty".to_string()));
        }

        let path_buf = PathBuf::from(path);
        if !path_buf.exists() {
            return Err(PipelineError::InvalidPath(format!(
                "file does not exist: {}",
                path_buf.display()
            )));
        }

        if !path_buf.is_file() {
            return Err(PipelineError::InvalidPath(format!(
                "path is not a file: {}",
                path_buf.display()
            )));
        }

        if let Err(e) = File::open(&path_buf) {
            return Err(PipelineError::InvalidPath(format!(
                "file is not readable: {} ({})",
                path_buf.display(),
                e
            )));
        }

        Ok(path_buf)
    }

    pub fn validate_directory(path: &str) -> Result<PathBuf> {
        if path.trim().is_empty() {
            return Err(PipelineError::InvalidPath("path is empty".to_string()));
        }

        let path_buf = PathBuf::from(path);
        if !path_buf.is_dir() {
            return Err(PipelineError::InvalidPath(format!(
                "path is not a directory: {}",
                path_buf.display()
            )));
        }

        Ok(path_buf)
    }

    /// Lowercased extension without the leading dot.
    pub fn extension_of(path: &Path) -> Option<String> {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            None => text.to_string(),
            Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        }
    }
}
