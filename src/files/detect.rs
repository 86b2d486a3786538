// file: src/files/detect.rs
// description: file type detection by extension with a content sniff fallback

use crate::config::FileConfig;
use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Text,
    Csv,
}

impl FileType {
    /// Reader stage placed in front of a pipeline for this file type.
    pub fn reader(&self) -> &'static str {
        match self {
            FileType::Text => "text_file",
            FileType::Csv => "csv_file",
        }
    }
}

/// Classifies `path` using the configured extension lists. Files whose
/// extension is missing or unlisted are sniffed.
pub fn detect_file_type(path: &Path, config: &FileConfig) -> Result<FileType> {
    if let Some(extension) = Validator::extension_of(path) {
        let listed = |list: &[String]| list.iter().any(|e| e.eq_ignore_ascii_case(&extension));

        if listed(&config.csv_extensions) {
            return Ok(FileType::Csv);
        }
        if listed(&config.text_extensions) {
            return Ok(FileType::Text);
        }
        if listed(&config.unsupported_extensions) {
            return Err(PipelineError::UnsupportedFileType {
                file_type: format!(".{}", extension),
            });
        }
    }

    let head = read_head(path, config.sniff_bytes)?;
    let detected = sniff(&head).ok_or_else(|| PipelineError::UnsupportedFileType {
        file_type: "binary".to_string(),
    })?;
    debug!("Sniffed {} as {:?}", path.display(), detected);
    Ok(detected)
}

fn read_head(path: &Path, limit: usize) -> Result<Vec<u8>> {
    let to_file_error = |source| PipelineError::FileOperation {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(to_file_error)?;
    let mut head = Vec::with_capacity(limit);
    file.take(limit as u64)
        .read_to_end(&mut head)
        .map_err(to_file_error)?;
    Ok(head)
}

/// Guesses the type of a file from its first bytes. `None` means binary:
/// a NUL byte, or bytes that are not UTF-8 apart from a character cut off
/// at the end of the sample.
pub fn sniff(head: &[u8]) -> Option<FileType> {
    if head.contains(&0) {
        return None;
    }

    let text = match std::str::from_utf8(head) {
        Ok(text) => text,
        Err(e) if e.error_len().is_none() => {
            std::str::from_utf8(&head[..e.valid_up_to()]).ok()?
        }
        Err(_) => return None,
    };

    if text.contains(',') && text.contains('\n') {
        Some(FileType::Csv)
    } else {
        Some(FileType::Text)
    }
}
