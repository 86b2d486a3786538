// file: src/files/metadata.rs
// description: filesystem metadata extraction for a single file
// reference: https://docs.rs/chrono

use crate::error::{PipelineError, Result};
use crate::files::readers::read_bytes;
use crate::pipeline::processor::{FromParams, Params, Processor, parse_params};
use crate::utils::Validator;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fs::{self, Metadata};
use std::path::Path;
use std::time::SystemTime;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetadataOptions {
    pub metadata_fields: Vec<String>,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            metadata_fields: vec!["size".to_string(), "modified".to_string()],
        }
    }
}

/// Reports the requested fields of a file. Unknown field names map to null.
///
/// Known fields: `size`, `modified`, `created`, `extension`, `type`, `sha256`.
/// Timestamps are RFC 3339 strings in UTC; `created` is null where the
/// platform does not record it.
#[derive(Debug, Clone, Default)]
pub struct FileMetadataExtractor {
    options: MetadataOptions,
}

impl FileMetadataExtractor {
    pub fn new(options: MetadataOptions) -> Self {
        Self { options }
    }

    pub fn extract(&self, path: &Path) -> Result<Map<String, Value>> {
        let metadata = fs::metadata(path).map_err(|source| PipelineError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;

        self.options
            .metadata_fields
            .iter()
            .map(|field| Ok((field.clone(), field_value(field, path, &metadata)?)))
            .collect()
    }
}

fn field_value(field: &str, path: &Path, metadata: &Metadata) -> Result<Value> {
    Ok(match field {
        "size" => Value::from(metadata.len()),
        "modified" => timestamp(metadata.modified().ok()),
        "created" => timestamp(metadata.created().ok()),
        "extension" => Value::String(
            Validator::extension_of(path)
                .map(|ext| format!(".{}", ext))
                .unwrap_or_default(),
        ),
        "type" => Value::String(if metadata.is_dir() { "directory" } else { "file" }.to_string()),
        "sha256" => {
            let mut hasher = Sha256::new();
            hasher.update(read_bytes(path)?);
            Value::String(format!("{:x}", hasher.finalize()))
        }
        _ => Value::Null,
    })
}

fn timestamp(time: Option<SystemTime>) -> Value {
    time.map_or(Value::Null, |t| {
        Value::String(DateTime::<Utc>::from(t).to_rfc3339())
    })
}

impl FromParams for FileMetadataExtractor {
    fn from_params(params: &Params) -> Result<Self> {
        Ok(Self::new(parse_params("file_metadata", params)?))
    }
}

impl Processor for FileMetadataExtractor {
    fn name(&self) -> &str {
        "file_metadata"
    }

    fn process(&self, input: Value) -> Result<Value> {
        let path = Validator::validate_file_path(Validator::path_input(&input)?)?;
        Ok(Value::Object(self.extract(&path)?))
    }

    fn reads_path(&self) -> bool {
        true
    }
}
