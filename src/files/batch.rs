// file: src/files/batch.rs
// description: applies a nested pipeline to every file directly inside a directory
// reference: https://docs.rs/walkdir

use crate::error::Result;
use crate::files::readers::read_utf8;
use crate::pipeline::definition::{BuildOptions, PipelineDefinition, build_pipeline};
use crate::pipeline::processor::{FromParams, Params, Processor, parse_params};
use crate::pipeline::registry;
use crate::utils::Validator;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    pub steps: Option<PipelineDefinition>,
    pub extensions: Vec<String>,
    pub decorate_stages: Option<bool>,
    pub preview_chars: Option<usize>,
}

/// Maps each file path in a directory to the result of running `steps` on its
/// content, or to null without steps. Subdirectories are not entered.
/// A file that fails is recorded as `{"error": message}` and the batch goes on.
#[derive(Debug, Clone, Default)]
pub struct FileBatchProcessor {
    steps: Option<PipelineDefinition>,
    extensions: Vec<String>,
    build_options: BuildOptions,
}

impl FileBatchProcessor {
    pub fn new(options: BatchOptions) -> Self {
        let extensions = options
            .extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
        let defaults = BuildOptions::default();
        let build_options = BuildOptions {
            decorate_stages: options.decorate_stages.unwrap_or(defaults.decorate_stages),
            preview_chars: options.preview_chars.unwrap_or(defaults.preview_chars),
        };
        Self {
            steps: options.steps,
            extensions,
            build_options,
        }
    }

    /// Options used to build the nested `steps` pipeline.
    pub fn build_options(&self) -> BuildOptions {
        self.build_options
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        Validator::extension_of(path).is_some_and(|ext| self.extensions.contains(&ext))
    }

    fn list_files(&self, directory: &Path) -> Vec<PathBuf> {
        WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| self.accepts(path))
            .collect()
    }

    fn process_one(&self, steps: &dyn Processor, path: &Path) -> Result<Value> {
        let content = read_utf8(path)?;
        steps.process(Value::String(content))
    }
}

impl FromParams for FileBatchProcessor {
    fn from_params(params: &Params) -> Result<Self> {
        Ok(Self::new(parse_params("batch_processor", params)?))
    }
}

impl Processor for FileBatchProcessor {
    fn name(&self) -> &str {
        "batch_processor"
    }

    fn process(&self, input: Value) -> Result<Value> {
        let directory = Validator::validate_directory(Validator::path_input(&input)?)?;

        let pipeline = match &self.steps {
            Some(steps) => Some(registry::with_global(|registry| {
                build_pipeline(registry, steps, &Params::new(), self.build_options)
            })?),
            None => None,
        };

        let files = self.list_files(&directory);
        info!("Batch processing {} files in {}", files.len(), directory.display());

        let mut results = Map::new();
        for path in files {
            let key = path.to_string_lossy().into_owned();
            let value = match &pipeline {
                None => Value::Null,
                Some(pipeline) => match self.process_one(pipeline, &path) {
                    Ok(value) => value,
                    Err(e) => {
                        warn!("Batch item failed: {}: {}", key, e);
                        json!({ "error": e.to_string() })
                    }
                },
            };
            debug!("Batch item done: {}", key);
            results.insert(key, value);
        }

        Ok(Value::Object(results))
    }

    fn reads_path(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn params(value: Value) -> Params {
        value.as_object().cloned().unwrap_or_default()
    }

    fn key(temp: &TempDir, name: &str) -> String {
        temp.path().join(name).to_string_lossy().into_owned()
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "Hello World").unwrap();
        fs::write(temp.path().join("b.md"), "one two two").unwrap();
        fs::write(temp.path().join("c.bin"), [0xffu8, 0xfe]).unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested").join("d.txt"), "skipped").unwrap();
        temp
    }

    #[test]
    fn test_batch_without_steps_lists_files() {
        let temp = fixture();
        let out = FileBatchProcessor::default()
            .process(json!(temp.path().to_string_lossy()))
            .unwrap();

        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec![&key(&temp, "a.txt"), &key(&temp, "b.md"), &key(&temp, "c.bin")]);
        assert_eq!(out[key(&temp, "a.txt").as_str()], Value::Null);
    }

    #[test]
    fn test_batch_with_steps_and_errors() {
        let temp = fixture();
        let batch = FileBatchProcessor::from_params(&params(json!({
            "steps": [["tokenize", {"lowercase": true}]]
        })))
        .unwrap();
        let out = batch.process(json!(temp.path().to_string_lossy())).unwrap();

        assert_eq!(out[key(&temp, "a.txt").as_str()], json!(["hello", "world"]));
        assert_eq!(out[key(&temp, "b.md").as_str()], json!(["one", "two", "two"]));
        assert!(out[key(&temp, "c.bin").as_str()]["error"].is_string());
    }

    #[test]
    fn test_batch_extension_filter() {
        let temp = fixture();
        let batch = FileBatchProcessor::from_params(&params(json!({
            "extensions": [".TXT"],
            "steps": ["word_count"]
        })))
        .unwrap();
        let out = batch.process(json!(temp.path().to_string_lossy())).unwrap();

        assert_eq!(out.as_object().unwrap().len(), 1);
        assert_eq!(out[key(&temp, "a.txt").as_str()], json!({"Hello": 1, "World": 1}));
    }

    #[test]
    fn test_batch_requires_directory() {
        let temp = fixture();
        let file = key(&temp, "a.txt");
        assert!(matches!(
            FileBatchProcessor::default().process(json!(file)),
            Err(PipelineError::InvalidPath(_))
        ));
        assert!(matches!(
            FileBatchProcessor::default().process(json!({"dir": "."})),
            Err(PipelineError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_batch_build_options_from_params() {
        assert_eq!(FileBatchProcessor::default().build_options(), BuildOptions::default());

        let batch = FileBatchProcessor::from_params(&params(json!({
            "steps": ["clean"],
            "decorate_stages": false,
            "preview_chars": 8
        })))
        .unwrap();
        assert_eq!(
            batch.build_options(),
            BuildOptions {
                decorate_stages: false,
                preview_chars: 8
            }
        );

        let temp = fixture();
        let out = batch.process(json!(temp.path().to_string_lossy())).unwrap();
        assert_eq!(out[key(&temp, "a.txt").as_str()], json!("Hello World"));
    }
}
