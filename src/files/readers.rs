// file: src/files/readers.rs
// description: whole-file text readers and the path checks shared by file processors

use crate::error::{PipelineError, Result};
use crate::pipeline::processor::{FromParams, Params, Processor, parse_params};
use crate::utils::Validator;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "log"];
pub const CSV_EXTENSIONS: &[&str] = &["csv"];

/// Resolves a path input for `processor`. Files without an extension are
/// accepted; any other extension must appear in `accepted`.
pub fn resolve_path<S: AsRef<str>>(processor: &str, input: &Value, accepted: &[S]) -> Result<PathBuf> {
    let path = Validator::validate_file_path(Validator::path_input(input)?)?;

    if let Some(extension) = Validator::extension_of(&path)
        && !accepted
            .iter()
            .any(|e| e.as_ref().eq_ignore_ascii_case(&extension))
    {
        return Err(PipelineError::UnsupportedFileType {
            file_type: format!(".{}", extension),
        });
    }

    debug!("{} resolved {}", processor, path.display());
    Ok(path)
}

/// Accepted extensions: an explicit override, or the built-in defaults.
pub fn extension_list(overrides: Option<Vec<String>>, defaults: &[&str]) -> Vec<String> {
    overrides.unwrap_or_else(|| defaults.iter().map(|e| e.to_string()).collect())
}

pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| PipelineError::FileOperation {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads `path` as UTF-8, failing on invalid sequences.
pub fn read_utf8(path: &Path) -> Result<String> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|e| PipelineError::FileOperation {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e.utf8_error()),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeErrors {
    Strict,
    Replace,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextFileOptions {
    pub encoding: String,
    pub errors: DecodeErrors,
    pub extensions: Option<Vec<String>>,
}

impl Default for TextFileOptions {
    fn default() -> Self {
        Self {
            encoding: "utf-8".to_string(),
            errors: DecodeErrors::Strict,
            extensions: None,
        }
    }
}

/// Reads a .txt, .md or .log file (or one with no extension) into a string.
#[derive(Debug, Clone)]
pub struct TextFileReader {
    errors: DecodeErrors,
    extensions: Vec<String>,
}

impl TextFileReader {
    pub fn new(options: TextFileOptions) -> Result<Self> {
        let encoding = options.encoding.to_lowercase();
        if encoding != "utf-8" && encoding != "utf8" {
            return Err(PipelineError::parameter(
                "text_file",
                "encoding",
                format!("unsupported encoding '{}', only utf-8 is available", options.encoding),
            ));
        }
        Ok(Self {
            errors: options.errors,
            extensions: extension_list(options.extensions, TEXT_EXTENSIONS),
        })
    }
}

impl FromParams for TextFileReader {
    fn from_params(params: &Params) -> Result<Self> {
        Self::new(parse_params("text_file", params)?)
    }
}

impl Processor for TextFileReader {
    fn name(&self) -> &str {
        "text_file"
    }

    fn process(&self, input: Value) -> Result<Value> {
        let path = resolve_path("text_file", &input, &self.extensions)?;
        debug!("Reading text file: {}", path.display());

        let text = match self.errors {
            DecodeErrors::Strict => read_utf8(&path)?,
            DecodeErrors::Replace => String::from_utf8_lossy(&read_bytes(&path)?).into_owned(),
        };
        Ok(Value::String(text))
    }

    fn reads_path(&self) -> bool {
        true
    }
}

/// Returns the raw text of any text or csv file.
#[derive(Debug, Clone, Default)]
pub struct FileToText;

impl FromParams for FileToText {
    fn from_params(_params: &Params) -> Result<Self> {
        Ok(Self)
    }
}

impl Processor for FileToText {
    fn name(&self) -> &str {
        "file_to_text"
    }

    fn process(&self, input: Value) -> Result<Value> {
        let accepted: Vec<&str> = TEXT_EXTENSIONS.iter().chain(CSV_EXTENSIONS).copied().collect();
        let path = resolve_path("file_to_text", &input, &accepted)?;
        Ok(Value::String(read_utf8(&path)?))
    }

    fn reads_path(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn path_value(path: &Path) -> Value {
        Value::String(path.to_string_lossy().into_owned())
    }

    #[test]
    fn test_text_file_reads_supported_extensions() {
        let temp = TempDir::new().unwrap();
        let reader = TextFileReader::new(TextFileOptions::default()).unwrap();

        for name in ["notes.txt", "README.md", "server.log", "plain"] {
            let path = temp.path().join(name);
            fs::write(&path, "hello world").unwrap();
            assert_eq!(reader.process(path_value(&path)).unwrap(), json!("hello world"));
        }
    }

    #[test]
    fn test_text_file_rejects_other_extensions() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.json");
        fs::write(&path, "{}").unwrap();

        let reader = TextFileReader::new(TextFileOptions::default()).unwrap();
        let err = reader.process(path_value(&path)).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFileType { ref file_type } if file_type == ".json"));
    }

    #[test]
    fn test_text_file_invalid_paths() {
        let reader = TextFileReader::new(TextFileOptions::default()).unwrap();
        assert!(matches!(
            reader.process(json!("")),
            Err(PipelineError::InvalidPath(_))
        ));
        assert!(matches!(
            reader.process(json!("/definitely/not/here.txt")),
            Err(PipelineError::InvalidPath(_))
        ));
        assert!(matches!(
            reader.process(json!(42)),
            Err(PipelineError::InvalidPath(_))
        ));
        assert!(matches!(
            FileToText.process(json!(["a.txt"])),
            Err(PipelineError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_text_file_decode_modes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.txt");
        fs::write(&path, [b'o', b'k', 0xff]).unwrap();

        let strict = TextFileReader::new(TextFileOptions::default()).unwrap();
        assert!(matches!(
            strict.process(path_value(&path)),
            Err(PipelineError::FileOperation { .. })
        ));

        let lossy = TextFileReader::new(TextFileOptions {
            errors: DecodeErrors::Replace,
            ..TextFileOptions::default()
        })
        .unwrap();
        assert_eq!(lossy.process(path_value(&path)).unwrap(), json!("ok\u{fffd}"));
    }

    #[test]
    fn test_text_file_encoding_parameter() {
        let params = json!({"encoding": "latin-1"}).as_object().cloned().unwrap();
        assert!(matches!(
            TextFileReader::from_params(&params),
            Err(PipelineError::Parameter { .. })
        ));
    }

    #[test]
    fn test_text_file_extension_override() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.rst");
        fs::write(&path, "title").unwrap();

        let params = json!({"extensions": ["rst"]}).as_object().cloned().unwrap();
        let reader = TextFileReader::from_params(&params).unwrap();
        assert_eq!(reader.process(path_value(&path)).unwrap(), json!("title"));
    }

    #[test]
    fn test_file_to_text_accepts_csv() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("table.csv");
        fs::write(&path, "a,b\n1,2\n").unwrap();

        assert_eq!(FileToText.process(path_value(&path)).unwrap(), json!("a,b\n1,2\n"));
        assert!(FileToText.reads_path());
    }
}
