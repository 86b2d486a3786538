// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::pipeline::BuildOptions;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub files: FileConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Initial state of the per-stage logging flag.
    pub enabled: bool,
    pub verbose: bool,
    pub colored: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileConfig {
    /// Bytes read from an extensionless file to guess its type.
    pub sniff_bytes: usize,
    pub text_extensions: Vec<String>,
    pub csv_extensions: Vec<String>,
    pub unsupported_extensions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    pub decorate_stages: bool,
    pub preview_chars: usize,
}

impl PipelineConfig {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            decorate_stages: self.decorate_stages,
            preview_chars: self.preview_chars,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("TEXT_PIPELINE")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("files.text_extensions")
                .with_list_parse_key("files.csv_extensions")
                .with_list_parse_key("files.unsupported_extensions")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            logging: LoggingConfig {
                enabled: false,
                verbose: false,
                colored: true,
            },
            files: FileConfig {
                sniff_bytes: 1024,
                text_extensions: vec!["txt".to_string(), "md".to_string(), "log".to_string()],
                csv_extensions: vec!["csv".to_string()],
                unsupported_extensions: vec![
                    "json".to_string(),
                    "xml".to_string(),
                    "yml".to_string(),
                    "yaml".to_string(),
                ],
            },
            pipeline: PipelineConfig {
                decorate_stages: true,
                preview_chars: 50,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.files.sniff_bytes == 0 {
            return Err(PipelineError::Config(
                "sniff_bytes must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.preview_chars == 0 {
            return Err(PipelineError::Config(
                "preview_chars must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[logging]
enabled = true
verbose = false
colored = false

[files]
sniff_bytes = 256
text_extensions = ["txt"]
csv_extensions = ["csv", "tsv"]
unsupported_extensions = ["json"]

[pipeline]
decorate_stages = false
preview_chars = 20
"#;

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pipeline.toml");
        fs::write(&path, SAMPLE).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(config.logging.enabled);
        assert_eq!(config.files.sniff_bytes, 256);
        assert_eq!(config.files.csv_extensions, vec!["csv", "tsv"]);
        assert!(!config.pipeline.build_options().decorate_stages);
        assert_eq!(config.pipeline.build_options().preview_chars, 20);
    }

    #[test]
    fn test_load_rejects_zero_sniff_bytes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pipeline.toml");
        fs::write(&path, SAMPLE.replace("sniff_bytes = 256", "sniff_bytes = 0")).unwrap();

        assert!(matches!(
            Config::load(Some(&path)),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.files.sniff_bytes, 1024);
        assert!(!config.logging.enabled);
    }

    #[test]
    fn test_validate_preview_chars() {
        let mut config = Config::default_config();
        config.pipeline.preview_chars = 0;
        assert!(config.validate().is_err());
    }
}
