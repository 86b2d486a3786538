// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;
use text_pipeline::utils::logging::{format_error, format_info, format_success};
use text_pipeline::{Config, FileType, Params, PipelineDefinition, TextProcessingApi};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "text_pipeline")]
#[command(version = "0.1.0")]
#[command(about = "Composable text, file and matrix processing pipelines", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Log every stage's input and output
    #[arg(long, action = ArgAction::SetTrue)]
    log_stages: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a pipeline over a text argument
    Text {
        text: String,

        /// Stage list as JSON, e.g. '["clean", ["keywords", {"top_k": 3}]]'
        #[arg(short, long, default_value = "[]")]
        steps: String,

        /// Parameters shared by every stage, as a JSON object
        #[arg(short, long)]
        params: Option<String>,
    },

    /// Run a pipeline over a file, detecting its type unless given
    File {
        path: String,

        #[arg(short, long, default_value = "[]")]
        steps: String,

        #[arg(long, value_enum)]
        file_type: Option<FileTypeArg>,

        #[arg(short, long)]
        params: Option<String>,
    },

    /// Run a pipeline over a matrix given as a JSON array of rows
    Matrix {
        matrix: String,

        #[arg(short, long, default_value = "[]")]
        steps: String,

        #[arg(short, long)]
        params: Option<String>,
    },

    /// List registered processor names
    Processors,
}

#[derive(Clone, Copy, ValueEnum)]
enum FileTypeArg {
    Text,
    Csv,
}

impl From<FileTypeArg> for FileType {
    fn from(arg: FileTypeArg) -> Self {
        match arg {
            FileTypeArg::Text => FileType::Text,
            FileTypeArg::Csv => FileType::Csv,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", format_error(&format!("{:#}", e)));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_found = cli.config.exists();
    let config = if config_found {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        Config::default_config()
    };

    text_pipeline::utils::logging::init_logger(
        cli.color && config.logging.colored,
        cli.verbose || config.logging.verbose,
    );

    if config_found {
        info!("Loaded configuration from: {}", cli.config.display());
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
    }

    TextProcessingApi::set_logging(cli.log_stages || config.logging.enabled);
    let api = TextProcessingApi::new(config);

    let output = match cli.command {
        Commands::Text {
            text,
            steps,
            params,
        } => {
            let (steps, params) = parse_pipeline(&steps, params.as_deref())?;
            api.process_text(&text, &steps, &params)
                .context("Text pipeline failed")?
        }
        Commands::File {
            path,
            steps,
            file_type,
            params,
        } => {
            let (steps, params) = parse_pipeline(&steps, params.as_deref())?;
            api.process_file(&path, &steps, file_type.map(FileType::from), &params)
                .with_context(|| format!("File pipeline failed for {}", path))?
        }
        Commands::Matrix {
            matrix,
            steps,
            params,
        } => {
            let matrix: Value =
                serde_json::from_str(&matrix).context("Matrix must be a JSON array of rows")?;
            let (steps, params) = parse_pipeline(&steps, params.as_deref())?;
            api.process_matrix(&matrix, &steps, &params)
                .context("Matrix pipeline failed")?
        }
        Commands::Processors => {
            let names = TextProcessingApi::list_available_processors();
            println!("{}", format_info(&format!("{} processors registered", names.len())));
            for name in names {
                println!("  {}", name);
            }
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    eprintln!("{}", format_success("Pipeline complete"));
    Ok(())
}

fn parse_pipeline(steps: &str, params: Option<&str>) -> Result<(PipelineDefinition, Params)> {
    let steps: PipelineDefinition =
        serde_json::from_str(steps).context("--steps must be a JSON array of stages")?;

    let params = match params {
        Some(raw) => serde_json::from_str::<Params>(raw)
            .context("--params must be a JSON object")?,
        None => Params::new(),
    };

    Ok((steps, params))
}
