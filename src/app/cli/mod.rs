//! CLI Adapter.

mod export;
mod serve;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::app::commands::prompt;
use crate::app::config::load_config;
use crate::domain::{AppError, GuidiaConfig};

const DEFAULT_LOG_FILTER: &str = "guidia=info,tower_http=info";

#[derive(Parser)]
#[command(name = "guidia")]
#[command(version)]
#[command(
    about = "Inclusive lesson-planning assistant for teachers",
    long_about = None
)]
struct Cli {
    /// Path to guidia.toml
    #[arg(short, long, global = true, env = "GUIDIA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web application
    #[clap(visible_alias = "s")]
    Serve {
        /// Override server.bind (for example 0.0.0.0:8050)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Print the instruction assembled from a request JSON file
    #[clap(visible_alias = "p")]
    Prompt {
        /// JSON-encoded generation request
        request: PathBuf,
    },
    /// Export a Markdown file to PDF
    #[clap(visible_alias = "e")]
    Export {
        /// Markdown input
        input: PathBuf,
        /// PDF output path
        output: PathBuf,
    },
}

/// Entry point for the CLI.
pub fn run() {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), AppError> = load_config(cli.config.as_deref()).and_then(|config| {
        match cli.command {
            Commands::Serve { bind } => serve::run_serve(config, bind),
            Commands::Prompt { request } => run_prompt(&config, &request),
            Commands::Export { input, output } => export::run_export(&config, &input, &output),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_prompt(config: &GuidiaConfig, request: &Path) -> Result<(), AppError> {
    let instruction =
        prompt::assemble_from_file(request, &config.assistant.instruction_settings())?;
    print!("{}", instruction);
    Ok(())
}
