//! # pdfx CLI
//!
//! Command-line interface for pdfx - PDF extraction exposed as an agent tool.
//!
//! ## Usage
//!
//! - `pdfx extract <PATH>` - Extract a PDF and print the result
//! - `pdfx tools` - Show available tools
//! - `pdfx schema [NAME]` - Print tool definitions as JSON
//! - `pdfx check` - Verify the extractor can be run

use anyhow::Result;
use clap::{Parser, Subcommand};
use pdfx_core::ToolRegistry;
use std::path::PathBuf;

mod commands;
mod config;

use commands::{check_command, extract_command, schema_command, tools_command};
use config::CliConfigLoader;

/// pdfx - PDF extraction exposed as an agent tool
#[derive(Parser)]
#[command(name = "pdfx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract text, metadata, and images from PDFs through an external extractor")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Interpreter that runs the extractor script
    #[arg(long, global = true, env = "PDFX_INTERPRETER")]
    interpreter: Option<String>,

    /// Extractor script path
    #[arg(long, global = true, env = "PDFX_SCRIPT")]
    script: Option<PathBuf>,

    /// Kill the extractor after this many seconds
    #[arg(long, global = true, env = "PDFX_TIMEOUT")]
    timeout: Option<u64>,

    /// Working directory
    #[arg(long, global = true)]
    working_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a PDF and print the result
    Extract {
        /// Path to the PDF file to extract
        path: String,

        /// Print the full tool result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show available tools
    Tools,

    /// Print tool definitions as JSON
    Schema {
        /// Only print this tool
        name: Option<String>,
    },

    /// Verify the configured interpreter and script can be found
    Check,
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(interpreter) = &cli.interpreter {
        loader = loader.with_interpreter_override(interpreter.clone());
    }

    if let Some(script) = &cli.script {
        loader = loader.with_script_override(script.clone());
    }

    if let Some(timeout) = cli.timeout {
        loader = loader.with_timeout_override(timeout);
    }

    loader
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for tool output
    pdfx_core::init_tracing_with_debug(cli.verbose);

    // Change working directory if specified
    if let Some(working_dir) = &cli.working_dir {
        std::env::set_current_dir(working_dir)?;
    }

    let config = build_config_loader(&cli).load().await?;
    tracing::debug!("Extractor config: {:?}", config);

    let registry = ToolRegistry::with_extractor_config(config.clone());

    match cli.command {
        Commands::Extract { path, json } => extract_command(&registry, path, json).await,
        Commands::Tools => tools_command(&registry).await,
        Commands::Schema { name } => schema_command(&registry, name).await,
        Commands::Check => check_command(&config).await,
    }
}
