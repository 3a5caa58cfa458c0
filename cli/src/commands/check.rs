//! Extractor readiness check

use anyhow::{anyhow, Result};
use pdfx_core::ExtractorConfig;
use tracing::info;

/// Report whether the configured interpreter and script can be found
pub async fn check_command(config: &ExtractorConfig) -> Result<()> {
    info!("Checking extractor configuration");

    let mut ready = true;

    match config.locate_interpreter() {
        Some(path) => println!("✅ Interpreter: {} ({})", config.interpreter, path.display()),
        None => {
            println!("❌ Interpreter: {} not found on PATH", config.interpreter);
            ready = false;
        }
    }

    let script = config.script_path();
    if script.is_file() {
        println!("✅ Script: {}", script.display());
    } else {
        println!("❌ Script: {} does not exist", script.display());
        ready = false;
    }

    if let Some(dir) = &config.working_directory {
        println!("📁 Working directory: {}", dir.display());
    }
    match config.timeout_seconds {
        Some(seconds) => println!("⏱️  Timeout: {}s", seconds),
        None => println!("⏱️  Timeout: none"),
    }

    if ready {
        Ok(())
    } else {
        Err(anyhow!("Extractor is not ready"))
    }
}
