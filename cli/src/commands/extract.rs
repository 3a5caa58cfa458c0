//! Single extraction command

use anyhow::{anyhow, Result};
use pdfx_core::{ToolCall, ToolRegistry};
use serde_json::json;
use tracing::{debug, info};

/// Run the pdf_extract tool on `path` and print its result
pub async fn extract_command(registry: &ToolRegistry, path: String, as_json: bool) -> Result<()> {
    info!("Extracting: {}", path);

    let executor = registry.create_executor(&["pdf_extract".to_string()]);
    let result = executor
        .execute(ToolCall::new("pdf_extract", json!({ "path": path })))
        .await?;

    debug!(
        "pdf_extract finished in {}ms (success: {})",
        result.duration_ms.unwrap_or_default(),
        result.success
    );

    if as_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.success {
        println!("{}", result.content);
    }

    if result.success {
        Ok(())
    } else {
        let message = result.content.trim_start_matches("Error: ");
        Err(anyhow!("{}", message))
    }
}
