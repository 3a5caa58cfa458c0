//! Tools listing command

use anyhow::Result;
use pdfx_core::ToolRegistry;
use tracing::info;

/// Show available tools
pub async fn tools_command(registry: &ToolRegistry) -> Result<()> {
    info!("Listing available tools");

    println!("🛠️  Available Tools\n");

    for name in registry.list_tools() {
        if let Some((tool_name, description)) = registry.get_tool_info(name) {
            println!("📦 {}", tool_name);
            // Show first line of description only for brevity
            let first_line = description.lines().next().unwrap_or(description);
            println!("   {}\n", first_line);
        }
    }

    println!("💡 Use `pdfx schema <NAME>` to see a tool's arguments.");

    Ok(())
}
