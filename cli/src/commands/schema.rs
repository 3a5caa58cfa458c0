//! Tool schema command

use anyhow::{anyhow, Result};
use pdfx_core::ToolRegistry;

/// Print tool definitions as JSON, for all tools or just `name`
pub async fn schema_command(registry: &ToolRegistry, name: Option<String>) -> Result<()> {
    let mut definitions = registry.create_executor_with_all().get_tool_definitions();

    if let Some(name) = &name {
        definitions.retain(|definition| &definition.function.name == name);
        if definitions.is_empty() {
            return Err(anyhow!("Unknown tool: {}", name));
        }
    }

    let output = match (name, definitions.as_slice()) {
        (Some(_), [definition]) => serde_json::to_string_pretty(definition)?,
        _ => serde_json::to_string_pretty(&definitions)?,
    };
    println!("{}", output);

    Ok(())
}
