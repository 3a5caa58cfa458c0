//! PDF extraction tool backed by an external extractor script

use crate::config::ExtractorConfig;
use crate::error::{Result, ToolError};
use crate::tools::builtin::pdf_report::ExtractionReport;
use crate::tools::utils::{execute_command, CommandOptions};
use crate::tools::{Tool, ToolCall, ToolExample, ToolFactory, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::ffi::OsStr;
use tracing::{debug, warn};

const TOOL_NAME: &str = "pdf_extract";
const DESCRIPTION: &str = "Extract text, metadata, and images from a PDF";

#[derive(Debug, Deserialize)]
struct PdfExtractArgs {
    path: String,
}

/// Runs `<interpreter> <script> <path>` and returns the script's trimmed stdout.
///
/// The tool holds nothing but its configuration, so concurrent calls share no
/// state and each gets its own extractor process.
pub struct PdfExtractTool {
    config: ExtractorConfig,
}

impl PdfExtractTool {
    /// Create a new PDF extraction tool
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    fn failed(&self, message: String) -> ToolError {
        ToolError::ExecutionFailed {
            name: TOOL_NAME.to_string(),
            message,
        }
    }

    /// Run the extractor and return its trimmed stdout
    async fn extract(&self, path: &str) -> Result<String> {
        let options = CommandOptions {
            timeout_seconds: self.config.timeout_seconds,
            working_directory: self.config.working_directory.clone(),
            environment: self.config.environment.clone(),
        };

        let args = [self.config.script.as_os_str(), OsStr::new(path)];
        let output = execute_command(&self.config.interpreter, args, options)
            .await
            .map_err(|e| {
                self.failed(format!(
                    "could not run '{}': {}",
                    self.config.interpreter, e
                ))
            })?;

        if output.timed_out {
            return Err(ToolError::Timeout {
                name: TOOL_NAME.to_string(),
                seconds: self.config.timeout_seconds.unwrap_or_default(),
            }
            .into());
        }

        if !output.success() {
            let stderr = output.stderr.trim();
            let message = if stderr.is_empty() {
                format!("extractor exited with code {}", output.exit_code)
            } else {
                format!("extractor exited with code {}: {}", output.exit_code, stderr)
            };
            warn!("Extraction of '{}' failed: {}", path, message);
            return Err(self.failed(message).into());
        }

        debug!(
            "Extracted {} bytes from '{}' in {}ms",
            output.stdout.len(),
            path,
            output.duration_ms
        );

        Ok(output.stdout.trim().to_string())
    }
}

#[async_trait]
impl Tool for PdfExtractTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the PDF file to extract"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let args: PdfExtractArgs = call.parse_parameters()?;

        let text = self.extract(&args.path).await?;
        let mut result = ToolResult::success(call.id.as_str(), text.as_str());

        if let Some(report) = ExtractionReport::parse(&text) {
            result = result.with_data(serde_json::to_value(report)?);
        }

        Ok(result)
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![
            ToolExample {
                description: "Extract a PDF in the working directory".to_string(),
                parameters: json!({"path": "docs/report.pdf"}),
                expected_result: "Text, metadata and embedded images of the PDF".to_string(),
            },
            ToolExample {
                description: "Extract a PDF by absolute path".to_string(),
                parameters: json!({"path": "/tmp/invoice.pdf"}),
                expected_result: "Extraction report for the invoice".to_string(),
            },
        ]
    }
}

/// Factory for creating PdfExtractTool instances
pub struct PdfExtractToolFactory {
    config: ExtractorConfig,
}

impl PdfExtractToolFactory {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }
}

impl ToolFactory for PdfExtractToolFactory {
    fn create(&self) -> Box<dyn Tool> {
        Box::new(PdfExtractTool::new(self.config.clone()))
    }

    fn tool_name(&self) -> &str {
        TOOL_NAME
    }

    fn tool_description(&self) -> &str {
        DESCRIPTION
    }
}
