//! Base tool traits and structures

use crate::error::{Result, ToolError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};
use uuid::Uuid;

/// Trait for all tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the name of the tool
    fn name(&self) -> &str;

    /// Get the description of the tool
    fn description(&self) -> &str;

    /// Get the JSON schema for the tool's parameters
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given parameters
    async fn execute(&self, call: ToolCall) -> Result<ToolResult>;

    /// Get examples of how to use this tool
    fn examples(&self) -> Vec<ToolExample> {
        Vec::new()
    }
}

/// A call to a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,

    /// Name of the tool to call
    pub name: String,

    /// Parameters to pass to the tool
    pub parameters: Value,

    /// Optional metadata
    pub metadata: Option<HashMap<String, Value>>,
}

/// Result of a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this is a result for
    pub tool_call_id: String,

    /// Whether the execution was successful
    pub success: bool,

    /// Result content
    pub content: String,

    /// Optional structured data
    pub data: Option<Value>,

    /// Execution duration in milliseconds
    pub duration_ms: Option<u64>,

    /// Optional metadata
    pub metadata: Option<HashMap<String, Value>>,
}

/// Example usage of a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExample {
    /// Description of what this example does
    pub description: String,

    /// Example parameters
    pub parameters: Value,

    /// Expected result description
    pub expected_result: String,
}

/// Tool definition in the shape LLM function calling expects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Tool executor that manages tool execution
pub struct ToolExecutor {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new<S: Into<String>>(name: S, parameters: Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            parameters,
            metadata: None,
        }
    }

    /// Deserialize all parameters into a typed argument struct
    pub fn parse_parameters<T>(&self) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        serde_json::from_value(self.parameters.clone()).map_err(|e| {
            ToolError::InvalidParameters {
                message: e.to_string(),
            }
            .into()
        })
    }
}

impl ToolResult {
    /// Create a successful result
    pub fn success<S: Into<String>>(tool_call_id: S, content: S) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            success: true,
            content: content.into(),
            data: None,
            duration_ms: None,
            metadata: None,
        }
    }

    /// Create an error result
    pub fn error<S: Into<String>>(tool_call_id: S, error: S) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            success: false,
            content: format!("Error: {}", error.into()),
            data: None,
            duration_ms: None,
            metadata: None,
        }
    }

    /// Set structured data
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Set execution duration
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// Check `parameters` against a tool's JSON schema.
///
/// Covers what tool schemas here actually declare: an object with
/// `required` names and primitively typed `properties`.
pub fn validate_parameters(schema: &Value, parameters: &Value) -> Result<()> {
    let invalid = |message: String| -> crate::error::Error {
        ToolError::InvalidParameters { message }.into()
    };

    let params = parameters
        .as_object()
        .ok_or_else(|| invalid("Parameters must be a JSON object".to_string()))?;

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            match params.get(name) {
                None | Some(Value::Null) => {
                    return Err(invalid(format!("Missing parameter: {}", name)));
                }
                Some(_) => {}
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (name, value) in params {
            let expected = properties
                .get(name)
                .and_then(|prop| prop.get("type"))
                .and_then(Value::as_str);

            if let Some(expected) = expected {
                if !value.is_null() && !matches_type(expected, value) {
                    return Err(invalid(format!(
                        "Invalid parameter type for: {} (expected {})",
                        name, expected
                    )));
                }
            }
        }
    }

    Ok(())
}

fn matches_type(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "boolean" => value.is_boolean(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        _ => true,
    }
}

impl ToolExecutor {
    /// Create a new tool executor
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool
    pub fn register_tool(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Execute a tool call.
    ///
    /// Unknown tools are an `Err`; failures inside a known tool, including
    /// parameter validation, come back as a failed `ToolResult`.
    pub async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let tool = self
            .get_tool(&call.name)
            .ok_or_else(|| ToolError::NotFound {
                name: call.name.clone(),
            })?;

        let start_time = std::time::Instant::now();
        let call_id = call.id.clone();
        debug!("Executing tool '{}' (call {})", call.name, call_id);

        let result = match validate_parameters(&tool.parameters_schema(), &call.parameters) {
            Ok(()) => tool.execute(call).await,
            Err(e) => Err(e),
        };
        let duration = start_time.elapsed().as_millis() as u64;

        match result {
            Ok(mut result) => {
                result.duration_ms = Some(duration);
                Ok(result)
            }
            Err(e) => {
                warn!("Tool call {} failed: {}", call_id, e);
                Ok(ToolResult::error(&call_id, &e.to_string()).with_duration(duration))
            }
        }
    }

    /// Get tool definitions for LLM function calling
    pub fn get_tool_definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|tool| ToolDefinition {
                tool_type: "function".to_string(),
                function: FunctionDefinition {
                    name: tool.name().to_string(),
                    description: tool.description().to_string(),
                    parameters: tool.parameters_schema(),
                },
            })
            .collect();
        definitions.sort_by(|a, b| a.function.name.cmp(&b.function.name));
        definitions
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}
