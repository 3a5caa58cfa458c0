//! Tool system and built-in tools

pub mod base;
pub mod builtin;
pub mod registry;
pub mod utils;

pub use base::{
    validate_parameters, FunctionDefinition, Tool, ToolCall, ToolDefinition, ToolExample,
    ToolExecutor, ToolResult,
};
pub use registry::{ToolFactory, ToolRegistry};
