//! # pdfx Core
//!
//! Core library for pdfx - PDF extraction exposed as an agent tool.
//!
//! This library provides the tool host building blocks (the [`tools::Tool`]
//! trait, a schema-validating executor and a factory registry) together with
//! the `pdf_extract` tool, which delegates the actual extraction to an
//! external script.

// Core modules
pub mod config;
pub mod error;
pub mod tools;

// Re-export commonly used types
pub use config::ExtractorConfig;
pub use error::{Error, Result, ToolError};
pub use tools::{Tool, ToolCall, ToolExecutor, ToolRegistry, ToolResult};

/// Current version of the pdfx-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing for the library
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize tracing with a specific debug mode
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}
