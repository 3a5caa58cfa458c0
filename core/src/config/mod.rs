//! Minimal configuration module for pdfx core
//!
//! Only exports pure data types. All loading logic is in CLI layer.

pub mod types;

pub use types::{ExtractorConfig, DEFAULT_INTERPRETER, DEFAULT_SCRIPT};
