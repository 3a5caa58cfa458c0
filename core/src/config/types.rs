//! Extractor configuration types
//!
//! Core only accepts fully resolved, validated configuration.
//! All discovery, loading, and merging happens in CLI layer.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default interpreter used to run the extractor script
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Default location of the extractor script, relative to the working directory.
///
/// Matches where opencode projects keep custom tool scripts, so an existing
/// `.opencode/tools/pdf_extract.py` works without a config file.
pub const DEFAULT_SCRIPT: &str = ".opencode/tools/pdf_extract.py";

/// How to invoke the external extractor script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Program that runs the script (looked up on PATH when not absolute)
    pub interpreter: String,
    /// Path of the extractor script, passed as the interpreter's first argument
    pub script: PathBuf,
    /// Directory the extractor runs in; inherits the caller's when unset
    #[serde(default)]
    pub working_directory: Option<PathBuf>,
    /// Kill the extractor after this many seconds; no limit when unset
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    /// Extra environment variables for the extractor process
    #[serde(default)]
    pub environment: HashMap<String, String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            script: PathBuf::from(DEFAULT_SCRIPT),
            working_directory: None,
            timeout_seconds: None,
            environment: HashMap::new(),
        }
    }
}

impl ExtractorConfig {
    /// Create a config for the given interpreter and script
    pub fn new<S: Into<String>, P: Into<PathBuf>>(interpreter: S, script: P) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
            ..Default::default()
        }
    }

    /// Set the working directory
    pub fn with_working_directory<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    /// Set the timeout in seconds
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Add an environment variable
    pub fn with_env<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    /// Expand `~` and `$VAR` references in the script and working directory
    pub fn expand_paths(mut self) -> Result<Self, ConfigError> {
        self.script = expand_path(&self.script)?;
        if let Some(dir) = &self.working_directory {
            self.working_directory = Some(expand_path(dir)?);
        }
        Ok(self)
    }

    /// Script path as the extractor process will see it
    pub fn script_path(&self) -> PathBuf {
        match &self.working_directory {
            Some(dir) if self.script.is_relative() => dir.join(&self.script),
            _ => self.script.clone(),
        }
    }

    /// Resolve the interpreter to an executable on PATH
    pub fn locate_interpreter(&self) -> Option<PathBuf> {
        which::which(&self.interpreter).ok()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interpreter.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "interpreter".to_string(),
            });
        }

        if self.script.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "script".to_string(),
            });
        }

        if self.timeout_seconds == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "timeout_seconds".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(())
    }
}

fn expand_path(path: &Path) -> Result<PathBuf, ConfigError> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw).map_err(|e| ConfigError::Expansion {
        value: raw.to_string(),
        message: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.as_ref()))
}
