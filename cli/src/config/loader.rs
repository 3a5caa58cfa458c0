//! Simple CLI configuration loader for pdfx
//!
//! Implements single-source priority loading with flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./pdfx.json or ./.pdfx/config.json
//! 3. Git repository root: <repo_root>/.pdfx/config.json
//! 4. XDG config: $XDG_CONFIG_HOME/pdfx/config.json or the platform config dir
//! 5. Built-in defaults (no files)

use anyhow::{anyhow, Context, Result};
use pdfx_core::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Raw configuration file format; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Program that runs the extractor script
    pub interpreter: Option<String>,
    /// Extractor script path
    pub script: Option<PathBuf>,
    /// Directory the extractor runs in
    pub working_directory: Option<PathBuf>,
    /// Kill the extractor after this many seconds
    pub timeout_seconds: Option<u64>,
    /// Extra environment variables for the extractor
    #[serde(default)]
    pub environment: HashMap<String, String>,
}

/// CLI configuration loader
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Directory discovery starts from; the process cwd when unset
    current_dir: Option<PathBuf>,
    /// Flag overrides
    interpreter_override: Option<String>,
    script_override: Option<PathBuf>,
    timeout_override: Option<u64>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            config_override: None,
            current_dir: None,
            interpreter_override: None,
            script_override: None,
            timeout_override: None,
        }
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Start discovery from `dir` instead of the process cwd
    pub fn with_current_dir(mut self, dir: PathBuf) -> Self {
        self.current_dir = Some(dir);
        self
    }

    /// Set interpreter override
    pub fn with_interpreter_override(mut self, interpreter: String) -> Self {
        self.interpreter_override = Some(interpreter);
        self
    }

    /// Set script override
    pub fn with_script_override(mut self, script: PathBuf) -> Self {
        self.script_override = Some(script);
        self
    }

    /// Set timeout override
    pub fn with_timeout_override(mut self, seconds: u64) -> Self {
        self.timeout_override = Some(seconds);
        self
    }

    /// Load and resolve configuration
    pub async fn load(&self) -> Result<ExtractorConfig> {
        // Step 1: Find and load base configuration
        let mut config = if let Some(override_path) = &self.config_override {
            self.load_from_path(override_path).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?
        } else {
            self.search_and_load().await?
        };

        // Step 2: Apply flag overrides
        if let Some(interpreter) = &self.interpreter_override {
            config.interpreter = Some(interpreter.clone());
        }
        if let Some(script) = &self.script_override {
            config.script = Some(script.clone());
        }
        if let Some(timeout) = self.timeout_override {
            config.timeout_seconds = Some(timeout);
        }

        // Step 3: Resolve to final extractor config
        self.resolve_config(config)
    }

    /// Search for config in priority order
    async fn search_and_load(&self) -> Result<RawConfig> {
        let cwd = match &self.current_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        let candidates = [
            Some(cwd.join("pdfx.json")),
            Some(cwd.join(".pdfx").join("config.json")),
            find_git_root(&cwd).map(|root| root.join(".pdfx").join("config.json")),
            xdg_config_dir().map(|dir| dir.join("pdfx").join("config.json")),
        ];

        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                debug!("Using config file {}", path.display());
                return self.load_file(&path).await;
            }
        }

        debug!("No config file found, using defaults");
        Ok(RawConfig::default())
    }

    /// Load config from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<RawConfig> {
        if path.is_file() {
            self.load_file(path).await
        } else if path.is_dir() {
            let config_file = path.join("config.json");
            if config_file.exists() {
                self.load_file(&config_file).await
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    /// Load a single config file
    async fn load_file(&self, path: &Path) -> Result<RawConfig> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Resolve raw config to ExtractorConfig
    fn resolve_config(&self, raw: RawConfig) -> Result<ExtractorConfig> {
        let defaults = ExtractorConfig::default();

        let config = ExtractorConfig {
            interpreter: raw.interpreter.unwrap_or(defaults.interpreter),
            script: raw.script.unwrap_or(defaults.script),
            working_directory: raw.working_directory,
            timeout_seconds: raw.timeout_seconds,
            environment: raw.environment,
        }
        .expand_paths()?;

        config
            .validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

        Ok(config)
    }
}

impl Default for CliConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Find git repository root
fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Get XDG config directory
fn xdg_config_dir() -> Option<PathBuf> {
    match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfx_core::config::DEFAULT_SCRIPT;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[tokio::test]
    async fn test_cwd_file_takes_priority() {
        let dir = TempDir::new().unwrap();
        write(
            &dir.path().join("pdfx.json"),
            r#"{"interpreter": "python3.12", "timeout_seconds": 30}"#,
        );
        write(
            &dir.path().join(".pdfx/config.json"),
            r#"{"interpreter": "ignored"}"#,
        );

        let config = CliConfigLoader::new()
            .with_current_dir(dir.path().to_path_buf())
            .load()
            .await
            .unwrap();

        assert_eq!(config.interpreter, "python3.12");
        assert_eq!(config.timeout_seconds, Some(30));
        assert_eq!(config.script, PathBuf::from(DEFAULT_SCRIPT));
    }

    #[tokio::test]
    async fn test_dot_dir_config() {
        let dir = TempDir::new().unwrap();
        write(
            &dir.path().join(".pdfx/config.json"),
            r#"{"script": "scripts/extract.py", "environment": {"PYTHONUTF8": "1"}}"#,
        );

        let config = CliConfigLoader::new()
            .with_current_dir(dir.path().to_path_buf())
            .load()
            .await
            .unwrap();

        assert_eq!(config.script, PathBuf::from("scripts/extract.py"));
        assert_eq!(
            config.environment.get("PYTHONUTF8").map(String::as_str),
            Some("1")
        );
    }

    #[tokio::test]
    async fn test_git_root_config() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        write(
            &dir.path().join(".pdfx/config.json"),
            r#"{"interpreter": "from-git-root"}"#,
        );
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let config = CliConfigLoader::new()
            .with_current_dir(nested)
            .load()
            .await
            .unwrap();

        assert_eq!(config.interpreter, "from-git-root");
    }

    #[tokio::test]
    async fn test_override_directory_and_flags() {
        let dir = TempDir::new().unwrap();
        write(
            &dir.path().join("conf/config.json"),
            r#"{"interpreter": "python3", "script": "a.py", "timeout_seconds": 5}"#,
        );

        let config = CliConfigLoader::new()
            .with_config_override(dir.path().join("conf"))
            .with_interpreter_override("pypy3".to_string())
            .with_timeout_override(60)
            .load()
            .await
            .unwrap();

        assert_eq!(config.interpreter, "pypy3");
        assert_eq!(config.script, PathBuf::from("a.py"));
        assert_eq!(config.timeout_seconds, Some(60));
    }

    #[tokio::test]
    async fn test_empty_file_resolves_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        write(&path, "{}");

        let config = CliConfigLoader::new()
            .with_config_override(path)
            .load()
            .await
            .unwrap();

        assert_eq!(config, ExtractorConfig::default());
    }

    #[tokio::test]
    async fn test_bad_configs_are_rejected() {
        let dir = TempDir::new().unwrap();

        let missing = CliConfigLoader::new()
            .with_config_override(dir.path().join("nope.json"))
            .load()
            .await;
        assert!(missing.is_err());

        let malformed = dir.path().join("bad.json");
        write(&malformed, "{ not json");
        let err = CliConfigLoader::new()
            .with_config_override(malformed)
            .load()
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));

        let unknown = dir.path().join("unknown.json");
        write(&unknown, r#"{"interpeter": "typo"}"#);
        assert!(CliConfigLoader::new()
            .with_config_override(unknown)
            .load()
            .await
            .is_err());

        let zero_timeout = dir.path().join("zero.json");
        write(&zero_timeout, r#"{"timeout_seconds": 0}"#);
        let err = CliConfigLoader::new()
            .with_config_override(zero_timeout)
            .load()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("validation failed"));
    }
}
