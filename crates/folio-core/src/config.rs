//! Pipeline configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for Folio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Content source settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// Index output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Error policy settings.
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Content source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Content root directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// File extensions to load (without the leading dot).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Opaque token of the multi-document separator marker.
    ///
    /// When unset, every file is treated as a single document.
    #[serde(default)]
    pub separator_token: Option<String>,

    /// Files larger than this many bytes are not read.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Whether files are loaded and parsed on the rayon thread pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

/// Index output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON index written by `folio build`.
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Whether the JSON index is pretty-printed.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

/// Error policy configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Treat any load or validation error as fatal.
    #[serde(default)]
    pub strict: bool,
}

// Default value functions
fn default_root() -> PathBuf {
    PathBuf::from("content")
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string()]
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

fn default_output_path() -> PathBuf {
    PathBuf::from("index.json")
}

fn default_true() -> bool {
    true
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            extensions: default_extensions(),
            separator_token: None,
            max_file_size: default_max_file_size(),
            parallel: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            pretty: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, layering `FOLIO__*`
    /// environment variables over the file. A missing file yields the
    /// defaults plus any environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
        }

        let settings = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.content.root.as_os_str().is_empty() {
            return Err(CoreError::config("content.root cannot be empty"));
        }

        if self.content.extensions.is_empty() {
            return Err(CoreError::config(
                "content.extensions must list at least one extension",
            ));
        }

        if self
            .content
            .extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.').trim().is_empty())
        {
            return Err(CoreError::config(
                "content.extensions cannot contain empty entries",
            ));
        }

        if self.content.max_file_size == 0 {
            return Err(CoreError::config("content.max_file_size must be positive"));
        }

        if let Some(token) = &self.content.separator_token
            && token.trim().is_empty()
        {
            return Err(CoreError::config(
                "content.separator_token cannot be blank",
            ));
        }

        if self.output.path.as_os_str().is_empty() {
            return Err(CoreError::config("output.path cannot be empty"));
        }

        if self.content.extensions.iter().any(|ext| ext.starts_with('.')) {
            tracing::warn!("content.extensions entries should not start with a dot");
        }

        Ok(())
    }

    /// Normalized extension filter: lowercase, without leading dots.
    pub fn extensions(&self) -> Vec<String> {
        self.content
            .extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .collect()
    }
}
