//! CLI command implementations.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use folio_core::Config;

pub mod build;
pub mod check;

/// Command-line overrides layered over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Content root directory.
    pub root: Option<PathBuf>,
    /// Index output path.
    pub output: Option<PathBuf>,
    /// Separator marker token.
    pub separator_token: Option<String>,
    /// Fail on any error.
    pub strict: bool,
}

/// Load the configuration file and `FOLIO__*` environment variables
/// (defaults when both are absent), then apply command-line overrides.
pub fn load_config(config_path: &Path, overrides: Overrides) -> Result<Config> {
    let mut config =
        Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;

    if let Some(root) = overrides.root {
        tracing::info!(root = %root.display(), "Overriding content root from CLI");
        config.content.root = root;
    }

    if let Some(output) = overrides.output {
        config.output.path = output;
    }

    if let Some(token) = overrides.separator_token {
        config.content.separator_token = Some(token);
    }

    config.validation.strict |= overrides.strict;

    config
        .validate()
        .wrap_err("Invalid configuration after applying command-line overrides")?;

    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}
