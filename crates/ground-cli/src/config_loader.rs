//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use ground_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::Path;

/// Load layered configuration: defaults, then the optional file, then env
pub fn load_config(path: Option<&Path>) -> Result<LayeredConfig> {
    let config = match path {
        Some(path) => LayeredConfig::with_defaults()
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => LayeredConfig::with_defaults(),
    };

    Ok(config.load_from_env())
}

/// Load layered configuration with CLI overrides
pub fn load_config_with_overrides(
    path: Option<&Path>,
    overrides: CliConfigOverrides,
) -> Result<LayeredConfig> {
    let mut config = load_config(path)?;
    config.update_from_cli(overrides).context("Invalid command-line override")?;
    Ok(config)
}
