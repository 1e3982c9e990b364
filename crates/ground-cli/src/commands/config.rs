//! Config command implementation

use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;
use std::path::Path;

pub fn execute(config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config(config_path)?;
    output.config(&config)
}
