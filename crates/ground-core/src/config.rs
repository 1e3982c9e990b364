use crate::error::{GroundError, Result};
use crate::models::{Style, User};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Min. distance in dp between two points for them to be considered overlapping
pub const DEFAULT_SNAP_THRESHOLD_DP: f64 = 24.0;

pub const DEFAULT_STYLE_COLOR: &str = "#ff9131";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    Default,
    File,
    Environment,
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Tuning for the polygon drawing controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingConfig {
    /// Pixel distance under which the camera target snaps to the first vertex
    pub snap_threshold_dp: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self { snap_threshold_dp: DEFAULT_SNAP_THRESHOLD_DP }
    }
}

/// Layered configuration for Ground
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub snap_threshold_dp: ConfigValue<f64>,
    pub default_style_color: ConfigValue<String>,
    pub user_email: ConfigValue<String>,
    pub user_display_name: ConfigValue<String>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            snap_threshold_dp: ConfigValue::new(DEFAULT_SNAP_THRESHOLD_DP, ConfigSource::Default),
            default_style_color: ConfigValue::new(
                DEFAULT_STYLE_COLOR.to_string(),
                ConfigSource::Default,
            ),
            user_email: ConfigValue::new("anonymous@localhost".to_string(), ConfigSource::Default),
            user_display_name: ConfigValue::new("Anonymous".to_string(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GroundError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GroundError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(threshold) = file_config.snap_threshold_dp {
            self.snap_threshold_dp.update(validate_threshold(threshold)?, ConfigSource::File);
        }

        if let Some(color) = file_config.default_style_color {
            self.default_style_color.update(color, ConfigSource::File);
        }

        if let Some(email) = file_config.user_email {
            self.user_email.update(email, ConfigSource::File);
        }

        if let Some(name) = file_config.user_display_name {
            self.user_display_name.update(name, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GROUND_SNAP_THRESHOLD_DP
        if let Ok(threshold_str) = env::var("GROUND_SNAP_THRESHOLD_DP") {
            match parse_threshold(&threshold_str) {
                Ok(threshold) => self.snap_threshold_dp.update(threshold, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GROUND_SNAP_THRESHOLD_DP value '{}': expected a non-negative number",
                    threshold_str
                ),
            }
        }

        if let Ok(color) = env::var("GROUND_DEFAULT_STYLE_COLOR") {
            self.default_style_color.update(color, ConfigSource::Environment);
        }

        if let Ok(email) = env::var("GROUND_USER_EMAIL") {
            self.user_email.update(email, ConfigSource::Environment);
        }

        if let Ok(name) = env::var("GROUND_USER_DISPLAY_NAME") {
            self.user_display_name.update(name, ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) -> Result<()> {
        if let Some(threshold) = overrides.snap_threshold_dp {
            self.snap_threshold_dp.update(validate_threshold(threshold)?, ConfigSource::Cli);
        }

        if let Some(color) = overrides.default_style_color {
            self.default_style_color.update(color, ConfigSource::Cli);
        }

        if let Some(email) = overrides.user_email {
            self.user_email.update(email, ConfigSource::Cli);
        }

        Ok(())
    }

    pub fn drawing(&self) -> DrawingConfig {
        DrawingConfig { snap_threshold_dp: self.snap_threshold_dp.value }
    }

    pub fn default_style(&self) -> Style {
        Style::new(self.default_style_color.value.clone())
    }

    /// The configured user; the email doubles as the user id
    pub fn user(&self) -> User {
        User {
            id: self.user_email.value.clone(),
            email: self.user_email.value.clone(),
            display_name: self.user_display_name.value.clone(),
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "snap_threshold_dp".to_string(),
            (self.snap_threshold_dp.value.to_string(), self.snap_threshold_dp.source),
        );

        map.insert(
            "default_style_color".to_string(),
            (self.default_style_color.value.clone(), self.default_style_color.source),
        );

        map.insert("user_email".to_string(), (self.user_email.value.clone(), self.user_email.source));

        map.insert(
            "user_display_name".to_string(),
            (self.user_display_name.value.clone(), self.user_display_name.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    snap_threshold_dp: Option<f64>,
    default_style_color: Option<String>,
    user_email: Option<String>,
    user_display_name: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub snap_threshold_dp: Option<f64>,
    pub default_style_color: Option<String>,
    pub user_email: Option<String>,
}

/// Parse a snap threshold from string
pub fn parse_threshold(s: &str) -> Result<f64> {
    let value = s.trim().parse::<f64>().map_err(|_| GroundError::ConfigInvalid {
        key: "snap_threshold_dp".to_string(),
        reason: format!("Invalid number: {}", s),
    })?;
    validate_threshold(value)
}

fn validate_threshold(value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(GroundError::ConfigInvalid {
            key: "snap_threshold_dp".to_string(),
            reason: format!("Threshold must be a non-negative number, got {}", value),
        })
    }
}
