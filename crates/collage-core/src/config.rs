//! Controller configuration.

use crate::clock::Duration;
use crate::model::DEFAULT_TEMPLATE_SIZE;
use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delay before full render quality is restored after interaction settles.
pub const DEFAULT_QUALITY_DELAY_MS: u64 = 300;

/// Offset between successive items added in one batch.
pub const DEFAULT_CASCADE_STEP: Vec2 = Vec2::new(20.0, 20.0);

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tunables of the scene controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Debounce delay of the quality restore timer, in milliseconds.
    pub quality_delay_ms: u64,
    /// Footprint of templates added from the toolbar.
    pub template_size: Size,
    /// Diagonal step between items added in one batch.
    pub cascade_step: Vec2,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            quality_delay_ms: DEFAULT_QUALITY_DELAY_MS,
            template_size: DEFAULT_TEMPLATE_SIZE,
            cascade_step: DEFAULT_CASCADE_STEP,
        }
    }
}

impl ControlConfig {
    /// Parse and validate a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.template_size.width <= 0.0 || self.template_size.height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "template size must be positive, got {}x{}",
                self.template_size.width, self.template_size.height
            )));
        }
        Ok(())
    }

    pub fn quality_delay(&self) -> Duration {
        Duration::from_millis(self.quality_delay_ms)
    }
}
