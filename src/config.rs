//=========================================================================
// Engine Configuration
//=========================================================================
//
// TOML-backed configuration loaded once at startup.
//
// Format:
// ```toml
// [engine]
// tps = 60.0
// channel_capacity = 128
//
// [window]
// title = "Aetheric Stage"
// width = 800
// height = 600
//
// [machine]
// strict_transitions = false
// retention = "keep_resident"     # or "dispose_on_exit"
// construction = "lazy"           # or "eager"
// ```
//
// Every section and field is optional; omitted values fall back to the
// same defaults as `EngineBuilder::new()`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use log::info;
use serde::Deserialize;

//=== Internal Dependencies ===============================================

use crate::core::state::MachinePolicy;
use crate::error::ConfigError;

//=== Defaults ============================================================

const DEFAULT_TPS: f64 = 60.0;
const DEFAULT_CHANNEL_CAPACITY: usize = 128;
const DEFAULT_WINDOW_TITLE: &str = "Aetheric Stage";
const DEFAULT_WINDOW_WIDTH: u32 = 800;
const DEFAULT_WINDOW_HEIGHT: u32 = 600;

//=== EngineSection =======================================================

/// Core loop pacing and channel sizing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSection {
    /// Logic ticks per second.
    pub tps: f64,
    /// Platform → core channel capacity.
    pub channel_capacity: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            tps: DEFAULT_TPS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

//=== WindowSection =======================================================

/// Window attributes used by the platform layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowSection {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            title: DEFAULT_WINDOW_TITLE.to_string(),
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

//=== EngineConfig ========================================================

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub engine: EngineSection,
    pub window: WindowSection,
    pub machine: MachinePolicy,
}

impl EngineConfig {
    /// Parses and validates a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&text)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.engine.tps.is_finite() && self.engine.tps > 0.0) {
            return Err(ConfigError::Invalid {
                field: "engine.tps",
                reason: format!("must be positive, got {}", self.engine.tps),
            });
        }

        if self.engine.channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "engine.channel_capacity",
                reason: "must be positive".to_string(),
            });
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid {
                field: "window",
                reason: format!("size must be non-zero, got {}x{}", self.window.width, self.window.height),
            });
        }

        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
