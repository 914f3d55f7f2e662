//! # Bridge Configuration
//!
//! One TOML file, one table per component. Every key is optional; missing
//! keys take the documented defaults.
//!
//! ```toml
//! display_refresh_hz = 90
//!
//! [gestures]
//! jump_velocity = 1.8
//!
//! [rig]
//! snap_turn_angle_deg = 45.0
//!
//! [render]
//! eye_separation_m = 0.063
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use vrbridge_core::{ActionBindings, BridgeError, BridgeResult};
use vrbridge_rendering::RenderConfig;
use vrbridge_rig::RigConfig;
use vrbridge_shared::constants::{DISPLAY_REFRESH_HZ, PULSE_HOLD_S};
use vrbridge_tracking::GestureConfig;

/// Everything the bridge reads at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Display refresh rate; sets the frame budget.
    pub display_refresh_hz: u32,
    /// How long tap pulses hold the key down (s).
    pub pulse_hold_s: f32,
    /// Input action names.
    pub actions: ActionBindings,
    /// Gesture thresholds and button bindings.
    pub gestures: GestureConfig,
    /// Camera rig tuning.
    pub rig: RigConfig,
    /// Stereo pipeline settings.
    pub render: RenderConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            display_refresh_hz: DISPLAY_REFRESH_HZ,
            pulse_hold_s: PULSE_HOLD_S,
            actions: ActionBindings::default(),
            gestures: GestureConfig::default(),
            rig: RigConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`BridgeError::InvalidConfig`] on syntax errors, unknown value types
    /// or failed validation.
    pub fn from_toml_str(text: &str) -> BridgeResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| BridgeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`BridgeError::ConfigIo`] when the file cannot be read, otherwise as
    /// [`BridgeConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| BridgeError::ConfigIo {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Renders as TOML.
    ///
    /// # Errors
    ///
    /// [`BridgeError::InvalidConfig`] if a value cannot be represented.
    pub fn to_toml_string(&self) -> BridgeResult<String> {
        toml::to_string(self).map_err(|e| BridgeError::InvalidConfig(e.to_string()))
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// [`BridgeError::InvalidConfig`] for the first bad value.
    pub fn validate(&self) -> BridgeResult<()> {
        if self.display_refresh_hz == 0 {
            return Err(BridgeError::InvalidConfig("display_refresh_hz must be positive".to_string()));
        }
        if self.pulse_hold_s.is_nan() || self.pulse_hold_s < 0.0 {
            return Err(BridgeError::InvalidConfig(format!(
                "pulse_hold_s must not be negative, got {}",
                self.pulse_hold_s
            )));
        }
        self.gestures.validate()?;
        self.rig.validate()?;
        self.render.validate()
    }

    /// Nominal seconds per display frame.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.display_refresh_hz.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(BridgeConfig::from_toml_str("").unwrap(), BridgeConfig::default());
    }

    #[test]
    fn test_frame_dt() {
        let config = BridgeConfig { display_refresh_hz: 120, ..BridgeConfig::default() };
        assert!((config.frame_dt() - 1.0 / 120.0).abs() < 1e-7);
    }

    #[test]
    fn test_zero_refresh_rejected() {
        let err = BridgeConfig::from_toml_str("display_refresh_hz = 0").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidConfig(_)));
    }
}
