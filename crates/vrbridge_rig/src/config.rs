//! Rig configuration.

use serde::{Deserialize, Serialize};

use vrbridge_core::{BridgeError, BridgeResult};
use vrbridge_shared::constants::{
    BODY_ROTATION_SPEED_DEG, CURSOR_DISTANCE_M, POSITION_OFFSET, RUN_ACTIVATION_COOLDOWN_S,
    RUN_STICK_THRESHOLD, SNAP_TURN_ANGLE_DEG, SNAP_TURN_RESET, SNAP_TURN_THRESHOLD, STICK_DEADZONE,
};
use vrbridge_shared::Vec3;

/// Camera rig tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Tracking origin offset in reference-camera space (meters).
    pub position_offset: Vec3,
    /// Yaw increment per snap-turn (degrees).
    pub snap_turn_angle_deg: f32,
    /// Stick deflection that triggers a snap-turn.
    pub snap_turn_threshold: f32,
    /// Stick deflection below which snap-turn re-arms.
    pub snap_turn_reset: f32,
    /// Body alignment speed (degrees per second).
    pub body_rotation_speed_deg: f32,
    /// Minimum time between run activations (s).
    pub run_activation_cooldown_s: f32,
    /// Forward deflection that starts running.
    pub run_stick_threshold: f32,
    /// Forward deflection below which running stops.
    pub stick_deadzone: f32,
    /// Menu cursor distance along head gaze (meters).
    pub cursor_distance_m: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            position_offset: POSITION_OFFSET,
            snap_turn_angle_deg: SNAP_TURN_ANGLE_DEG,
            snap_turn_threshold: SNAP_TURN_THRESHOLD,
            snap_turn_reset: SNAP_TURN_RESET,
            body_rotation_speed_deg: BODY_ROTATION_SPEED_DEG,
            run_activation_cooldown_s: RUN_ACTIVATION_COOLDOWN_S,
            run_stick_threshold: RUN_STICK_THRESHOLD,
            stick_deadzone: STICK_DEADZONE,
            cursor_distance_m: CURSOR_DISTANCE_M,
        }
    }
}

impl RigConfig {
    /// Rejects settings that would break the debounce or hysteresis bands.
    ///
    /// # Errors
    ///
    /// [`BridgeError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> BridgeResult<()> {
        if !(0.0..=1.0).contains(&self.snap_turn_threshold) {
            return Err(BridgeError::InvalidConfig(format!(
                "snap_turn_threshold must be in 0..=1, got {}",
                self.snap_turn_threshold
            )));
        }
        if !(0.0..self.snap_turn_threshold).contains(&self.snap_turn_reset) {
            return Err(BridgeError::InvalidConfig(format!(
                "snap_turn_reset must be in 0..snap_turn_threshold, got {}",
                self.snap_turn_reset
            )));
        }
        if !(0.0..self.run_stick_threshold).contains(&self.stick_deadzone) {
            return Err(BridgeError::InvalidConfig(format!(
                "stick_deadzone must be in 0..run_stick_threshold, got {}",
                self.stick_deadzone
            )));
        }
        let non_negative = [
            ("snap_turn_angle_deg", self.snap_turn_angle_deg),
            ("body_rotation_speed_deg", self.body_rotation_speed_deg),
            ("run_activation_cooldown_s", self.run_activation_cooldown_s),
            ("cursor_distance_m", self.cursor_distance_m),
        ];
        for (name, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(BridgeError::InvalidConfig(format!("{name} must not be negative, got {value}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RigConfig::default().validate().is_ok());
    }

    #[test]
    fn test_reset_above_threshold_rejected() {
        let config = RigConfig { snap_turn_reset: 0.8, ..RigConfig::default() };
        assert!(matches!(config.validate(), Err(BridgeError::InvalidConfig(_))));
    }

    #[test]
    fn test_negative_speed_rejected() {
        let config = RigConfig { body_rotation_speed_deg: -10.0, ..RigConfig::default() };
        assert!(config.validate().is_err());
    }
}
