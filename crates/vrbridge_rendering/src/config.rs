//! Render configuration.

use serde::{Deserialize, Serialize};

use vrbridge_core::{BridgeError, BridgeResult};
use vrbridge_shared::constants::{
    EYE_SEPARATION_M, FAR_CLIP_M, FIELD_OF_VIEW_DEG, NEAR_CLIP_M, RESIZE_TOLERANCE_PX,
};

/// Stereo pipeline settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Distance between the eye cameras (meters).
    pub eye_separation_m: f32,
    /// Near clip plane (meters).
    pub near_clip_m: f32,
    /// Far clip plane (meters).
    pub far_clip_m: f32,
    /// Vertical field of view before the runtime reports a projection (degrees).
    pub field_of_view_deg: f32,
    /// Growth in either dimension tolerated before reallocating (pixels).
    pub resize_tolerance_px: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            eye_separation_m: EYE_SEPARATION_M,
            near_clip_m: NEAR_CLIP_M,
            far_clip_m: FAR_CLIP_M,
            field_of_view_deg: FIELD_OF_VIEW_DEG,
            resize_tolerance_px: RESIZE_TOLERANCE_PX,
        }
    }
}

impl RenderConfig {
    /// Checks clip planes, field of view and eye separation.
    ///
    /// # Errors
    ///
    /// [`BridgeError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> BridgeResult<()> {
        if self.eye_separation_m.is_nan() || self.eye_separation_m < 0.0 {
            return Err(BridgeError::InvalidConfig(format!(
                "eye_separation_m must not be negative, got {}",
                self.eye_separation_m
            )));
        }
        if self.near_clip_m.is_nan() || self.near_clip_m <= 0.0 || self.far_clip_m <= self.near_clip_m {
            return Err(BridgeError::InvalidConfig(format!(
                "clip planes must satisfy 0 < near < far, got {}..{}",
                self.near_clip_m, self.far_clip_m
            )));
        }
        if !(self.field_of_view_deg > 0.0 && self.field_of_view_deg < 180.0) {
            return Err(BridgeError::InvalidConfig(format!(
                "field_of_view_deg must be in (0, 180), got {}",
                self.field_of_view_deg
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RenderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_clip_rejected() {
        let config = RenderConfig { near_clip_m: 10.0, far_clip_m: 1.0, ..RenderConfig::default() };
        assert!(config.validate().is_err());
    }
}
