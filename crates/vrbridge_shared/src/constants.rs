//! # Tuning Constants
//!
//! Default values for every recognized configuration option.
//! Component configs start from these; a TOML file may override any of them.

use crate::math::Vec3;

// =============================================================================
// DISPLAY
// =============================================================================

/// Nominal display refresh rate (ticks per second).
pub const DISPLAY_REFRESH_HZ: u32 = 90;

/// Distance between the two eye cameras (meters).
pub const EYE_SEPARATION_M: f32 = 0.064;

/// Near clip plane (meters).
pub const NEAR_CLIP_M: f32 = 0.01;

/// Far clip plane (meters).
pub const FAR_CLIP_M: f32 = 1000.0;

/// Vertical field of view used before the runtime reports a projection (degrees).
pub const FIELD_OF_VIEW_DEG: f32 = 100.0;

/// Render-size growth tolerated before reallocating eye targets (pixels).
pub const RESIZE_TOLERANCE_PX: u32 = 1;

// =============================================================================
// CAMERA RIG
// =============================================================================

/// Snap-turn increment (degrees).
pub const SNAP_TURN_ANGLE_DEG: f32 = 30.0;

/// Horizontal stick deflection that fires a snap-turn.
pub const SNAP_TURN_THRESHOLD: f32 = 0.7;

/// Horizontal stick deflection the stick must fall below to re-arm snap-turn.
pub const SNAP_TURN_RESET: f32 = 0.2;

/// Eye-to-camera correction in reference-camera local space: 5 cm up, 10 cm back.
pub const POSITION_OFFSET: Vec3 = Vec3::new(0.0, 0.05, -0.10);

/// Body yaw alignment speed (degrees per second).
pub const BODY_ROTATION_SPEED_DEG: f32 = 180.0;

/// Minimum interval between run activations (seconds).
pub const RUN_ACTIVATION_COOLDOWN_S: f32 = 0.25;

/// Forward stick deflection that engages running.
pub const RUN_STICK_THRESHOLD: f32 = 0.9;

/// Stick deflection treated as "released" for locomotion.
pub const STICK_DEADZONE: f32 = 0.1;

/// Distance of the menu gaze cursor in front of the head (meters).
pub const CURSOR_DISTANCE_M: f32 = 2.0;

// =============================================================================
// GESTURES
// =============================================================================

/// Vertical hand speed both hands must exceed to jump (m/s).
pub const JUMP_VELOCITY: f32 = 1.5;

/// Delay before another jump can fire (seconds).
pub const JUMP_COOLDOWN_S: f32 = 0.8;

/// Right-hand speed that starts a melee swing (m/s).
pub const ATTACK_VELOCITY: f32 = 3.5;

/// Right-hand speed below which a melee swing ends (m/s).
pub const RELEASE_VELOCITY: f32 = 1.2;

/// Minimum interval between melee swings (seconds).
pub const SWING_INTERVAL_S: f32 = 0.2;

/// Grip hold time that turns a press into a long-press (seconds).
pub const LONG_PRESS_S: f32 = 2.0;

/// Hand-to-anchor distance that arms a proximity shortcut (meters).
pub const PROXIMITY_RADIUS_M: f32 = 0.25;

/// Hold time of a two-phase key pulse (seconds).
pub const PULSE_HOLD_S: f32 = 0.1;

/// Newest-sample weight of the velocity smoother.
pub const VELOCITY_SMOOTHING: f32 = 0.6;

/// Tracked points per process (head + two hands).
pub const TRACKED_POINT_COUNT: usize = 3;
