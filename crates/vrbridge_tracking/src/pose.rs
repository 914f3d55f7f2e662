//! Pose acquisition.
//!
//! The runtime reports right-handed 3x4 device matrices. The engine is
//! left-handed with Y up and +Z forward, so the Z axis is mirrored on both
//! sides of the rotation (`S * R * S`, `S = diag(1, 1, -1)`) and on the
//! position. Orientation is rebuilt from the mirrored forward and up
//! columns with a look-rotation.

use tracing::{debug, info};

use vrbridge_core::{RawPose, TrackedPointId, TrackingRuntime};
use vrbridge_shared::math::DEGENERATE_EPSILON_SQ;
use vrbridge_shared::{Quaternion, Transform, Vec3};

/// Position and orientation of one tracked point for one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Engine-space position (meters).
    pub position: Vec3,
    /// Engine-space orientation.
    pub rotation: Quaternion,
    /// False when the point was not tracked. Position and rotation are then
    /// origin/identity and must not be applied.
    pub valid: bool,
}

impl Pose {
    /// The "not tracked" result.
    pub const INVALID: Self = Self {
        position: Vec3::ZERO,
        rotation: Quaternion::IDENTITY,
        valid: false,
    };

    /// As a unit-scale transform.
    #[must_use]
    pub const fn transform(&self) -> Transform {
        Transform::from_pose(self.position, self.rotation)
    }

    /// Forward direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation.forward()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Converts a runtime matrix into an engine-space pose.
///
/// A near-zero forward column yields identity rotation instead of NaNs.
#[must_use]
pub fn convert_raw_pose(raw: &RawPose) -> Pose {
    let m = &raw.m;
    let position = Vec3::new(m[0][3], m[1][3], -m[2][3]);
    let forward = Vec3::new(-m[0][2], -m[1][2], m[2][2]);
    let up = Vec3::new(m[0][1], m[1][1], -m[2][1]);

    let rotation = if forward.length_squared() < DEGENERATE_EPSILON_SQ {
        Quaternion::IDENTITY
    } else {
        Quaternion::look_rotation(forward, up)
    };

    Pose { position, rotation, valid: true }
}

/// Poses of every tracked point for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoseFrame {
    poses: [Pose; 3],
}

impl PoseFrame {
    /// Pose of one point.
    #[must_use]
    pub const fn get(&self, id: TrackedPointId) -> Pose {
        self.poses[id.index()]
    }

    /// Headset pose.
    #[must_use]
    pub const fn head(&self) -> Pose {
        self.get(TrackedPointId::Head)
    }
}

/// Wraps runtime pose queries for the three tracked points.
#[derive(Debug, Clone, Default)]
pub struct PoseSource {
    last_valid: [Pose; 3],
    tracking: [bool; 3],
}

impl PoseSource {
    /// Creates a source with nothing tracked yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queries one point. Never fails: a runtime error becomes
    /// [`Pose::INVALID`].
    pub fn get_pose<R: TrackingRuntime + ?Sized>(&mut self, runtime: &R, id: TrackedPointId) -> Pose {
        let idx = id.index();
        match runtime.device_pose(id) {
            Ok(raw) => {
                let pose = convert_raw_pose(&raw);
                if !self.tracking[idx] {
                    info!("{:?} tracking acquired", id);
                    self.tracking[idx] = true;
                }
                self.last_valid[idx] = pose;
                pose
            }
            Err(err) => {
                if self.tracking[idx] {
                    debug!("{:?} tracking lost: {}", id, err);
                    self.tracking[idx] = false;
                }
                Pose::INVALID
            }
        }
    }

    /// Queries every point once.
    pub fn sample<R: TrackingRuntime + ?Sized>(&mut self, runtime: &R) -> PoseFrame {
        let mut frame = PoseFrame::default();
        for id in TrackedPointId::ALL {
            frame.poses[id.index()] = self.get_pose(runtime, id);
        }
        frame
    }

    /// Most recent valid pose of a point, or [`Pose::INVALID`] if it has
    /// never been tracked.
    #[must_use]
    pub const fn last_valid(&self, id: TrackedPointId) -> Pose {
        self.last_valid[id.index()]
    }

    /// True if the point was tracked on its latest query.
    #[must_use]
    pub const fn is_tracking(&self, id: TrackedPointId) -> bool {
        self.tracking[id.index()]
    }
}
