//! Eye anchors.

use vrbridge_core::Eye;
use vrbridge_shared::{Quaternion, Transform, Vec3};

/// Head transform plus two eye anchors at ± half the eye separation along
/// the head's right axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeRig {
    half_separation: f32,
    head: Transform,
}

impl EyeRig {
    /// Rig with the head at the origin.
    #[must_use]
    pub fn new(eye_separation: f32) -> Self {
        Self { half_separation: eye_separation * 0.5, head: Transform::IDENTITY }
    }

    /// Moves the head.
    pub fn set_head(&mut self, head: Transform) {
        self.head = head;
    }

    /// Current head transform.
    #[must_use]
    pub const fn head(&self) -> Transform {
        self.head
    }

    /// Eye anchor in head space.
    #[must_use]
    pub fn local_offset(&self, eye: Eye) -> Vec3 {
        Vec3::new(eye.side() * self.half_separation, 0.0, 0.0)
    }

    /// Eye camera in world space.
    #[must_use]
    pub fn eye_transform(&self, eye: Eye) -> Transform {
        self.head
            .compose(&Transform::from_pose(self.local_offset(eye), Quaternion::IDENTITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eyes_straddle_head() {
        let mut rig = EyeRig::new(0.064);
        rig.set_head(Transform::from_pose(Vec3::new(0.0, 1.7, 0.0), Quaternion::IDENTITY));
        let left = rig.eye_transform(Eye::Left).position;
        let right = rig.eye_transform(Eye::Right).position;
        assert!((left.x + 0.032).abs() < 1e-6);
        assert!((right.x - 0.032).abs() < 1e-6);
        assert!((left.distance(right) - 0.064).abs() < 1e-6);
    }

    #[test]
    fn test_eyes_follow_head_yaw() {
        let mut rig = EyeRig::new(0.064);
        // facing +X, the right eye sits toward -Z
        rig.set_head(Transform::from_pose(Vec3::ZERO, Quaternion::from_yaw_degrees(90.0)));
        let right = rig.eye_transform(Eye::Right).position;
        assert!(right.distance(Vec3::new(0.0, 0.0, -0.032)) < 1e-5);
    }
}
