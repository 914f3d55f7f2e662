//! Scripted headset session.
//!
//! Drives a [`MockRuntime`] through a fixed twelve-second loop that touches
//! every gesture and rig feature once, with seeded positional jitter so
//! runs are reproducible.
//!
//! ```text
//!  0.0  idle            6.5  grip released (long tap)
//!  1.0  both hands up   7.0  right hand to shoulder, grip held
//!  2.5  right swing     8.5  snap-turn right
//!  4.0  left grip held  9.0  run forward
//! 11.0  camera swap    11.5  head tracking lost
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use vrbridge_core::{ActionBindings, ActionKey, MockRuntime, TrackedPointId};
use vrbridge_rig::{CameraHandle, CameraSignal};
use vrbridge_shared::{Quaternion, Transform, Vec2, Vec3};

/// Length of one scenario loop (s).
pub const SCENARIO_LENGTH_S: f64 = 12.0;

/// Peak positional jitter per axis (m).
const JITTER_M: f32 = 0.0005;

const HEAD: Vec3 = Vec3::new(0.0, 1.7, 0.0);
const LEFT_REST: Vec3 = Vec3::new(-0.25, 1.1, 0.3);
const RIGHT_REST: Vec3 = Vec3::new(0.25, 1.1, 0.3);
const RIGHT_SHOULDER: Vec3 = Vec3::new(0.2, 1.45, -0.05);

/// Fraction of the way from `start` to `end` at `t`, clamped to `0..=1`.
#[allow(clippy::cast_possible_truncation)]
fn ramp(t: f64, start: f64, end: f64) -> f32 {
    ((t - start) / (end - start)).clamp(0.0, 1.0) as f32
}

fn between(t: f64, start: f64, end: f64) -> bool {
    (start..end).contains(&t)
}

/// Poses, buttons and camera for a scripted session.
#[derive(Debug)]
pub struct ScriptedScenario {
    runtime: MockRuntime,
    rng: ChaCha8Rng,
    bindings: ActionBindings,
    scene: String,
    camera: Option<CameraHandle>,
    camera_transform: Transform,
}

impl ScriptedScenario {
    /// New scenario over a fresh mock runtime.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            runtime: MockRuntime::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            bindings: ActionBindings::default(),
            scene: "level_01".to_string(),
            camera: None,
            camera_transform: Transform::from_pose(Vec3::new(5.0, 0.0, -3.0), Quaternion::IDENTITY),
        }
    }

    /// Handle to the shared runtime, for the bridge context.
    #[must_use]
    pub fn runtime(&self) -> MockRuntime {
        self.runtime.clone()
    }

    /// Camera signal for the current step.
    #[must_use]
    pub fn signal(&self) -> CameraSignal<'_> {
        CameraSignal {
            camera: self.camera,
            scene_id: &self.scene,
            transform: self.camera_transform,
        }
    }

    /// Poses the runtime for simulated time `time`.
    pub fn step(&mut self, time: f64) {
        let t = time.rem_euclid(SCENARIO_LENGTH_S);

        // Both hands rise at 2.5 m/s, then sink back slowly.
        let lift = 0.625 * ramp(t, 1.0, 1.25) - 0.625 * ramp(t, 1.5, 2.2);
        // Right hand thrusts forward at 5 m/s, returns at 1 m/s.
        let thrust = ramp(t, 2.5, 2.7) - ramp(t, 2.7, 3.7);
        // Right hand travels to the shoulder and back.
        let reach = ramp(t, 7.0, 7.5) - ramp(t, 8.0, 8.5);

        let left = LEFT_REST + Vec3::Y * lift;
        let right = (RIGHT_REST + Vec3::Y * lift + Vec3::Z * thrust).lerp(RIGHT_SHOULDER, reach);

        if between(t, 11.5, SCENARIO_LENGTH_S) {
            self.runtime.clear_pose(TrackedPointId::Head);
        } else {
            let head = HEAD + self.jitter();
            self.runtime.set_pose(TrackedPointId::Head, head, Quaternion::IDENTITY);
        }
        let left = left + self.jitter();
        let right = right + self.jitter();
        self.runtime.set_pose(TrackedPointId::LeftHand, left, Quaternion::IDENTITY);
        self.runtime.set_pose(TrackedPointId::RightHand, right, Quaternion::IDENTITY);

        self.set_bool(ActionKey::LeftGrip, between(t, 4.0, 6.5));
        self.set_bool(ActionKey::RightGrip, between(t, 7.0, 8.0));
        let turn = if between(t, 8.5, 8.8) { 1.0 } else { 0.0 };
        self.set_vec2(ActionKey::RightStick, Vec2::new(turn, 0.0));
        let forward = if between(t, 9.0, 10.5) { 1.0 } else { 0.0 };
        self.set_vec2(ActionKey::LeftStick, Vec2::new(0.0, forward));

        let handle = if t < 11.0 { 1 } else { 2 };
        self.camera = if t < 0.5 { None } else { Some(CameraHandle(handle)) };
    }

    fn jitter(&mut self) -> Vec3 {
        Vec3::new(
            self.rng.gen_range(-JITTER_M..=JITTER_M),
            self.rng.gen_range(-JITTER_M..=JITTER_M),
            self.rng.gen_range(-JITTER_M..=JITTER_M),
        )
    }

    fn set_bool(&self, key: ActionKey, pressed: bool) {
        self.runtime.set_bool(self.bindings.name(key), pressed);
    }

    fn set_vec2(&self, key: ActionKey, axis: Vec2) {
        self.runtime.set_vec2(self.bindings.name(key), axis);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrbridge_core::TrackingRuntime;

    #[test]
    fn test_same_seed_same_poses() {
        let mut a = ScriptedScenario::new(7);
        let mut b = ScriptedScenario::new(7);
        for i in 0..50 {
            let t = f64::from(i) * 0.05;
            a.step(t);
            b.step(t);
            let pa = a.runtime().device_pose(TrackedPointId::RightHand).unwrap();
            let pb = b.runtime().device_pose(TrackedPointId::RightHand).unwrap();
            assert_eq!(pa, pb);
        }
    }

    #[test]
    fn test_head_lost_at_end_of_loop() {
        let mut scenario = ScriptedScenario::new(1);
        scenario.step(11.7);
        assert!(scenario.runtime().device_pose(TrackedPointId::Head).is_err());
        scenario.step(12.5);
        assert!(scenario.runtime().device_pose(TrackedPointId::Head).is_ok());
    }

    #[test]
    fn test_camera_swaps_before_loop_end() {
        let mut scenario = ScriptedScenario::new(1);
        scenario.step(0.1);
        assert_eq!(scenario.signal().camera, None);
        scenario.step(5.0);
        assert_eq!(scenario.signal().camera, Some(CameraHandle(1)));
        scenario.step(11.2);
        assert_eq!(scenario.signal().camera, Some(CameraHandle(2)));
        assert_eq!(scenario.signal().scene_id, "level_01");
    }
}
