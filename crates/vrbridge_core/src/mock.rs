//! Mock tracking runtime.
//!
//! A cloneable handle over shared state: the context owns one clone, the
//! test (or simulator) keeps another to move devices, press buttons and
//! inspect submitted frames.

use std::sync::Arc;

use parking_lot::Mutex;

use vrbridge_shared::{Quaternion, Vec2, Vec3};

use crate::actions::{ActionBindings, ActionId, ActionKey, ActionKind, ActionSource};
use crate::error::{BridgeError, BridgeResult};
use crate::runtime::{
    Compositor, Eye, HmdMatrix44, RawPose, TextureBounds, TextureHandle, TrackedPointId,
    TrackingRuntime,
};

/// One recorded compositor submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Submission {
    /// Eye submitted.
    pub eye: Eye,
    /// Texture submitted.
    pub texture: TextureHandle,
    /// Bounds submitted.
    pub bounds: TextureBounds,
}

#[derive(Debug, Clone)]
struct MockAction {
    name: String,
    id: ActionId,
    pressed: bool,
    axis: Vec2,
}

#[derive(Debug)]
struct MockState {
    poses: [Option<RawPose>; 3],
    projections: [Option<HmdMatrix44>; 2],
    recommended: Option<(u32, u32)>,
    reject: [bool; 2],
    submissions: Vec<Submission>,
    actions: Vec<MockAction>,
}

/// In-process runtime double.
#[derive(Debug, Clone)]
pub struct MockRuntime {
    state: Arc<Mutex<MockState>>,
}

/// Projection reported by a fresh mock: a distinct value per element so
/// relabeling mistakes are visible.
pub const MOCK_PROJECTION: HmdMatrix44 = HmdMatrix44 {
    m: [
        [0.75, 0.0, -0.05, 0.0],
        [0.0, 0.68, 0.01, 0.0],
        [0.0, 0.0, -1.0001, -0.010_001],
        [0.0, 0.0, -1.0, 0.0],
    ],
};

/// Recommended size reported by a fresh mock.
pub const MOCK_RENDER_SIZE: (u32, u32) = (1512, 1680);

impl MockRuntime {
    /// A runtime with every default action registered, no tracked devices,
    /// [`MOCK_PROJECTION`] for both eyes and [`MOCK_RENDER_SIZE`].
    #[must_use]
    pub fn new() -> Self {
        let runtime = Self {
            state: Arc::new(Mutex::new(MockState {
                poses: [None; 3],
                projections: [Some(MOCK_PROJECTION); 2],
                recommended: Some(MOCK_RENDER_SIZE),
                reject: [false; 2],
                submissions: Vec::new(),
                actions: Vec::new(),
            })),
        };
        let bindings = ActionBindings::default();
        for key in ActionKey::ALL {
            runtime.register_action(bindings.name(key));
        }
        runtime
    }

    /// Places a device at an engine-space pose, encoded the way the runtime
    /// would report it.
    pub fn set_pose(&self, point: TrackedPointId, position: Vec3, rotation: Quaternion) {
        self.set_raw_pose(point, encode_raw_pose(position, rotation));
    }

    /// Sets a raw runtime pose.
    pub fn set_raw_pose(&self, point: TrackedPointId, raw: RawPose) {
        self.state.lock().poses[point.index()] = Some(raw);
    }

    /// Marks a device as not tracked.
    pub fn clear_pose(&self, point: TrackedPointId) {
        self.state.lock().poses[point.index()] = None;
    }

    /// Sets (or with `None`, fails) the projection for one eye.
    pub fn set_projection(&self, eye: Eye, projection: Option<HmdMatrix44>) {
        self.state.lock().projections[eye.index()] = projection;
    }

    /// Sets (or with `None`, fails) the recommended render size.
    pub fn set_recommended_size(&self, size: Option<(u32, u32)>) {
        self.state.lock().recommended = size;
    }

    /// Makes the compositor reject one eye.
    pub fn reject_submissions(&self, eye: Eye, reject: bool) {
        self.state.lock().reject[eye.index()] = reject;
    }

    /// Every accepted submission so far.
    #[must_use]
    pub fn submissions(&self) -> Vec<Submission> {
        self.state.lock().submissions.clone()
    }

    /// Number of accepted submissions.
    #[must_use]
    pub fn submission_count(&self) -> usize {
        self.state.lock().submissions.len()
    }

    /// Registers an action name, returning its id. Idempotent.
    pub fn register_action(&self, name: &str) -> ActionId {
        let mut state = self.state.lock();
        if let Some(a) = state.actions.iter().find(|a| a.name == name) {
            return a.id;
        }
        let id = ActionId(state.actions.len() as u64 + 1);
        state.actions.push(MockAction {
            name: name.to_string(),
            id,
            pressed: false,
            axis: Vec2::ZERO,
        });
        id
    }

    /// Sets a boolean action, registering the name if needed.
    pub fn set_bool(&self, name: &str, pressed: bool) {
        self.register_action(name);
        let mut state = self.state.lock();
        if let Some(a) = state.actions.iter_mut().find(|a| a.name == name) {
            a.pressed = pressed;
        }
    }

    /// Sets a two-axis action, registering the name if needed.
    pub fn set_vec2(&self, name: &str, axis: Vec2) {
        self.register_action(name);
        let mut state = self.state.lock();
        if let Some(a) = state.actions.iter_mut().find(|a| a.name == name) {
            a.axis = axis;
        }
    }
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Encodes an engine-space pose as the runtime's right-handed 3x4 matrix.
#[must_use]
pub fn encode_raw_pose(position: Vec3, rotation: Quaternion) -> RawPose {
    let cols = [rotation.right(), rotation.up(), rotation.forward()];
    let sign = [1.0_f32, 1.0, -1.0];
    let mut m = [[0.0_f32; 4]; 3];
    for (row, m_row) in m.iter_mut().enumerate() {
        for (col, axis) in cols.iter().enumerate() {
            m_row[col] = sign[row] * sign[col] * axis.to_array()[row];
        }
    }
    m[0][3] = position.x;
    m[1][3] = position.y;
    m[2][3] = -position.z;
    RawPose { m }
}

impl TrackingRuntime for MockRuntime {
    fn device_pose(&self, point: TrackedPointId) -> BridgeResult<RawPose> {
        self.state.lock().poses[point.index()]
            .ok_or(BridgeError::TrackingUnavailable("device not tracked"))
    }

    fn projection(&self, eye: Eye, _near: f32, _far: f32) -> BridgeResult<HmdMatrix44> {
        self.state.lock().projections[eye.index()]
            .ok_or(BridgeError::TrackingUnavailable("projection unavailable"))
    }

    fn recommended_render_size(&self) -> BridgeResult<(u32, u32)> {
        self.state.lock()
            .recommended
            .ok_or(BridgeError::TrackingUnavailable("render size unavailable"))
    }
}

impl Compositor for MockRuntime {
    fn submit(&mut self, eye: Eye, texture: TextureHandle, bounds: TextureBounds) -> BridgeResult<()> {
        let mut state = self.state.lock();
        if state.reject[eye.index()] {
            return Err(BridgeError::CompositorSubmit {
                eye,
                reason: "mock rejection".to_string(),
            });
        }
        state.submissions.push(Submission { eye, texture, bounds });
        Ok(())
    }
}

impl ActionSource for MockRuntime {
    fn resolve_action(&self, name: &str, _kind: ActionKind) -> Option<ActionId> {
        self.state.lock().actions.iter().find(|a| a.name == name).map(|a| a.id)
    }

    fn bool_state(&self, id: ActionId) -> bool {
        self.state.lock().actions.iter().find(|a| a.id == id).is_some_and(|a| a.pressed)
    }

    fn vec2_state(&self, id: ActionId) -> Vec2 {
        self.state.lock()
            .actions
            .iter()
            .find(|a| a.id == id)
            .map_or(Vec2::ZERO, |a| a.axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untracked_device_errors() {
        let runtime = MockRuntime::new();
        assert!(runtime.device_pose(TrackedPointId::Head).is_err());
        runtime.set_pose(TrackedPointId::Head, Vec3::new(0.0, 1.7, 0.0), Quaternion::IDENTITY);
        assert!(runtime.device_pose(TrackedPointId::Head).is_ok());
    }

    #[test]
    fn test_encode_mirrors_z() {
        let raw = encode_raw_pose(Vec3::new(1.0, 2.0, 3.0), Quaternion::IDENTITY);
        assert_eq!(raw.m[0][3], 1.0);
        assert_eq!(raw.m[1][3], 2.0);
        assert_eq!(raw.m[2][3], -3.0);
        // identity rotation survives the double mirror
        assert_eq!(raw.m[2][2], 1.0);
    }

    #[test]
    fn test_rejected_submission_not_recorded() {
        let mut runtime = MockRuntime::new();
        runtime.reject_submissions(Eye::Left, true);
        let r = runtime.submit(Eye::Left, TextureHandle(1), TextureBounds::FLIPPED_V);
        assert!(matches!(r, Err(BridgeError::CompositorSubmit { eye: Eye::Left, .. })));
        assert_eq!(runtime.submission_count(), 0);
    }
}
