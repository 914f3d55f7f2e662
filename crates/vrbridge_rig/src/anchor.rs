//! Reference camera identity.

use vrbridge_shared::Transform;

/// Opaque host camera identity. Two signals refer to the same camera iff
/// their handles are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraHandle(pub u64);

/// Per-tick report from the host's scene discovery.
#[derive(Debug, Clone, Copy)]
pub struct CameraSignal<'a> {
    /// Active gameplay camera, `None` when there is none (loading screens,
    /// cutscenes).
    pub camera: Option<CameraHandle>,
    /// Scene the camera belongs to.
    pub scene_id: &'a str,
    /// Camera world transform.
    pub transform: Transform,
}

impl<'a> CameraSignal<'a> {
    /// Signal with no active camera.
    #[must_use]
    pub const fn none(scene_id: &'a str) -> Self {
        Self { camera: None, scene_id, transform: Transform::IDENTITY }
    }
}

/// How an incoming signal relates to the current anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorChange {
    /// Same camera as last tick (or still none).
    Unchanged,
    /// First camera, or first camera after a gap.
    Acquired,
    /// A different camera replaced the previous one.
    Swapped,
    /// The camera went away.
    Lost,
}

/// Last reference camera seen and the scene it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CameraAnchor {
    /// Current camera, `None` while suspended.
    pub reference_camera: Option<CameraHandle>,
    /// Scene of the last signal.
    pub scene_id: String,
    /// Camera before the current one went away, so a returning camera is
    /// recognised as the same.
    last_camera: Option<CameraHandle>,
}

impl CameraAnchor {
    /// Empty anchor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a signal. The scene string is only rewritten when it differs.
    pub fn observe(&mut self, signal: &CameraSignal<'_>) -> AnchorChange {
        if self.scene_id != signal.scene_id {
            self.scene_id.clear();
            self.scene_id.push_str(signal.scene_id);
        }

        let change = match (self.reference_camera, signal.camera) {
            (None, None) => AnchorChange::Unchanged,
            (Some(_), None) => AnchorChange::Lost,
            (None, Some(new)) if self.last_camera.is_some_and(|old| old != new) => {
                AnchorChange::Swapped
            }
            (None, Some(_)) => AnchorChange::Acquired,
            (Some(old), Some(new)) if old == new => AnchorChange::Unchanged,
            (Some(_), Some(_)) => AnchorChange::Swapped,
        };

        if let Some(cam) = self.reference_camera {
            self.last_camera = Some(cam);
        }
        self.reference_camera = signal.camera;
        change
    }

    /// True while a camera is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.reference_camera.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(camera: Option<u64>, scene: &str) -> CameraSignal<'_> {
        CameraSignal {
            camera: camera.map(CameraHandle),
            scene_id: scene,
            transform: Transform::IDENTITY,
        }
    }

    #[test]
    fn test_anchor_transitions() {
        let mut anchor = CameraAnchor::new();
        assert_eq!(anchor.observe(&signal(None, "boot")), AnchorChange::Unchanged);
        assert_eq!(anchor.observe(&signal(Some(1), "town")), AnchorChange::Acquired);
        assert_eq!(anchor.observe(&signal(Some(1), "town")), AnchorChange::Unchanged);
        assert_eq!(anchor.observe(&signal(Some(2), "town")), AnchorChange::Swapped);
        assert_eq!(anchor.observe(&signal(None, "loading")), AnchorChange::Lost);
        assert_eq!(anchor.observe(&signal(Some(2), "town")), AnchorChange::Acquired);
        assert_eq!(anchor.scene_id, "town");
    }

    #[test]
    fn test_new_camera_after_gap_is_swap() {
        let mut anchor = CameraAnchor::new();
        anchor.observe(&signal(Some(1), "a"));
        anchor.observe(&signal(None, "a"));
        assert_eq!(anchor.observe(&signal(Some(7), "b")), AnchorChange::Swapped);
        assert!(anchor.is_active());
    }
}
