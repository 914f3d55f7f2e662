//! # Tracking Runtime Seams
//!
//! The query surface the bridge consumes from the VR runtime, and the
//! raw data layouts it returns.
//!
//! Raw layouts are in the runtime's convention: right-handed, row-major,
//! `-Z` forward. Conversion into engine convention happens in the tracking
//! and rendering crates, never here.

use crate::error::BridgeResult;

/// Identity of a tracked point. Stable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedPointId {
    /// The headset.
    Head,
    /// Left controller.
    LeftHand,
    /// Right controller.
    RightHand,
}

impl TrackedPointId {
    /// All tracked points, in storage order.
    pub const ALL: [Self; 3] = [Self::Head, Self::LeftHand, Self::RightHand];

    /// Index into fixed per-point storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Head => 0,
            Self::LeftHand => 1,
            Self::RightHand => 2,
        }
    }
}

/// Which eye.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Eye {
    /// Left eye.
    Left,
    /// Right eye.
    Right,
}

impl Eye {
    /// Both eyes, in submission order.
    pub const BOTH: [Self; 2] = [Self::Left, Self::Right];

    /// Index into per-eye storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    /// Lateral sign: -1 for left, +1 for right.
    #[must_use]
    pub const fn side(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Device-to-absolute-tracking matrix, 3 rows by 4 columns, row-major.
///
/// Columns 0..3 are the device's right/up/back basis, column 3 the position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPose {
    /// `m[row][col]`
    pub m: [[f32; 4]; 3],
}

impl RawPose {
    /// Identity pose at the runtime origin.
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
    };
}

/// Projection matrix as reported by the runtime, row-major `m[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HmdMatrix44 {
    /// `m[row][col]`
    pub m: [[f32; 4]; 4],
}

/// Opaque GPU texture handle passed to the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Sub-rectangle of a texture the compositor should sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureBounds {
    /// Left edge.
    pub u_min: f32,
    /// Top edge.
    pub v_min: f32,
    /// Right edge.
    pub u_max: f32,
    /// Bottom edge.
    pub v_max: f32,
}

impl TextureBounds {
    /// Full texture with the vertical axis flipped.
    ///
    /// Eye targets are top-origin; the compositor samples bottom-origin.
    pub const FLIPPED_V: Self = Self { u_min: 0.0, v_min: 1.0, u_max: 1.0, v_max: 0.0 };
}

/// Pose and display queries answered by the VR runtime.
pub trait TrackingRuntime {
    /// Current pose of a tracked point.
    ///
    /// # Errors
    ///
    /// `TrackingUnavailable` when the point is not tracked this frame.
    fn device_pose(&self, point: TrackedPointId) -> BridgeResult<RawPose>;

    /// Projection matrix for one eye with the given clip planes.
    ///
    /// # Errors
    ///
    /// `TrackingUnavailable` when the runtime cannot answer.
    fn projection(&self, eye: Eye, near: f32, far: f32) -> BridgeResult<HmdMatrix44>;

    /// Render-target size the runtime recommends per eye.
    ///
    /// # Errors
    ///
    /// `TrackingUnavailable` when the runtime cannot answer.
    fn recommended_render_size(&self) -> BridgeResult<(u32, u32)>;
}

/// Receives finished eye images.
pub trait Compositor {
    /// Submits one eye's image.
    ///
    /// # Errors
    ///
    /// `CompositorSubmit` when the image is rejected. The caller drops the
    /// frame and tries again next tick.
    fn submit(&mut self, eye: Eye, texture: TextureHandle, bounds: TextureBounds) -> BridgeResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_dense() {
        for (i, p) in TrackedPointId::ALL.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
        for (i, e) in Eye::BOTH.iter().enumerate() {
            assert_eq!(e.index(), i);
        }
    }

    #[test]
    fn test_flip_bounds() {
        let b = TextureBounds::FLIPPED_V;
        assert!(b.v_min > b.v_max);
        assert!(b.u_min < b.u_max);
    }
}
