//! Per-frame eye data.
//!
//! Produced by `StereoRenderPipeline::prepare_frame` and consumed by the
//! host's eye cameras before submission.

use vrbridge_core::Eye;
use vrbridge_shared::{Mat4, Transform};

use super::RenderStats;
use crate::target::EyeRenderTarget;

/// What one eye camera renders this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeView {
    /// Which eye.
    pub eye: Eye,
    /// Eye camera in world space.
    pub view: Transform,
    /// Engine-convention projection.
    pub projection: Mat4,
    /// Target to render into, `None` while unallocated.
    pub target: Option<EyeRenderTarget>,
}

/// Both eyes for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StereoFrame {
    /// Left then right.
    pub eyes: [EyeView; 2],
    /// Stats as of this frame.
    pub stats: RenderStats,
}

impl StereoFrame {
    /// View of one eye.
    #[must_use]
    pub const fn eye(&self, eye: Eye) -> &EyeView {
        &self.eyes[eye.index()]
    }

    /// Projection as bytes for uniform upload.
    #[must_use]
    pub fn projection_bytes(&self, eye: Eye) -> &[u8] {
        bytemuck::bytes_of(&self.eyes[eye.index()].projection)
    }

    /// True when both eyes have somewhere to render.
    #[must_use]
    pub fn has_targets(&self) -> bool {
        self.eyes.iter().all(|e| e.target.is_some())
    }
}
