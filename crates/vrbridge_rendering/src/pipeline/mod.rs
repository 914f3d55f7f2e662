//! Stereo render pipeline orchestration.
//!
//! One late tick is `prepare_frame` (head, projections, resolution) followed
//! by `submit` once the host has rendered both eyes.

mod frame;
mod stats;

pub use frame::{EyeView, StereoFrame};
pub use stats::RenderStats;

use tracing::{debug, info, warn};

use vrbridge_core::{BridgeResult, Compositor, Eye, TextureBounds, TrackingRuntime};
use vrbridge_shared::{Mat4, Transform};

use crate::config::RenderConfig;
use crate::eye::EyeRig;
use crate::projection::{fallback_projection, to_engine};
use crate::target::{EyeRenderTarget, TargetAllocator};

/// Two eye cameras, their targets, and compositor submission.
pub struct StereoRenderPipeline<A: TargetAllocator> {
    /// Settings.
    config: RenderConfig,

    /// Backs the eye color buffers.
    allocator: A,

    /// Head and eye anchors.
    eye_rig: EyeRig,

    /// Latest projection per eye, engine convention.
    projections: [Mat4; 2],

    /// Current targets. Both present or both absent.
    targets: [Option<EyeRenderTarget>; 2],

    /// Cleared by `disable`.
    enabled: bool,

    /// Set while the last allocation attempt failed.
    allocation_failed: bool,

    /// Counters.
    stats: RenderStats,
}

impl<A: TargetAllocator> StereoRenderPipeline<A> {
    /// Creates an enabled pipeline with no targets yet. Projections start
    /// from the configured field of view.
    #[must_use]
    pub fn new(config: RenderConfig, allocator: A) -> Self {
        let initial = fallback_projection(&config);
        Self {
            eye_rig: EyeRig::new(config.eye_separation_m),
            config,
            allocator,
            projections: [initial; 2],
            targets: [None; 2],
            enabled: true,
            allocation_failed: false,
            stats: RenderStats::default(),
        }
    }

    /// Late-tick refresh: moves the eyes to `head_world`, refetches both
    /// projections and polls the recommended size.
    ///
    /// # Errors
    ///
    /// `ResourceAllocation` when targets had to be (re)created and the
    /// allocator refused. Submission stays off until an allocation succeeds.
    pub fn prepare_frame<R: TrackingRuntime + ?Sized>(
        &mut self,
        runtime: &R,
        head_world: Transform,
    ) -> BridgeResult<StereoFrame> {
        self.eye_rig.set_head(head_world);
        self.refresh_projections(runtime);
        if self.enabled {
            self.poll_resolution(runtime)?;
        }
        Ok(self.frame())
    }

    /// Refetches both projections. A failed query keeps the previous matrix.
    pub fn refresh_projections<R: TrackingRuntime + ?Sized>(&mut self, runtime: &R) {
        for eye in Eye::BOTH {
            match runtime.projection(eye, self.config.near_clip_m, self.config.far_clip_m) {
                Ok(m) => self.projections[eye.index()] = to_engine(&m),
                Err(err) => {
                    self.stats.projection_failures += 1;
                    debug!("{:?} projection kept: {}", eye, err);
                }
            }
        }
    }

    /// Compares the recommended size with the current targets and
    /// reallocates both when it grew beyond the tolerance (or when there are
    /// none). Returns true if targets were (re)created.
    ///
    /// # Errors
    ///
    /// `ResourceAllocation` from the allocator.
    pub fn poll_resolution<R: TrackingRuntime + ?Sized>(&mut self, runtime: &R) -> BridgeResult<bool> {
        let Ok((width, height)) = runtime.recommended_render_size() else {
            return Ok(false);
        };
        if !self.needs_resize(width, height) {
            return Ok(false);
        }
        self.reallocate(width, height)?;
        Ok(true)
    }

    fn needs_resize(&self, width: u32, height: u32) -> bool {
        let tolerance = self.config.resize_tolerance_px;
        match self.current_size() {
            None => true,
            Some((w, h)) => width > w.saturating_add(tolerance) || height > h.saturating_add(tolerance),
        }
    }

    fn reallocate(&mut self, width: u32, height: u32) -> BridgeResult<()> {
        self.release_targets();

        let mut fresh = [None; 2];
        for eye in Eye::BOTH {
            match self.allocator.allocate(eye, width, height) {
                Ok(color_buffer) => {
                    fresh[eye.index()] = Some(EyeRenderTarget { width, height, color_buffer });
                }
                Err(err) => {
                    for target in fresh.iter().flatten() {
                        self.allocator.release(target.color_buffer);
                    }
                    self.stats.allocation_failures += 1;
                    if !self.allocation_failed {
                        warn!("{err}; frame submission suspended");
                    }
                    self.allocation_failed = true;
                    return Err(err);
                }
            }
        }

        self.targets = fresh;
        if self.allocation_failed {
            info!("Eye targets recovered, frame submission resumed");
        }
        self.allocation_failed = false;
        self.stats.reallocations += 1;
        info!("Eye targets allocated at {}x{}", width, height);
        Ok(())
    }

    fn release_targets(&mut self) {
        for slot in &mut self.targets {
            if let Some(target) = slot.take() {
                self.allocator.release(target.color_buffer);
            }
        }
    }

    /// Hands both eye images to the compositor with the vertical flip.
    /// Skipped while disabled or without targets. A rejected eye is counted
    /// and dropped; the next call tries again.
    pub fn submit<C: Compositor + ?Sized>(&mut self, compositor: &mut C) {
        if !self.is_submitting() {
            self.stats.skipped += 1;
            return;
        }
        for eye in Eye::BOTH {
            let Some(target) = self.targets[eye.index()] else { continue };
            match compositor.submit(eye, target.color_buffer, TextureBounds::FLIPPED_V) {
                Ok(()) => self.stats.submitted[eye.index()] += 1,
                Err(err) => {
                    self.stats.dropped[eye.index()] += 1;
                    debug!("{}; frame dropped", err);
                }
            }
        }
    }

    /// Stops submission immediately and releases both targets.
    pub fn disable(&mut self) {
        if self.enabled {
            info!("Stereo pipeline disabled");
        }
        self.enabled = false;
        self.release_targets();
    }

    /// Re-enables; targets are recreated on the next `prepare_frame`.
    pub fn enable(&mut self) {
        if !self.enabled {
            info!("Stereo pipeline enabled");
        }
        self.enabled = true;
    }

    /// True unless disabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True when the next `submit` would reach the compositor.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.enabled && !self.allocation_failed && self.targets.iter().all(Option::is_some)
    }

    /// Size of the current targets.
    #[must_use]
    pub fn current_size(&self) -> Option<(u32, u32)> {
        self.targets[0].map(|t| (t.width, t.height))
    }

    /// Target of one eye.
    #[must_use]
    pub const fn target(&self, eye: Eye) -> Option<EyeRenderTarget> {
        self.targets[eye.index()]
    }

    /// Latest projection of one eye.
    #[must_use]
    pub const fn projection(&self, eye: Eye) -> Mat4 {
        self.projections[eye.index()]
    }

    /// Head and eye anchors.
    #[must_use]
    pub const fn eye_rig(&self) -> &EyeRig {
        &self.eye_rig
    }

    /// Counters.
    #[must_use]
    pub const fn stats(&self) -> RenderStats {
        self.stats
    }

    /// The allocator.
    #[must_use]
    pub const fn allocator(&self) -> &A {
        &self.allocator
    }

    /// The allocator, mutably.
    pub fn allocator_mut(&mut self) -> &mut A {
        &mut self.allocator
    }

    /// Snapshot of both eyes.
    #[must_use]
    pub fn frame(&self) -> StereoFrame {
        StereoFrame {
            eyes: Eye::BOTH.map(|eye| EyeView {
                eye,
                view: self.eye_rig.eye_transform(eye),
                projection: self.projections[eye.index()],
                target: self.targets[eye.index()],
            }),
            stats: self.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::to_runtime;
    use crate::target::HeadlessAllocator;
    use vrbridge_core::mock::{MOCK_PROJECTION, MOCK_RENDER_SIZE};
    use vrbridge_core::{BridgeError, MockRuntime};
    use vrbridge_shared::{Quaternion, Vec3};

    fn pipeline() -> StereoRenderPipeline<HeadlessAllocator> {
        StereoRenderPipeline::new(RenderConfig::default(), HeadlessAllocator::new())
    }

    fn head() -> Transform {
        Transform::from_pose(Vec3::new(0.0, 1.7, 0.0), Quaternion::IDENTITY)
    }

    #[test]
    fn test_first_prepare_allocates_recommended_size() {
        let runtime = MockRuntime::new();
        let mut p = pipeline();
        let frame = p.prepare_frame(&runtime, head()).unwrap();
        assert!(frame.has_targets());
        assert_eq!(p.current_size(), Some(MOCK_RENDER_SIZE));
        assert_eq!(p.allocator().live_count(), 2);
        assert_eq!(p.stats().reallocations, 1);
    }

    #[test]
    fn test_resize_tolerance() {
        let runtime = MockRuntime::new();
        let mut p = pipeline();
        let (w, h) = (1000, 1100);
        runtime.set_recommended_size(Some((w, h)));
        p.prepare_frame(&runtime, head()).unwrap();

        runtime.set_recommended_size(Some((w - 1, h - 1)));
        assert!(!p.poll_resolution(&runtime).unwrap());
        runtime.set_recommended_size(Some((w + 1, h + 1)));
        assert!(!p.poll_resolution(&runtime).unwrap());

        runtime.set_recommended_size(Some((w + 2, h)));
        assert!(p.poll_resolution(&runtime).unwrap());
        assert!(!p.poll_resolution(&runtime).unwrap());
        assert_eq!(p.stats().reallocations, 2);
        assert_eq!(p.current_size(), Some((w + 2, h)));
        // old buffers were released
        assert_eq!(p.allocator().live_count(), 2);
    }

    #[test]
    fn test_submit_uses_flipped_bounds_per_eye() {
        let runtime = MockRuntime::new();
        let mut compositor = runtime.clone();
        let mut p = pipeline();
        p.prepare_frame(&runtime, head()).unwrap();
        p.submit(&mut compositor);

        let subs = runtime.submissions();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].eye, Eye::Left);
        assert_eq!(subs[1].eye, Eye::Right);
        assert!(subs.iter().all(|s| s.bounds == TextureBounds::FLIPPED_V));
        assert_eq!(Some(subs[0].texture), p.target(Eye::Left).map(|t| t.color_buffer));
    }

    #[test]
    fn test_rejected_eye_dropped_then_retried() {
        let runtime = MockRuntime::new();
        let mut compositor = runtime.clone();
        let mut p = pipeline();
        p.prepare_frame(&runtime, head()).unwrap();

        runtime.reject_submissions(Eye::Right, true);
        p.submit(&mut compositor);
        assert_eq!(p.stats().dropped(Eye::Right), 1);
        assert_eq!(p.stats().submitted(Eye::Left), 1);

        runtime.reject_submissions(Eye::Right, false);
        p.prepare_frame(&runtime, head()).unwrap();
        p.submit(&mut compositor);
        assert_eq!(p.stats().submitted(Eye::Right), 1);
        assert_eq!(runtime.submission_count(), 3);
    }

    #[test]
    fn test_projection_is_transposed_and_kept_on_failure() {
        let runtime = MockRuntime::new();
        let mut p = pipeline();
        p.refresh_projections(&runtime);
        assert_eq!(to_runtime(&p.projection(Eye::Left)), MOCK_PROJECTION);

        runtime.set_projection(Eye::Left, None);
        p.refresh_projections(&runtime);
        assert_eq!(to_runtime(&p.projection(Eye::Left)), MOCK_PROJECTION);
        assert_eq!(p.stats().projection_failures, 1);
    }

    #[test]
    fn test_allocation_failure_disables_submission_until_recovered() {
        let runtime = MockRuntime::new();
        let mut compositor = runtime.clone();
        let mut p = StereoRenderPipeline::new(RenderConfig::default(), HeadlessAllocator::with_max_dimension(2048));
        p.prepare_frame(&runtime, head()).unwrap();

        runtime.set_recommended_size(Some((4096, 1680)));
        let err = p.prepare_frame(&runtime, head()).unwrap_err();
        assert!(matches!(err, BridgeError::ResourceAllocation { width: 4096, .. }));
        assert!(!p.is_submitting());
        assert_eq!(p.allocator().live_count(), 0);

        p.submit(&mut compositor);
        assert_eq!(runtime.submission_count(), 0);
        assert_eq!(p.stats().skipped, 1);

        runtime.set_recommended_size(Some((2048, 1680)));
        p.prepare_frame(&runtime, head()).unwrap();
        assert!(p.is_submitting());
        p.submit(&mut compositor);
        assert_eq!(runtime.submission_count(), 2);
    }

    #[test]
    fn test_disable_stops_submission_and_releases_targets() {
        let runtime = MockRuntime::new();
        let mut compositor = runtime.clone();
        let mut p = pipeline();
        p.prepare_frame(&runtime, head()).unwrap();

        p.disable();
        assert_eq!(p.allocator().live_count(), 0);
        p.prepare_frame(&runtime, head()).unwrap();
        p.submit(&mut compositor);
        assert_eq!(runtime.submission_count(), 0);
        assert_eq!(p.allocator().live_count(), 0);

        p.enable();
        p.prepare_frame(&runtime, head()).unwrap();
        p.submit(&mut compositor);
        assert_eq!(runtime.submission_count(), 2);
    }

    #[test]
    fn test_device_lost_reallocation_fails_until_allocator_recovers() {
        let runtime = MockRuntime::new();
        let mut compositor = runtime.clone();
        let mut p = pipeline();
        p.prepare_frame(&runtime, head()).unwrap();

        p.allocator_mut().set_refuse(true);
        p.disable();
        p.enable();
        assert!(p.prepare_frame(&runtime, head()).is_err());
        p.submit(&mut compositor);
        assert_eq!(runtime.submission_count(), 0);
        assert_eq!(p.stats().allocation_failures, 1);

        p.allocator_mut().set_refuse(false);
        p.prepare_frame(&runtime, head()).unwrap();
        p.submit(&mut compositor);
        assert_eq!(runtime.submission_count(), 2);
        assert_eq!(p.allocator().live_count(), 2);
    }

    #[test]
    fn test_frame_eyes_follow_head() {
        let runtime = MockRuntime::new();
        let mut p = pipeline();
        let frame = p.prepare_frame(&runtime, head()).unwrap();
        let left = frame.eye(Eye::Left).view.position;
        let right = frame.eye(Eye::Right).view.position;
        assert!(left.distance(Vec3::new(-0.032, 1.7, 0.0)) < 1e-5);
        assert!(right.distance(Vec3::new(0.032, 1.7, 0.0)) < 1e-5);
        assert_eq!(frame.projection_bytes(Eye::Left).len(), 64);
    }
}
