//! # Bridge Context
//!
//! Owns every component for the life of the process. Built once at
//! startup, in dependency order:
//!
//! ```text
//! actions -> poses -> velocities -> gestures -> pulses -> rig -> pipeline
//! ```
//!
//! and torn down in reverse by [`BridgeContext::shutdown`] (also run on drop).

use std::time::Instant;

use tracing::{debug, info};

use vrbridge_core::{
    ActionSource, ActionTable, BridgeResult, Compositor, ControllerInput, FrameClock, Hand, InputSink,
    PulseScheduler, TrackedPointId, TrackingRuntime,
};
use vrbridge_rendering::{HeadlessAllocator, StereoFrame, StereoRenderPipeline, TargetAllocator};
use vrbridge_rig::{CameraRigSynchronizer, CameraSignal, RigOutput};
use vrbridge_shared::Transform;
use vrbridge_tracking::{
    GestureClassifier, GestureInput, GestureOutput, PoseFrame, PoseSource, VelocityEstimator,
};

use crate::config::BridgeConfig;
use crate::frame_loop::FrameStats;

/// What one logic tick produced.
#[derive(Debug, Clone, Copy)]
pub struct LogicReport {
    /// Gesture events, already dispatched to the sink.
    pub gestures: GestureOutput,
    /// Rig result, locomotion already forwarded to the sink.
    pub rig: RigOutput,
    /// Controller snapshot the tick ran on. Trigger and menu state are
    /// only reported here; mapping them is left to the host.
    pub controls: ControllerInput,
    /// Poses sampled this tick.
    pub poses: PoseFrame,
}

/// The process-wide bridge.
pub struct BridgeContext<R, S, A = HeadlessAllocator>
where
    R: TrackingRuntime + ActionSource + Compositor,
    S: InputSink,
    A: TargetAllocator,
{
    runtime: R,
    sink: S,
    actions: ActionTable,
    clock: FrameClock,
    poses: PoseSource,
    velocities: VelocityEstimator,
    gestures: GestureClassifier,
    pulses: PulseScheduler,
    rig: CameraRigSynchronizer,
    pipeline: StereoRenderPipeline<A>,
    origin: Transform,
    shut_down: bool,
}

impl<R, S, A> BridgeContext<R, S, A>
where
    R: TrackingRuntime + ActionSource + Compositor,
    S: InputSink,
    A: TargetAllocator,
{
    /// Validates the config and builds every component.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when any section fails validation.
    pub fn new(config: &BridgeConfig, runtime: R, sink: S, allocator: A) -> BridgeResult<Self> {
        config.validate()?;

        info!("Initializing bridge context");
        let actions = ActionTable::resolve(&runtime, &config.actions);
        let poses = PoseSource::new();
        info!("  ✓ Pose source");
        let velocities = VelocityEstimator::new();
        info!("  ✓ Velocity estimator");
        let gestures = GestureClassifier::new(&config.gestures);
        info!("  ✓ Gesture classifier");
        let pulses = PulseScheduler::new(config.pulse_hold_s);
        let rig = CameraRigSynchronizer::new(config.rig);
        info!("  ✓ Camera rig");
        let pipeline = StereoRenderPipeline::new(config.render, allocator);
        info!("  ✓ Stereo pipeline");

        Ok(Self {
            runtime,
            sink,
            actions,
            clock: FrameClock::new(),
            poses,
            velocities,
            gestures,
            pulses,
            rig,
            pipeline,
            origin: Transform::IDENTITY,
            shut_down: false,
        })
    }

    /// Gameplay tick: poses, velocities, gestures, rig.
    pub fn logic_tick(&mut self, dt: f32, signal: &CameraSignal<'_>) -> LogicReport {
        self.clock.advance(dt);
        let now = self.clock.time();
        let dt = self.clock.dt();

        self.pulses.poll(now, &mut self.sink);
        let controls = ControllerInput::read(&self.actions, &self.runtime);
        let poses = self.poses.sample(&self.runtime);

        for id in TrackedPointId::ALL {
            let pose = poses.get(id);
            if pose.valid {
                self.velocities.update(id, pose.position, dt);
            } else {
                self.velocities.invalidate(id);
            }
        }

        let input = GestureInput {
            now,
            dt,
            head: poses.head(),
            left: poses.get(Hand::Left.tracked_point()),
            right: poses.get(Hand::Right.tracked_point()),
            left_velocity: self.velocities.velocity(Hand::Left.tracked_point()),
            right_velocity: self.velocities.velocity(Hand::Right.tracked_point()),
            controls,
        };
        let gestures = self.gestures.update(&input);
        self.gestures.dispatch(&gestures, now, &mut self.pulses, &mut self.sink);

        let rig = self.rig.update(signal, &poses.head(), &controls, &self.clock);
        self.rig.emit_locomotion(&rig, &controls, &mut self.sink);
        self.origin = rig.origin;

        LogicReport { gestures, rig, controls, poses }
    }

    /// Render tick: re-reads the head as late as possible and prepares both
    /// eyes. An untracked head reuses its last valid pose.
    ///
    /// # Errors
    ///
    /// `ResourceAllocation` when eye targets could not be created. Nothing
    /// is submitted until a later tick succeeds.
    pub fn late_tick(&mut self) -> BridgeResult<StereoFrame> {
        let mut head = self.poses.get_pose(&self.runtime, TrackedPointId::Head);
        if !head.valid {
            head = self.poses.last_valid(TrackedPointId::Head);
        }
        let head_world = self.origin.compose(&head.transform());
        self.pipeline.prepare_frame(&self.runtime, head_world)
    }

    /// Hands the prepared eyes to the compositor.
    pub fn submit_frame(&mut self) {
        self.pipeline.submit(&mut self.runtime);
    }

    /// One whole display frame with timing.
    pub fn run_frame(&mut self, dt: f32, signal: &CameraSignal<'_>) -> FrameStats {
        let start = Instant::now();
        let before = self.pipeline.stats();

        let report = self.logic_tick(dt, signal);
        let logic_done = Instant::now();

        if let Err(err) = self.late_tick() {
            debug!("Frame {} not rendered: {}", self.clock.frame(), err);
        }
        self.submit_frame();
        let end = Instant::now();

        let after = self.pipeline.stats();
        let submitted = vrbridge_core::Eye::BOTH
            .iter()
            .all(|&eye| after.submitted(eye) > before.submitted(eye));

        FrameStats {
            frame: self.clock.frame(),
            total_us: micros(end - start),
            logic_us: micros(logic_done - start),
            late_us: micros(end - logic_done),
            gesture_events: u32::try_from(report.gestures.len()).unwrap_or(u32::MAX),
            submitted,
        }
    }

    /// Switches the rig between gameplay and menu following.
    pub fn set_menu_mode(&mut self, enabled: bool) {
        self.rig.set_menu_mode(enabled);
    }

    /// Clears snap-turn and re-aligns the body with the head.
    pub fn recenter(&mut self) {
        self.rig.recenter();
    }

    /// Tears everything down in reverse init order. Held keys are released
    /// and every gesture cooldown returns to zero. Safe to call twice.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        info!("Shutting down bridge context");
        self.pipeline.disable();
        self.rig.release(&mut self.sink);
        self.gestures.shutdown(&mut self.sink);
        self.pulses.flush(&mut self.sink);
        self.velocities.reset();
        self.shut_down = true;
        info!("Bridge context shut down after {} frames", self.clock.frame());
    }

    /// True once [`Self::shutdown`] has run.
    #[must_use]
    pub const fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// The runtime.
    #[must_use]
    pub const fn runtime(&self) -> &R {
        &self.runtime
    }

    /// The input sink.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// The input sink, mutably (draining recorded events).
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Resolved action table.
    #[must_use]
    pub const fn actions(&self) -> &ActionTable {
        &self.actions
    }

    /// Frame clock.
    #[must_use]
    pub const fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Pose source.
    #[must_use]
    pub const fn poses(&self) -> &PoseSource {
        &self.poses
    }

    /// Velocity estimator.
    #[must_use]
    pub const fn velocities(&self) -> &VelocityEstimator {
        &self.velocities
    }

    /// Gesture classifier.
    #[must_use]
    pub const fn gestures(&self) -> &GestureClassifier {
        &self.gestures
    }

    /// Pending pulse releases.
    #[must_use]
    pub const fn pulses(&self) -> &PulseScheduler {
        &self.pulses
    }

    /// Camera rig.
    #[must_use]
    pub const fn rig(&self) -> &CameraRigSynchronizer {
        &self.rig
    }

    /// Stereo pipeline.
    #[must_use]
    pub const fn pipeline(&self) -> &StereoRenderPipeline<A> {
        &self.pipeline
    }

    /// Stereo pipeline, mutably (enable / disable).
    pub fn pipeline_mut(&mut self) -> &mut StereoRenderPipeline<A> {
        &mut self.pipeline
    }
}

impl<R, S, A> Drop for BridgeContext<R, S, A>
where
    R: TrackingRuntime + ActionSource + Compositor,
    S: InputSink,
    A: TargetAllocator,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn micros(d: std::time::Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}
