//! # Camera Rig Synchronizer
//!
//! Each logic tick, after gestures:
//!
//! 1. Observe the host's camera signal and (re-)anchor.
//! 2. Anchored: snap-turn, place the origin at the reference camera plus
//!    the eye offset, ease the body toward the head heading, update the
//!    run flag.
//! 3. Menu mode: freeze all of the above and look through the head
//!    instead, with a gaze cursor.
//!
//! Losing the camera suspends step 2 but keeps origin, yaw and body heading.

use tracing::{debug, info};

use vrbridge_core::{ControllerInput, FrameClock, InputSink};
use vrbridge_shared::math::DEGENERATE_EPSILON_SQ;
use vrbridge_shared::{AnalogAxis, LegacyButton, Quaternion, SinkEvent, Transform, Vec2, Vec3};
use vrbridge_tracking::Pose;

use crate::anchor::{AnchorChange, CameraAnchor, CameraSignal};
use crate::config::RigConfig;

/// Synchronizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigState {
    /// No gameplay camera. Rig state is held.
    Unanchored,
    /// Following the reference camera.
    Anchored,
    /// Following the reference camera's scene, but the camera follows the
    /// head instead of the other way round.
    MenuMode,
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigOutput {
    /// State after this tick.
    pub state: RigState,
    /// Tracking origin in world space.
    pub origin: Transform,
    /// Avatar body heading (degrees, `-180..180`).
    pub body_yaw_deg: f32,
    /// Locomotion run flag.
    pub run: bool,
    /// A snap-turn increment was applied this tick.
    pub snap_turned: bool,
    /// Transform to force onto the host camera (menu mode only).
    pub camera_override: Option<Transform>,
    /// World-space gaze cursor (menu mode only).
    pub cursor: Option<Vec3>,
    /// Head in world space.
    pub head_world: Transform,
}

/// Keeps the tracking origin attached to the host camera.
#[derive(Debug, Clone)]
pub struct CameraRigSynchronizer {
    config: RigConfig,
    anchor: CameraAnchor,
    menu_mode: bool,

    origin: Transform,
    head_local: Transform,
    reference_yaw_deg: f32,
    snap_yaw_deg: f32,
    snap_armed: bool,
    body_yaw_deg: f32,
    running: bool,
    last_run_at: Option<f64>,

    // What the sink last saw, so locomotion only emits on change.
    emitted_move: Vec2,
    emitted_run: bool,
}

impl CameraRigSynchronizer {
    /// Unanchored rig at the world origin.
    #[must_use]
    pub fn new(config: RigConfig) -> Self {
        Self {
            config,
            anchor: CameraAnchor::new(),
            menu_mode: false,
            origin: Transform::IDENTITY,
            head_local: Transform::IDENTITY,
            reference_yaw_deg: 0.0,
            snap_yaw_deg: 0.0,
            snap_armed: true,
            body_yaw_deg: 0.0,
            running: false,
            last_run_at: None,
            emitted_move: Vec2::ZERO,
            emitted_run: false,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> RigState {
        match (self.anchor.is_active(), self.menu_mode) {
            (false, _) => RigState::Unanchored,
            (true, false) => RigState::Anchored,
            (true, true) => RigState::MenuMode,
        }
    }

    /// Anchor record.
    #[must_use]
    pub const fn anchor(&self) -> &CameraAnchor {
        &self.anchor
    }

    /// Accumulated snap-turn yaw (degrees, `-180..180`).
    #[must_use]
    pub const fn snap_yaw_deg(&self) -> f32 {
        self.snap_yaw_deg
    }

    /// Enters or leaves menu mode. Driven by the host, e.g. when an
    /// inventory camera becomes active.
    pub fn set_menu_mode(&mut self, enabled: bool) {
        if self.menu_mode != enabled {
            info!("Menu mode {}", if enabled { "entered" } else { "left" });
            self.menu_mode = enabled;
        }
    }

    /// True while menu mode is requested.
    #[must_use]
    pub const fn menu_mode(&self) -> bool {
        self.menu_mode
    }

    /// Runs one logic tick.
    ///
    /// An invalid `head` keeps the previous head transform.
    pub fn update(
        &mut self,
        signal: &CameraSignal<'_>,
        head: &Pose,
        controls: &ControllerInput,
        clock: &FrameClock,
    ) -> RigOutput {
        match self.anchor.observe(signal) {
            AnchorChange::Acquired => {
                info!("Rig anchored to {:?} in scene '{}'", signal.camera, self.anchor.scene_id);
            }
            AnchorChange::Swapped => {
                info!(
                    "Reference camera changed to {:?} in scene '{}', re-anchoring",
                    signal.camera, self.anchor.scene_id
                );
            }
            AnchorChange::Lost => info!("Reference camera lost, rig suspended"),
            AnchorChange::Unchanged => {}
        }

        if head.valid {
            self.head_local = head.transform();
        }

        let state = self.state();
        let mut snap_turned = false;
        if state == RigState::Anchored {
            snap_turned = self.apply_snap_turn(controls.right_stick.x);
            self.origin = self.origin_from(&signal.transform);
            let head_world = self.origin.compose(&self.head_local);
            self.align_body(&head_world, clock.dt());
            self.update_run(controls.left_stick.y, clock.time());
        }

        let head_world = self.origin.compose(&self.head_local);
        let (camera_override, cursor) = if state == RigState::MenuMode {
            let cursor = head_world.position + head_world.forward() * self.config.cursor_distance_m;
            (Some(head_world), Some(cursor))
        } else {
            (None, None)
        };

        RigOutput {
            state,
            origin: self.origin,
            body_yaw_deg: self.body_yaw_deg,
            run: self.running && state == RigState::Anchored,
            snap_turned,
            camera_override,
            cursor,
            head_world,
        }
    }

    /// Clears accumulated snap-turn and points the body where the head
    /// currently looks.
    pub fn recenter(&mut self) {
        let undo = Quaternion::from_yaw_degrees(-self.snap_yaw_deg);
        self.origin.rotation = (undo * self.origin.rotation).normalize();
        self.snap_yaw_deg = 0.0;
        self.snap_armed = true;

        let heading = self.origin.compose(&self.head_local).forward().flatten();
        if heading.length_squared() >= DEGENERATE_EPSILON_SQ {
            self.body_yaw_deg = heading.yaw_degrees();
        }
        info!("Rig recentered, body yaw {:.0}°", self.body_yaw_deg);
    }

    /// Forwards stick and run changes to the sink. Outside `Anchored` the
    /// stick reads as centred and run as released.
    pub fn emit_locomotion<S: InputSink + ?Sized>(
        &mut self,
        output: &RigOutput,
        controls: &ControllerInput,
        sink: &mut S,
    ) {
        let stick = if output.state == RigState::Anchored { controls.left_stick } else { Vec2::ZERO };
        self.send_move(stick, sink);
        self.send_run(output.run, sink);
    }

    /// Centres the stick and releases run (teardown).
    pub fn release<S: InputSink + ?Sized>(&mut self, sink: &mut S) {
        self.send_move(Vec2::ZERO, sink);
        self.send_run(false, sink);
        self.running = false;
    }

    fn send_move<S: InputSink + ?Sized>(&mut self, stick: Vec2, sink: &mut S) {
        if (stick.x - self.emitted_move.x).abs() > f32::EPSILON {
            sink.emit(SinkEvent::Analog(AnalogAxis::MoveX, stick.x));
        }
        if (stick.y - self.emitted_move.y).abs() > f32::EPSILON {
            sink.emit(SinkEvent::Analog(AnalogAxis::MoveY, stick.y));
        }
        self.emitted_move = stick;
    }

    fn send_run<S: InputSink + ?Sized>(&mut self, run: bool, sink: &mut S) {
        if run != self.emitted_run {
            sink.emit(if run {
                SinkEvent::Press(LegacyButton::Run)
            } else {
                SinkEvent::Release(LegacyButton::Run)
            });
            self.emitted_run = run;
        }
    }

    fn origin_from(&mut self, reference: &Transform) -> Transform {
        let position = reference.position + reference.rotation.rotate(self.config.position_offset);
        if let Some(yaw) = heading_yaw(reference.rotation) {
            self.reference_yaw_deg = yaw;
        }
        Transform::from_pose(
            position,
            Quaternion::from_yaw_degrees(self.reference_yaw_deg + self.snap_yaw_deg),
        )
    }

    fn apply_snap_turn(&mut self, stick_x: f32) -> bool {
        let deflection = stick_x.abs();
        if !self.snap_armed {
            if deflection < self.config.snap_turn_reset {
                self.snap_armed = true;
            }
            return false;
        }
        if deflection > self.config.snap_turn_threshold {
            let step = self.config.snap_turn_angle_deg.copysign(stick_x);
            self.snap_yaw_deg = wrap_degrees(self.snap_yaw_deg + step);
            self.snap_armed = false;
            debug!("Snap turn {:+.0}°, rig yaw {:.0}°", step, self.snap_yaw_deg);
            return true;
        }
        false
    }

    fn align_body(&mut self, head_world: &Transform, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let heading = head_world.forward().flatten();
        if heading.length_squared() < DEGENERATE_EPSILON_SQ {
            // Looking straight up or down: no usable heading.
            return;
        }
        let delta = wrap_degrees(heading.yaw_degrees() - self.body_yaw_deg);
        let blend = 1.0 - (-self.config.body_rotation_speed_deg.to_radians() * dt).exp();
        self.body_yaw_deg = wrap_degrees(self.body_yaw_deg + delta * blend);
    }

    fn update_run(&mut self, stick_y: f32, now: f64) {
        if self.running {
            if stick_y.abs() < self.config.stick_deadzone || stick_y < 0.0 {
                self.running = false;
                debug!("Run off");
            }
        } else if stick_y > self.config.run_stick_threshold {
            let cooldown = f64::from(self.config.run_activation_cooldown_s);
            if self.last_run_at.map_or(true, |t| now - t >= cooldown) {
                self.running = true;
                self.last_run_at = Some(now);
                debug!("Run on");
            }
        }
    }
}

impl Default for CameraRigSynchronizer {
    fn default() -> Self {
        Self::new(RigConfig::default())
    }
}

/// Horizontal heading of a rotation (degrees).
///
/// Pitched straight up or down the forward axis has no horizontal part, so
/// the heading is read from the up axis instead: it points along the
/// heading when looking down and against it when looking up. `None` only
/// when neither axis is usable.
fn heading_yaw(rotation: Quaternion) -> Option<f32> {
    let forward = rotation.forward();
    let flat = forward.flatten();
    if flat.length_squared() >= DEGENERATE_EPSILON_SQ {
        return Some(flat.yaw_degrees());
    }
    let from_up = rotation.up().flatten() * -forward.y.signum();
    (from_up.length_squared() >= DEGENERATE_EPSILON_SQ).then(|| from_up.yaw_degrees())
}

/// Wraps an angle into `-180..180`.
fn wrap_degrees(deg: f32) -> f32 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrbridge_core::RecordingSink;

    use crate::anchor::CameraHandle;

    const DT: f32 = 1.0 / 90.0;

    fn camera(id: u64) -> CameraSignal<'static> {
        CameraSignal {
            camera: Some(CameraHandle(id)),
            scene_id: "town",
            transform: Transform::IDENTITY,
        }
    }

    fn head() -> Pose {
        Pose { position: Vec3::new(0.0, 1.7, 0.0), rotation: Quaternion::IDENTITY, valid: true }
    }

    fn stick(right_x: f32, left_y: f32) -> ControllerInput {
        ControllerInput {
            right_stick: Vec2::new(right_x, 0.0),
            left_stick: Vec2::new(0.0, left_y),
            ..ControllerInput::default()
        }
    }

    struct Harness {
        rig: CameraRigSynchronizer,
        clock: FrameClock,
    }

    impl Harness {
        fn new() -> Self {
            Self { rig: CameraRigSynchronizer::default(), clock: FrameClock::new() }
        }

        fn tick(&mut self, signal: &CameraSignal<'_>, head: &Pose, controls: &ControllerInput) -> RigOutput {
            self.clock.advance(DT);
            self.rig.update(signal, head, controls, &self.clock)
        }

        fn run_for(&mut self, seconds: f32, controls: &ControllerInput) -> Vec<RigOutput> {
            let ticks = (seconds / DT).round() as usize;
            (0..ticks).map(|_| self.tick(&camera(1), &head(), controls)).collect()
        }
    }

    #[test]
    fn test_starts_unanchored() {
        let mut h = Harness::new();
        assert_eq!(h.rig.state(), RigState::Unanchored);
        let out = h.tick(&CameraSignal::none("boot"), &head(), &ControllerInput::default());
        assert_eq!(out.state, RigState::Unanchored);
        assert_eq!(out.origin, Transform::IDENTITY);
    }

    #[test]
    fn test_origin_applies_offset_in_camera_space() {
        let mut h = Harness::new();
        let signal = CameraSignal {
            camera: Some(CameraHandle(1)),
            scene_id: "town",
            transform: Transform::from_pose(Vec3::new(1.0, 1.6, 2.0), Quaternion::IDENTITY),
        };
        let out = h.tick(&signal, &head(), &ControllerInput::default());
        assert_eq!(out.state, RigState::Anchored);
        assert!(out.origin.position.distance(Vec3::new(1.0, 1.65, 1.9)) < 1e-5);
    }

    #[test]
    fn test_vertical_camera_keeps_heading() {
        let mut h = Harness::new();
        for pitch_deg in [0.0_f32, 60.0, 85.0, 89.9, 90.0, -90.0, -89.9] {
            let rotation = Quaternion::from_yaw_degrees(45.0)
                * Quaternion::from_axis_angle(Vec3::X, pitch_deg.to_radians());
            let signal = CameraSignal {
                camera: Some(CameraHandle(1)),
                scene_id: "town",
                transform: Transform::from_pose(Vec3::ZERO, rotation),
            };
            let out = h.tick(&signal, &head(), &ControllerInput::default());
            let yaw = out.origin.forward().flatten().yaw_degrees();
            assert!((yaw - 45.0).abs() < 0.1, "pitch {pitch_deg}: origin yaw {yaw}");
        }
    }

    #[test]
    fn test_snap_turn_debounce() {
        let mut h = Harness::new();
        let held = h.run_for(1.0, &stick(0.9, 0.0));
        assert_eq!(held.iter().filter(|o| o.snap_turned).count(), 1);
        assert!((h.rig.snap_yaw_deg() - 30.0).abs() < 1e-4);

        h.run_for(0.1, &stick(0.1, 0.0));
        let again = h.run_for(0.5, &stick(0.9, 0.0));
        assert_eq!(again.iter().filter(|o| o.snap_turned).count(), 1);
        assert!((h.rig.snap_yaw_deg() - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_snap_turn_does_not_rearm_between_thresholds() {
        let mut h = Harness::new();
        h.run_for(0.1, &stick(-0.9, 0.0));
        // 0.5 is below the trigger but above the reset
        h.run_for(0.2, &stick(-0.5, 0.0));
        let out = h.run_for(0.2, &stick(-0.9, 0.0));
        assert!(out.iter().all(|o| !o.snap_turned));
        assert!((h.rig.snap_yaw_deg() + 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_body_eases_toward_head() {
        let mut h = Harness::new();
        let turned = Pose { rotation: Quaternion::from_yaw_degrees(90.0), ..head() };
        let first = h.tick(&camera(1), &turned, &ControllerInput::default());
        let expected = 90.0 * (1.0 - (-std::f32::consts::PI * DT).exp());
        assert!((first.body_yaw_deg - expected).abs() < 1e-3);

        let mut last = first;
        for _ in 0..450 {
            last = h.tick(&camera(1), &turned, &ControllerInput::default());
        }
        assert!((last.body_yaw_deg - 90.0).abs() < 0.1);
    }

    #[test]
    fn test_run_flag_cooldown_and_release() {
        let mut h = Harness::new();
        let on = h.tick(&camera(1), &head(), &stick(0.0, 1.0));
        assert!(on.run);

        let off = h.tick(&camera(1), &head(), &stick(0.0, 0.05));
        assert!(!off.run);

        // re-activation inside 0.25 s is refused
        let early = h.tick(&camera(1), &head(), &stick(0.0, 1.0));
        assert!(!early.run);
        let later = h.run_for(0.3, &stick(0.0, 1.0));
        assert!(later.last().is_some_and(|o| o.run));

        // reversing clears it
        let back = h.tick(&camera(1), &head(), &stick(0.0, -0.5));
        assert!(!back.run);
    }

    #[test]
    fn test_lost_camera_suspends_without_reset() {
        let mut h = Harness::new();
        h.run_for(0.1, &stick(0.9, 0.0));
        let anchored = h.tick(&camera(1), &head(), &stick(0.0, 0.0));

        let suspended = h.tick(&CameraSignal::none("loading"), &head(), &stick(-0.9, 0.0));
        assert_eq!(suspended.state, RigState::Unanchored);
        assert!(!suspended.snap_turned);
        assert_eq!(suspended.origin, anchored.origin);
        assert_eq!(suspended.body_yaw_deg, anchored.body_yaw_deg);
        assert!((h.rig.snap_yaw_deg() - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_camera_swap_keeps_rig_state() {
        let mut h = Harness::new();
        h.run_for(0.1, &stick(0.9, 0.0));
        h.run_for(0.1, &stick(0.0, 0.0));
        let out = h.tick(&camera(2), &head(), &ControllerInput::default());
        assert_eq!(out.state, RigState::Anchored);
        assert_eq!(h.rig.anchor().reference_camera, Some(CameraHandle(2)));
        assert!((h.rig.snap_yaw_deg() - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_menu_mode_overrides_camera_and_places_cursor() {
        let mut h = Harness::new();
        let anchored = h.tick(&camera(1), &head(), &ControllerInput::default());
        h.rig.set_menu_mode(true);

        let out = h.tick(&camera(1), &head(), &stick(0.9, 1.0));
        assert_eq!(out.state, RigState::MenuMode);
        assert!(!out.snap_turned);
        assert!(!out.run);
        assert_eq!(out.origin, anchored.origin);

        let view = out.camera_override.unwrap_or_default();
        assert!(view.position.distance(Vec3::new(0.0, 1.75, -0.1)) < 1e-5);
        let cursor = out.cursor.unwrap_or_default();
        assert!(cursor.distance(Vec3::new(0.0, 1.75, 1.9)) < 1e-5);
    }

    #[test]
    fn test_recenter_clears_snap_and_aligns_body() {
        let mut h = Harness::new();
        h.run_for(0.1, &stick(0.9, 0.0));
        h.rig.recenter();
        assert_eq!(h.rig.snap_yaw_deg(), 0.0);
        let out = h.tick(&camera(1), &head(), &ControllerInput::default());
        assert!(out.body_yaw_deg.abs() < 1e-3);
    }

    #[test]
    fn test_locomotion_emits_on_change_only() {
        let mut h = Harness::new();
        let mut sink = RecordingSink::new();
        let controls = stick(0.0, 1.0);
        for _ in 0..3 {
            let out = h.tick(&camera(1), &head(), &controls);
            h.rig.emit_locomotion(&out, &controls, &mut sink);
        }
        assert_eq!(
            sink.take(),
            vec![
                SinkEvent::Analog(AnalogAxis::MoveY, 1.0),
                SinkEvent::Press(LegacyButton::Run),
            ]
        );

        h.rig.release(&mut sink);
        assert_eq!(
            sink.take(),
            vec![
                SinkEvent::Analog(AnalogAxis::MoveY, 0.0),
                SinkEvent::Release(LegacyButton::Run),
            ]
        );
    }

    #[test]
    fn test_wrap_degrees() {
        assert!((wrap_degrees(190.0) + 170.0).abs() < 1e-4);
        assert!((wrap_degrees(-190.0) - 170.0).abs() < 1e-4);
        assert!((wrap_degrees(30.0) - 30.0).abs() < 1e-4);
    }
}
