//! # Gesture Classification
//!
//! Independent state machines evaluated once per logic tick:
//!
//! | gesture   | states                  | output                          |
//! |-----------|-------------------------|---------------------------------|
//! | jump      | Ready / Cooldown        | tap                             |
//! | melee     | Idle / Attacking        | press, release                  |
//! | long-press| Released / Pressed      | begin, end, or long tap         |
//! | proximity | armed flag per slot     | tap                             |
//!
//! The classifier keeps no queue. [`GestureClassifier::update`] returns at
//! most one event per gesture per tick, and [`GestureClassifier::dispatch`]
//! hands them to the input sink, routing taps through the pulse scheduler.

mod jump;
mod long_press;
mod melee;
mod proximity;

pub use jump::{JumpGesture, JumpState};
pub use long_press::{GripState, LongPressEdge, LongPressGrip};
pub use melee::{MeleeSwing, SwingEdge, SwingPhase};
pub use proximity::ProximityShortcut;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use vrbridge_core::{BridgeError, BridgeResult, ControllerInput, Hand, InputSink, PulseScheduler};
use vrbridge_shared::constants::{
    ATTACK_VELOCITY, JUMP_COOLDOWN_S, JUMP_VELOCITY, LONG_PRESS_S, PROXIMITY_RADIUS_M,
    RELEASE_VELOCITY, SWING_INTERVAL_S,
};
use vrbridge_shared::{LegacyButton, Quaternion, SinkEvent, Vec3};

use crate::pose::Pose;

/// Maximum number of proximity shortcut slots.
pub const MAX_SHORTCUT_SLOTS: usize = 4;

/// Upper bound on events produced in one tick.
const MAX_EVENTS_PER_TICK: usize = 3 + MAX_SHORTCUT_SLOTS;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Legacy buttons driven by each gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureButtons {
    /// Tapped on jump.
    pub jump: LegacyButton,
    /// Held while a melee swing is active.
    pub attack: LegacyButton,
    /// Held while a grip is held.
    pub short_action: LegacyButton,
    /// Tapped when a grip is released after a long hold.
    pub long_action: LegacyButton,
}

impl Default for GestureButtons {
    fn default() -> Self {
        Self {
            jump: LegacyButton::Jump,
            attack: LegacyButton::PrimaryAttack,
            short_action: LegacyButton::SecondaryAction,
            long_action: LegacyButton::Inventory,
        }
    }
}

/// One body-relative proximity shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShortcutSlot {
    /// Hand that must grip near the anchor.
    pub hand: Hand,
    /// Anchor relative to the head, rotated by head yaw only (meters).
    pub anchor: Vec3,
    /// Button tapped on activation.
    pub button: LegacyButton,
}

/// Gesture thresholds and bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Vertical hand speed both hands must exceed to jump (m/s).
    pub jump_velocity: f32,
    /// Delay before another jump may fire (s).
    pub jump_cooldown_s: f32,
    /// Right-hand speed that starts a swing (m/s).
    pub attack_velocity: f32,
    /// Right-hand speed below which a swing ends (m/s).
    pub release_velocity: f32,
    /// Minimum time between swing starts (s).
    pub swing_interval_s: f32,
    /// Grip hold that counts as a long press (s).
    pub long_press_s: f32,
    /// Proximity shortcut radius (m).
    pub proximity_radius_m: f32,
    /// Proximity shortcut slots, at most [`MAX_SHORTCUT_SLOTS`].
    pub shortcuts: Vec<ShortcutSlot>,
    /// Button bindings.
    pub buttons: GestureButtons,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            jump_velocity: JUMP_VELOCITY,
            jump_cooldown_s: JUMP_COOLDOWN_S,
            attack_velocity: ATTACK_VELOCITY,
            release_velocity: RELEASE_VELOCITY,
            swing_interval_s: SWING_INTERVAL_S,
            long_press_s: LONG_PRESS_S,
            proximity_radius_m: PROXIMITY_RADIUS_M,
            // Over-the-shoulder grabs.
            shortcuts: vec![
                ShortcutSlot {
                    hand: Hand::Left,
                    anchor: Vec3::new(-0.2, -0.25, -0.05),
                    button: LegacyButton::QuickSlot1,
                },
                ShortcutSlot {
                    hand: Hand::Right,
                    anchor: Vec3::new(0.2, -0.25, -0.05),
                    button: LegacyButton::QuickSlot2,
                },
            ],
            buttons: GestureButtons::default(),
        }
    }
}

impl GestureConfig {
    /// Checks thresholds for values the state machines cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> BridgeResult<()> {
        let positive = [
            ("jump_velocity", self.jump_velocity),
            ("attack_velocity", self.attack_velocity),
            ("release_velocity", self.release_velocity),
            ("proximity_radius_m", self.proximity_radius_m),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(BridgeError::InvalidConfig(format!("{name} must be positive, got {value}")));
            }
        }
        let non_negative = [
            ("jump_cooldown_s", self.jump_cooldown_s),
            ("swing_interval_s", self.swing_interval_s),
            ("long_press_s", self.long_press_s),
        ];
        for (name, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(BridgeError::InvalidConfig(format!("{name} must not be negative, got {value}")));
            }
        }
        if self.release_velocity >= self.attack_velocity {
            return Err(BridgeError::InvalidConfig(format!(
                "release_velocity ({}) must be below attack_velocity ({})",
                self.release_velocity, self.attack_velocity
            )));
        }
        if self.shortcuts.len() > MAX_SHORTCUT_SLOTS {
            return Err(BridgeError::InvalidConfig(format!(
                "at most {MAX_SHORTCUT_SLOTS} shortcut slots, got {}",
                self.shortcuts.len()
            )));
        }
        Ok(())
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// Discrete gesture outcome for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// Both hands swung up.
    Jump,
    /// Melee swing started.
    SwingPress,
    /// Melee swing ended.
    SwingRelease,
    /// A grip went down.
    ShortActionBegin,
    /// Grip released before the long-press threshold.
    ShortActionEnd,
    /// Grip released after the long-press threshold.
    LongActionTap,
    /// Proximity shortcut fired.
    ShortcutActivate {
        /// Index into the configured slots.
        slot: usize,
    },
}

/// Events produced by one tick, in evaluation order. Fixed capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureOutput {
    events: [Option<GestureEvent>; MAX_EVENTS_PER_TICK],
    len: usize,
}

impl GestureOutput {
    fn push(&mut self, event: GestureEvent) {
        if self.len < MAX_EVENTS_PER_TICK {
            self.events[self.len] = Some(event);
            self.len += 1;
        }
    }

    /// Events in order.
    pub fn iter(&self) -> impl Iterator<Item = GestureEvent> + '_ {
        self.events[..self.len].iter().flatten().copied()
    }

    /// Number of events.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True when nothing happened.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True if `event` was produced.
    #[must_use]
    pub fn contains(&self, event: GestureEvent) -> bool {
        self.iter().any(|e| e == event)
    }
}

/// Everything the classifier reads in one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureInput {
    /// Simulated time (s).
    pub now: f64,
    /// Tick length (s).
    pub dt: f32,
    /// Head pose.
    pub head: Pose,
    /// Left hand pose.
    pub left: Pose,
    /// Right hand pose.
    pub right: Pose,
    /// Smoothed left hand velocity.
    pub left_velocity: Vec3,
    /// Smoothed right hand velocity.
    pub right_velocity: Vec3,
    /// Buttons and sticks.
    pub controls: ControllerInput,
}

impl GestureInput {
    const fn hand(&self, hand: Hand) -> Pose {
        match hand {
            Hand::Left => self.left,
            Hand::Right => self.right,
        }
    }
}

// =============================================================================
// CLASSIFIER
// =============================================================================

/// Owns every gesture state machine.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    buttons: GestureButtons,
    jump: JumpGesture,
    melee: MeleeSwing,
    long_press: LongPressGrip,
    slots: [Option<ShortcutSlot>; MAX_SHORTCUT_SLOTS],
    proximity: [ProximityShortcut; MAX_SHORTCUT_SLOTS],
}

impl GestureClassifier {
    /// Builds the state machines from a config. Slots beyond
    /// [`MAX_SHORTCUT_SLOTS`] are ignored.
    #[must_use]
    pub fn new(config: &GestureConfig) -> Self {
        if config.shortcuts.len() > MAX_SHORTCUT_SLOTS {
            warn!(
                "{} shortcut slots configured, only the first {} are used",
                config.shortcuts.len(),
                MAX_SHORTCUT_SLOTS
            );
        }
        let mut slots = [None; MAX_SHORTCUT_SLOTS];
        for (dst, src) in slots.iter_mut().zip(&config.shortcuts) {
            *dst = Some(*src);
        }
        let radius = config.proximity_radius_m;
        Self {
            buttons: config.buttons,
            jump: JumpGesture::new(config.jump_velocity, config.jump_cooldown_s),
            melee: MeleeSwing::new(
                config.attack_velocity,
                config.release_velocity,
                config.swing_interval_s,
            ),
            long_press: LongPressGrip::new(config.long_press_s),
            slots,
            proximity: [
                ProximityShortcut::new(radius),
                ProximityShortcut::new(radius),
                ProximityShortcut::new(radius),
                ProximityShortcut::new(radius),
            ],
        }
    }

    /// Evaluates every gesture once.
    ///
    /// Untracked hands contribute zero velocity and no position: jump and
    /// proximity cannot fire, and an active swing releases.
    pub fn update(&mut self, input: &GestureInput) -> GestureOutput {
        let mut out = GestureOutput::default();

        let both_tracked = input.left.valid && input.right.valid;
        let (left_vy, right_vy) = if both_tracked {
            (input.left_velocity.y, input.right_velocity.y)
        } else {
            (0.0, 0.0)
        };
        if self.jump.update(left_vy, right_vy, input.dt) {
            out.push(GestureEvent::Jump);
        }

        let speed = if input.right.valid { input.right_velocity.length() } else { 0.0 };
        match self.melee.update(speed, input.now) {
            Some(SwingEdge::Press) => out.push(GestureEvent::SwingPress),
            Some(SwingEdge::Release) => out.push(GestureEvent::SwingRelease),
            None => {}
        }

        match self.long_press.update(input.controls.any_grip(), input.now) {
            Some(LongPressEdge::ShortBegin) => out.push(GestureEvent::ShortActionBegin),
            Some(LongPressEdge::ShortEnd) => out.push(GestureEvent::ShortActionEnd),
            Some(LongPressEdge::LongTap) => out.push(GestureEvent::LongActionTap),
            None => {}
        }

        let body = body_frame(&input.head);
        for (index, (slot, state)) in self.slots.iter().zip(&mut self.proximity).enumerate() {
            let Some(slot) = slot else { continue };
            let hand = input.hand(slot.hand);
            let hand_position = match body {
                Some(_) if hand.valid => Some(hand.position),
                _ => None,
            };
            let anchor = body.map_or(Vec3::ZERO, |(origin, yaw)| origin + yaw.rotate(slot.anchor));
            if state.update(hand_position, anchor, input.controls.grip(slot.hand)) {
                out.push(GestureEvent::ShortcutActivate { slot: index });
            }
        }

        out
    }

    /// Hands one tick's events to the sink. Taps go through `pulses`.
    pub fn dispatch<S: InputSink + ?Sized>(
        &self,
        output: &GestureOutput,
        now: f64,
        pulses: &mut PulseScheduler,
        sink: &mut S,
    ) {
        let b = &self.buttons;
        for event in output.iter() {
            debug!("Gesture {:?}", event);
            match event {
                GestureEvent::Jump => pulses.tap(b.jump, now, sink),
                GestureEvent::SwingPress => sink.emit(SinkEvent::Press(b.attack)),
                GestureEvent::SwingRelease => sink.emit(SinkEvent::Release(b.attack)),
                GestureEvent::ShortActionBegin => sink.emit(SinkEvent::Press(b.short_action)),
                GestureEvent::ShortActionEnd => sink.emit(SinkEvent::Release(b.short_action)),
                GestureEvent::LongActionTap => {
                    // The short action went down on the press edge.
                    sink.emit(SinkEvent::Release(b.short_action));
                    pulses.tap(b.long_action, now, sink);
                }
                GestureEvent::ShortcutActivate { slot } => {
                    if let Some(Some(s)) = self.slots.get(slot) {
                        pulses.tap(s.button, now, sink);
                    }
                }
            }
        }
    }

    /// Releases buttons held by an active swing or grip, then resets every
    /// timer to zero.
    pub fn shutdown<S: InputSink + ?Sized>(&mut self, sink: &mut S) {
        if self.melee.phase() == SwingPhase::Attacking {
            sink.emit(SinkEvent::Release(self.buttons.attack));
        }
        if matches!(self.long_press.state(), GripState::Pressed(_)) {
            sink.emit(SinkEvent::Release(self.buttons.short_action));
        }
        self.reset_timers();
    }

    /// Returns every machine to its initial state without emitting.
    pub fn reset_timers(&mut self) {
        self.jump.reset();
        self.melee.reset();
        self.long_press.reset();
        for p in &mut self.proximity {
            p.reset();
        }
    }

    /// Jump state.
    #[must_use]
    pub const fn jump_state(&self) -> JumpState {
        self.jump.state()
    }

    /// Melee phase.
    #[must_use]
    pub const fn swing_phase(&self) -> SwingPhase {
        self.melee.phase()
    }

    /// Grip hold state.
    #[must_use]
    pub const fn grip_state(&self) -> GripState {
        self.long_press.state()
    }
}

/// Head position and head yaw, the frame proximity anchors live in.
fn body_frame(head: &Pose) -> Option<(Vec3, Quaternion)> {
    if !head.valid {
        return None;
    }
    let yaw = head.forward().flatten().yaw_degrees();
    Some((head.position, Quaternion::from_yaw_degrees(yaw)))
}
