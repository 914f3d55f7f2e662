//! Per-tick controller input snapshot.
//!
//! Read once at the start of the logic tick through the action table, then
//! passed by reference to the gesture classifier and the camera rig.
//! Triggers and the menu button drive nothing inside the bridge; they are
//! sampled so the host can map them (fire, pause) from the tick report.

use vrbridge_shared::Vec2;

use crate::actions::{ActionKey, ActionSource, ActionTable};
use crate::runtime::TrackedPointId;

/// Controller hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    /// Left controller.
    Left,
    /// Right controller.
    Right,
}

impl Hand {
    /// Tracked point carrying this hand's pose.
    #[must_use]
    pub const fn tracked_point(self) -> TrackedPointId {
        match self {
            Self::Left => TrackedPointId::LeftHand,
            Self::Right => TrackedPointId::RightHand,
        }
    }
}

/// Button and stick state for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerInput {
    /// Left grip held.
    pub left_grip: bool,
    /// Right grip held.
    pub right_grip: bool,
    /// Left trigger held. Host pass-through.
    pub left_trigger: bool,
    /// Right trigger held. Host pass-through.
    pub right_trigger: bool,
    /// Left stick deflection (x right, y forward).
    pub left_stick: Vec2,
    /// Right stick deflection (x right, y forward).
    pub right_stick: Vec2,
    /// Menu button held. Host pass-through.
    pub menu: bool,
}

impl ControllerInput {
    /// Samples every action once.
    pub fn read<A: ActionSource + ?Sized>(table: &ActionTable, source: &A) -> Self {
        Self {
            left_grip: table.read_bool(source, ActionKey::LeftGrip),
            right_grip: table.read_bool(source, ActionKey::RightGrip),
            left_trigger: table.read_bool(source, ActionKey::LeftTrigger),
            right_trigger: table.read_bool(source, ActionKey::RightTrigger),
            left_stick: table.read_vec2(source, ActionKey::LeftStick),
            right_stick: table.read_vec2(source, ActionKey::RightStick),
            menu: table.read_bool(source, ActionKey::Menu),
        }
    }

    /// Grip state of one hand.
    #[must_use]
    pub const fn grip(&self, hand: Hand) -> bool {
        match hand {
            Hand::Left => self.left_grip,
            Hand::Right => self.right_grip,
        }
    }

    /// True when either grip is held.
    #[must_use]
    pub const fn any_grip(&self) -> bool {
        self.left_grip || self.right_grip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionBindings;
    use crate::mock::MockRuntime;

    #[test]
    fn test_hands_map_to_their_tracked_points() {
        assert_eq!(Hand::Left.tracked_point(), TrackedPointId::LeftHand);
        assert_eq!(Hand::Right.tracked_point(), TrackedPointId::RightHand);
    }

    #[test]
    fn test_triggers_and_menu_are_sampled() {
        let runtime = MockRuntime::new();
        let bindings = ActionBindings::default();
        let table = ActionTable::resolve(&runtime, &bindings);

        runtime.set_bool(&bindings.right_trigger, true);
        runtime.set_bool(&bindings.menu, true);
        let input = ControllerInput::read(&table, &runtime);

        assert!(input.right_trigger);
        assert!(input.menu);
        assert!(!input.left_trigger);
        assert!(!input.any_grip());
    }
}
