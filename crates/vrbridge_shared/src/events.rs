//! # Input Sink Vocabulary
//!
//! Discrete events handed to the legacy input-emulation layer.
//! The layer maps buttons and axes onto keyboard/mouse input; this crate
//! only names them.

use serde::{Deserialize, Serialize};

/// Legacy keyboard/mouse action a gesture or stick can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyButton {
    /// Jump (space).
    Jump,
    /// Primary attack (left mouse).
    PrimaryAttack,
    /// Secondary action / block (right mouse).
    SecondaryAction,
    /// Interact / use (E).
    Interact,
    /// Open inventory.
    Inventory,
    /// Open map.
    Map,
    /// Pause menu.
    Pause,
    /// Sprint modifier.
    Run,
    /// Quick slot 1.
    QuickSlot1,
    /// Quick slot 2.
    QuickSlot2,
    /// Quick slot 3.
    QuickSlot3,
    /// Quick slot 4.
    QuickSlot4,
}

impl LegacyButton {
    /// Stable lowercase name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jump => "jump",
            Self::PrimaryAttack => "primary_attack",
            Self::SecondaryAction => "secondary_action",
            Self::Interact => "interact",
            Self::Inventory => "inventory",
            Self::Map => "map",
            Self::Pause => "pause",
            Self::Run => "run",
            Self::QuickSlot1 => "quick_slot_1",
            Self::QuickSlot2 => "quick_slot_2",
            Self::QuickSlot3 => "quick_slot_3",
            Self::QuickSlot4 => "quick_slot_4",
        }
    }
}

/// Legacy analog axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalogAxis {
    /// Strafe (A/D).
    MoveX,
    /// Forward/back (W/S).
    MoveY,
}

/// One event delivered to the input sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SinkEvent {
    /// Button goes down.
    Press(LegacyButton),
    /// Button goes up.
    Release(LegacyButton),
    /// Axis deflection in `-1.0..=1.0`.
    Analog(AnalogAxis, f32),
}

impl SinkEvent {
    /// Button carried by a press or release.
    #[must_use]
    pub const fn button(&self) -> Option<LegacyButton> {
        match self {
            Self::Press(b) | Self::Release(b) => Some(*b),
            Self::Analog(..) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_accessor() {
        assert_eq!(SinkEvent::Press(LegacyButton::Jump).button(), Some(LegacyButton::Jump));
        assert_eq!(SinkEvent::Analog(AnalogAxis::MoveY, 1.0).button(), None);
    }
}
