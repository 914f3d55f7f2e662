//! # Action Capability Table
//!
//! Named input actions are resolved exactly once at startup into a fixed
//! table keyed by [`ActionKey`]. A name the action source does not know
//! becomes [`ActionHandle::Unresolved`]: it is logged once and then reads
//! as "not pressed" / zero for the rest of the process.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use vrbridge_shared::Vec2;

use crate::error::BridgeError;

/// Runtime-assigned identifier for a resolved action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(pub u64);

/// Shape of an action's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Digital button.
    Boolean,
    /// Two-axis analog (thumbstick).
    Vector2,
}

/// Stable key for every action the bridge reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKey {
    /// Left controller grip.
    LeftGrip,
    /// Right controller grip.
    RightGrip,
    /// Left controller trigger (reported to the host only).
    LeftTrigger,
    /// Right controller trigger (reported to the host only).
    RightTrigger,
    /// Left thumbstick (locomotion).
    LeftStick,
    /// Right thumbstick (turning).
    RightStick,
    /// Menu / system-adjacent button (reported to the host only).
    Menu,
}

impl ActionKey {
    /// Number of keys.
    pub const COUNT: usize = 7;

    /// All keys in table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::LeftGrip,
        Self::RightGrip,
        Self::LeftTrigger,
        Self::RightTrigger,
        Self::LeftStick,
        Self::RightStick,
        Self::Menu,
    ];

    /// Table slot.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Value shape.
    #[must_use]
    pub const fn kind(self) -> ActionKind {
        match self {
            Self::LeftStick | Self::RightStick => ActionKind::Vector2,
            _ => ActionKind::Boolean,
        }
    }
}

/// Action names looked up in the action source, one per key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionBindings {
    /// Left grip action name.
    pub left_grip: String,
    /// Right grip action name.
    pub right_grip: String,
    /// Left trigger action name.
    pub left_trigger: String,
    /// Right trigger action name.
    pub right_trigger: String,
    /// Left stick action name.
    pub left_stick: String,
    /// Right stick action name.
    pub right_stick: String,
    /// Menu button action name.
    pub menu: String,
}

impl Default for ActionBindings {
    fn default() -> Self {
        Self {
            left_grip: "/actions/default/in/GrabGripLeft".to_string(),
            right_grip: "/actions/default/in/GrabGripRight".to_string(),
            left_trigger: "/actions/default/in/TriggerLeft".to_string(),
            right_trigger: "/actions/default/in/TriggerRight".to_string(),
            left_stick: "/actions/default/in/Move".to_string(),
            right_stick: "/actions/default/in/Turn".to_string(),
            menu: "/actions/default/in/Menu".to_string(),
        }
    }
}

impl ActionBindings {
    /// Name bound to `key`.
    #[must_use]
    pub fn name(&self, key: ActionKey) -> &str {
        match key {
            ActionKey::LeftGrip => &self.left_grip,
            ActionKey::RightGrip => &self.right_grip,
            ActionKey::LeftTrigger => &self.left_trigger,
            ActionKey::RightTrigger => &self.right_trigger,
            ActionKey::LeftStick => &self.left_stick,
            ActionKey::RightStick => &self.right_stick,
            ActionKey::Menu => &self.menu,
        }
    }
}

/// The runtime's action system.
pub trait ActionSource {
    /// Looks up an action by name. `None` when the name is unknown.
    fn resolve_action(&self, name: &str, kind: ActionKind) -> Option<ActionId>;

    /// Current state of a boolean action.
    fn bool_state(&self, id: ActionId) -> bool;

    /// Current state of a two-axis action.
    fn vec2_state(&self, id: ActionId) -> Vec2;
}

/// Result of resolving one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionHandle {
    /// Bound to a runtime action.
    Resolved(ActionId),
    /// Permanently neutral.
    Unresolved,
}

/// Capability table from [`ActionKey`] to resolved handle.
#[derive(Debug, Clone)]
pub struct ActionTable {
    handles: [ActionHandle; ActionKey::COUNT],
}

impl ActionTable {
    /// A table where nothing is bound. Every read is neutral.
    #[must_use]
    pub const fn unresolved() -> Self {
        Self { handles: [ActionHandle::Unresolved; ActionKey::COUNT] }
    }

    /// Resolves every key once.
    ///
    /// Unknown names are logged and left unresolved; resolution never fails
    /// as a whole.
    pub fn resolve<A: ActionSource + ?Sized>(source: &A, bindings: &ActionBindings) -> Self {
        let mut table = Self::unresolved();
        for key in ActionKey::ALL {
            let name = bindings.name(key);
            table.handles[key.index()] = match source.resolve_action(name, key.kind()) {
                Some(id) => ActionHandle::Resolved(id),
                None => {
                    let err = BridgeError::ActionResolution(name.to_string());
                    warn!("{err} ({key:?} reads neutral)");
                    ActionHandle::Unresolved
                }
            };
        }
        info!(
            "Action table resolved: {}/{} bound",
            ActionKey::COUNT - table.unresolved_count(),
            ActionKey::COUNT
        );
        table
    }

    /// Handle for a key.
    #[must_use]
    pub const fn handle(&self, key: ActionKey) -> ActionHandle {
        self.handles[key.index()]
    }

    /// Number of keys left unresolved.
    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.handles.iter().filter(|h| matches!(h, ActionHandle::Unresolved)).count()
    }

    /// Reads a boolean action; `false` when unresolved.
    pub fn read_bool<A: ActionSource + ?Sized>(&self, source: &A, key: ActionKey) -> bool {
        match self.handle(key) {
            ActionHandle::Resolved(id) => source.bool_state(id),
            ActionHandle::Unresolved => false,
        }
    }

    /// Reads a two-axis action; zero when unresolved.
    pub fn read_vec2<A: ActionSource + ?Sized>(&self, source: &A, key: ActionKey) -> Vec2 {
        match self.handle(key) {
            ActionHandle::Resolved(id) => source.vec2_state(id),
            ActionHandle::Unresolved => Vec2::ZERO,
        }
    }
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::unresolved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockRuntime;

    #[test]
    fn test_missing_action_reads_neutral() {
        let runtime = MockRuntime::new();
        let mut bindings = ActionBindings::default();
        bindings.right_grip = "/actions/default/in/DoesNotExist".to_string();

        runtime.set_bool(&bindings.left_grip, true);
        let table = ActionTable::resolve(&runtime, &bindings);

        assert_eq!(table.unresolved_count(), 1);
        assert_eq!(table.handle(ActionKey::RightGrip), ActionHandle::Unresolved);
        assert!(table.read_bool(&runtime, ActionKey::LeftGrip));
        assert!(!table.read_bool(&runtime, ActionKey::RightGrip));
    }

    #[test]
    fn test_unresolved_stays_neutral_even_if_action_appears_later() {
        let runtime = MockRuntime::new();
        let mut bindings = ActionBindings::default();
        bindings.left_stick = "late".to_string();
        let table = ActionTable::resolve(&runtime, &bindings);

        // The name never resolved at startup; later registration is ignored.
        runtime.register_action("late");
        runtime.set_vec2("late", Vec2::new(1.0, 1.0));
        assert_eq!(table.read_vec2(&runtime, ActionKey::LeftStick), Vec2::ZERO);
    }

    #[test]
    fn test_key_indices_match_table_order() {
        for (i, key) in ActionKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }
}
