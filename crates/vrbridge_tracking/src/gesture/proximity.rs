//! Grip near a body anchor → one activation pulse.
//!
//! Re-arms only on grip release, even if the hand leaves the zone while
//! still gripping.

use vrbridge_shared::Vec3;

/// One proximity shortcut slot.
#[derive(Debug, Clone)]
pub struct ProximityShortcut {
    radius_sq: f32,
    armed: bool,
}

impl ProximityShortcut {
    /// Creates an armed slot with the given radius (meters).
    #[must_use]
    pub fn new(radius: f32) -> Self {
        Self { radius_sq: radius * radius, armed: true }
    }

    /// Advances one tick. Returns true on activation.
    pub fn update(&mut self, hand: Option<Vec3>, anchor: Vec3, grip: bool) -> bool {
        if !grip {
            self.armed = true;
            return false;
        }
        let Some(hand) = hand else {
            return false;
        };
        if self.armed && hand.distance_squared(anchor) <= self.radius_sq {
            self.armed = false;
            return true;
        }
        false
    }

    /// True when the next qualifying tick would fire.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Re-arms.
    pub fn reset(&mut self) {
        self.armed = true;
    }
}
