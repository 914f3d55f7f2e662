//! Grip hold duration → short action or long-action tap.
//!
//! Either grip counts as pressed; both hands share one state.

/// Edge produced by the long-press detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongPressEdge {
    /// Grip went down.
    ShortBegin,
    /// Grip released before the long-press threshold.
    ShortEnd,
    /// Grip released at or after the long-press threshold.
    LongTap,
}

/// Grip hold state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GripState {
    /// No grip held.
    Released,
    /// Held since the given time.
    Pressed(f64),
}

/// Classifies grip holds by duration.
#[derive(Debug, Clone)]
pub struct LongPressGrip {
    state: GripState,
    threshold_s: f64,
}

impl LongPressGrip {
    /// Creates a released detector.
    #[must_use]
    pub fn new(threshold_s: f32) -> Self {
        Self { state: GripState::Released, threshold_s: f64::from(threshold_s) }
    }

    /// Advances one tick.
    pub fn update(&mut self, pressed: bool, now: f64) -> Option<LongPressEdge> {
        match (self.state, pressed) {
            (GripState::Released, true) => {
                self.state = GripState::Pressed(now);
                Some(LongPressEdge::ShortBegin)
            }
            (GripState::Pressed(since), false) => {
                self.state = GripState::Released;
                if now - since >= self.threshold_s {
                    Some(LongPressEdge::LongTap)
                } else {
                    Some(LongPressEdge::ShortEnd)
                }
            }
            _ => None,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> GripState {
        self.state
    }

    /// Forgets any hold in progress.
    pub fn reset(&mut self) {
        self.state = GripState::Released;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hold(duration: f64) -> Vec<LongPressEdge> {
        let mut grip = LongPressGrip::new(2.0);
        let mut edges = Vec::new();
        let mut t = 0.0;
        edges.extend(grip.update(true, t));
        while t < duration {
            t += 0.01;
            edges.extend(grip.update(true, t));
        }
        edges.extend(grip.update(false, t));
        edges
    }

    #[test]
    fn test_long_hold_emits_tap() {
        assert_eq!(hold(2.5), vec![LongPressEdge::ShortBegin, LongPressEdge::LongTap]);
    }

    #[test]
    fn test_short_hold_emits_end() {
        assert_eq!(hold(0.5), vec![LongPressEdge::ShortBegin, LongPressEdge::ShortEnd]);
    }

    #[test]
    fn test_held_grip_is_silent() {
        let mut grip = LongPressGrip::new(2.0);
        assert_eq!(grip.update(true, 0.0), Some(LongPressEdge::ShortBegin));
        assert_eq!(grip.update(true, 1.0), None);
        assert_eq!(grip.update(true, 3.0), None);
        assert!(matches!(grip.state(), GripState::Pressed(_)));
    }
}
