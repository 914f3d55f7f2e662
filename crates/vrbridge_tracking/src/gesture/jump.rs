//! Two-handed upward swing → jump.

/// Jump state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpState {
    /// Armed.
    Ready,
    /// Fired recently; seconds until re-armed.
    Cooldown(f32),
}

/// Fires when both hands move up faster than a threshold in the same tick.
/// At most one jump per cooldown window.
#[derive(Debug, Clone)]
pub struct JumpGesture {
    state: JumpState,
    threshold: f32,
    cooldown_s: f32,
}

impl JumpGesture {
    /// Creates an armed jump detector.
    #[must_use]
    pub const fn new(threshold: f32, cooldown_s: f32) -> Self {
        Self { state: JumpState::Ready, threshold, cooldown_s }
    }

    /// Advances one tick. Returns true when a jump fires.
    pub fn update(&mut self, left_vy: f32, right_vy: f32, dt: f32) -> bool {
        if let JumpState::Cooldown(remaining) = self.state {
            let remaining = remaining - dt.max(0.0);
            self.state = if remaining <= 0.0 {
                JumpState::Ready
            } else {
                JumpState::Cooldown(remaining)
            };
        }

        if self.state == JumpState::Ready && left_vy > self.threshold && right_vy > self.threshold {
            self.state = JumpState::Cooldown(self.cooldown_s);
            return true;
        }
        false
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> JumpState {
        self.state
    }

    /// Re-arms with the timer at zero.
    pub fn reset(&mut self) {
        self.state = JumpState::Ready;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 90.0;

    #[test]
    fn test_requires_both_hands() {
        let mut jump = JumpGesture::new(1.5, 0.8);
        assert!(!jump.update(2.0, 1.0, DT));
        assert!(!jump.update(1.0, 2.0, DT));
        assert!(!jump.update(1.5, 1.5, DT)); // strictly greater
        assert!(jump.update(1.6, 1.6, DT));
    }

    #[test]
    fn test_cooldown_blocks_repeat() {
        let mut jump = JumpGesture::new(1.5, 0.8);
        assert!(jump.update(3.0, 3.0, DT));

        // 0.7 s of sustained high velocity: nothing
        for _ in 0..63 {
            assert!(!jump.update(3.0, 3.0, DT));
        }
        // past 0.8 s it re-arms
        let fired = (0..18).any(|_| jump.update(3.0, 3.0, DT));
        assert!(fired);
    }

    #[test]
    fn test_cooldown_never_goes_negative() {
        let mut jump = JumpGesture::new(1.5, 0.8);
        jump.update(3.0, 3.0, DT);
        jump.update(0.0, 0.0, 5.0);
        assert_eq!(jump.state(), JumpState::Ready);
    }
}
