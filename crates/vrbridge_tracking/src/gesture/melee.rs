//! Fast right-hand swing → attack press/release, with hysteresis.

/// Swing phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingPhase {
    /// Not swinging.
    Idle,
    /// Attack button held.
    Attacking,
}

/// Edge produced by the swing detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingEdge {
    /// Enter `Attacking`.
    Press,
    /// Leave `Attacking`.
    Release,
}

/// Enters `Attacking` above the attack speed (rate-limited by a minimum
/// interval) and leaves only below the lower release speed.
#[derive(Debug, Clone)]
pub struct MeleeSwing {
    phase: SwingPhase,
    attack_speed: f32,
    release_speed: f32,
    min_interval_s: f64,
    last_swing_at: Option<f64>,
}

impl MeleeSwing {
    /// Creates an idle detector.
    #[must_use]
    pub fn new(attack_speed: f32, release_speed: f32, min_interval_s: f32) -> Self {
        Self {
            phase: SwingPhase::Idle,
            attack_speed,
            release_speed,
            min_interval_s: f64::from(min_interval_s),
            last_swing_at: None,
        }
    }

    /// Advances one tick with the current hand speed.
    pub fn update(&mut self, speed: f32, now: f64) -> Option<SwingEdge> {
        match self.phase {
            SwingPhase::Idle => {
                let interval_ok = self
                    .last_swing_at
                    .map_or(true, |t| now - t >= self.min_interval_s);
                if speed > self.attack_speed && interval_ok {
                    self.phase = SwingPhase::Attacking;
                    self.last_swing_at = Some(now);
                    return Some(SwingEdge::Press);
                }
                None
            }
            SwingPhase::Attacking => {
                if speed < self.release_speed {
                    self.phase = SwingPhase::Idle;
                    return Some(SwingEdge::Release);
                }
                None
            }
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> SwingPhase {
        self.phase
    }

    /// Returns to `Idle` and clears the interval timer. Emits nothing; the
    /// caller releases the button if it was held.
    pub fn reset(&mut self) {
        self.phase = SwingPhase::Idle;
        self.last_swing_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release_sequence() {
        let mut swing = MeleeSwing::new(3.5, 1.2, 0.2);
        let speeds = [0.0, 4.0, 4.0, 1.0, 0.5];
        let edges: Vec<_> = speeds
            .iter()
            .enumerate()
            .map(|(i, &s)| swing.update(s, i as f64 / 90.0))
            .collect();
        assert_eq!(edges, vec![None, Some(SwingEdge::Press), None, Some(SwingEdge::Release), None]);
    }

    #[test]
    fn test_hysteresis_band_holds_attack() {
        let mut swing = MeleeSwing::new(3.5, 1.2, 0.2);
        assert_eq!(swing.update(4.0, 0.0), Some(SwingEdge::Press));
        // oscillating between the thresholds does nothing
        for (i, s) in [3.0, 3.6, 2.0, 3.9, 1.3].iter().enumerate() {
            assert_eq!(swing.update(*s, 0.01 * (i + 1) as f64), None);
        }
        assert_eq!(swing.phase(), SwingPhase::Attacking);
    }

    #[test]
    fn test_min_interval_between_swings() {
        let mut swing = MeleeSwing::new(3.5, 1.2, 0.2);
        assert_eq!(swing.update(4.0, 0.0), Some(SwingEdge::Press));
        assert_eq!(swing.update(0.0, 0.05), Some(SwingEdge::Release));
        assert_eq!(swing.update(4.0, 0.1), None);
        assert_eq!(swing.update(4.0, 0.25), Some(SwingEdge::Press));
    }
}
