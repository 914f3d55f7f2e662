//! Smoothed per-point velocity.
//!
//! Raw velocity is the finite difference of successive positions; the
//! output is an exponential blend that weights the newest sample at 60%.
//! That converges in two to three frames while hiding marker jitter.

use vrbridge_core::TrackedPointId;
use vrbridge_shared::constants::{TRACKED_POINT_COUNT, VELOCITY_SMOOTHING};
use vrbridge_shared::Vec3;

/// Velocity history of one tracked point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VelocityState {
    /// Position at the last accepted update.
    pub last_position: Vec3,
    /// Exponentially smoothed velocity (m/s).
    pub smoothed_velocity: Vec3,
    /// False until a position has been recorded, and again after tracking
    /// loss, so the next update only re-seeds `last_position`.
    seeded: bool,
}

/// Owns one [`VelocityState`] per tracked point.
#[derive(Debug, Clone)]
pub struct VelocityEstimator {
    states: [VelocityState; TRACKED_POINT_COUNT],
    smoothing: f32,
}

impl VelocityEstimator {
    /// Estimator with the default 0.6 newest-sample weight.
    #[must_use]
    pub fn new() -> Self {
        Self::with_smoothing(VELOCITY_SMOOTHING)
    }

    /// Estimator with a custom newest-sample weight in `0..=1`.
    #[must_use]
    pub fn with_smoothing(smoothing: f32) -> Self {
        Self {
            states: [VelocityState::default(); TRACKED_POINT_COUNT],
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    /// Feeds one position sample.
    ///
    /// Does nothing at all when `dt <= 0`.
    pub fn update(&mut self, id: TrackedPointId, current_position: Vec3, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let state = &mut self.states[id.index()];
        if !state.seeded {
            state.last_position = current_position;
            state.seeded = true;
            return;
        }
        let raw = (current_position - state.last_position) / dt;
        state.smoothed_velocity = state.smoothed_velocity.lerp(raw, self.smoothing);
        state.last_position = current_position;
    }

    /// Forgets the last position of a point so the next sample does not
    /// produce a spike. The smoothed velocity is kept.
    pub fn invalidate(&mut self, id: TrackedPointId) {
        self.states[id.index()].seeded = false;
    }

    /// Last smoothed velocity of a point.
    #[must_use]
    pub const fn velocity(&self, id: TrackedPointId) -> Vec3 {
        self.states[id.index()].smoothed_velocity
    }

    /// Full state of a point.
    #[must_use]
    pub const fn state(&self, id: TrackedPointId) -> &VelocityState {
        &self.states[id.index()]
    }

    /// Zeroes every state.
    pub fn reset(&mut self) {
        self.states = [VelocityState::default(); TRACKED_POINT_COUNT];
    }
}

impl Default for VelocityEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HAND: TrackedPointId = TrackedPointId::RightHand;

    #[test]
    fn test_non_positive_dt_changes_nothing() {
        let mut est = VelocityEstimator::new();
        est.update(HAND, Vec3::ZERO, 0.01);
        est.update(HAND, Vec3::new(0.0, 0.1, 0.0), 0.01);
        let before = *est.state(HAND);

        for dt in [0.0, -0.01, -1.0] {
            est.update(HAND, Vec3::new(5.0, 5.0, 5.0), dt);
            assert_eq!(*est.state(HAND), before);
        }
    }

    #[test]
    fn test_smoothing_weights_newest_sample() {
        let mut est = VelocityEstimator::new();
        est.update(HAND, Vec3::ZERO, 0.1);
        // 1 m in 0.1 s = 10 m/s raw, blended 60% from zero
        est.update(HAND, Vec3::new(1.0, 0.0, 0.0), 0.1);
        assert!((est.velocity(HAND).x - 6.0).abs() < 1e-4);
        // same raw again: 6 + 0.6 * (10 - 6) = 8.4
        est.update(HAND, Vec3::new(2.0, 0.0, 0.0), 0.1);
        assert!((est.velocity(HAND).x - 8.4).abs() < 1e-4);
    }

    #[test]
    fn test_first_sample_only_seeds() {
        let mut est = VelocityEstimator::new();
        est.update(TrackedPointId::Head, Vec3::new(0.0, 1.7, 0.0), 1.0 / 90.0);
        assert_eq!(est.velocity(TrackedPointId::Head), Vec3::ZERO);
    }

    #[test]
    fn test_invalidate_prevents_spike_on_reacquire() {
        let mut est = VelocityEstimator::new();
        est.update(HAND, Vec3::ZERO, 0.01);
        est.update(HAND, Vec3::ZERO, 0.01);
        est.invalidate(HAND);
        est.update(HAND, Vec3::new(3.0, 0.0, 0.0), 0.01);
        assert_eq!(est.velocity(HAND), Vec3::ZERO);
    }

    #[test]
    fn test_velocity_is_side_effect_free() {
        let mut est = VelocityEstimator::new();
        est.update(HAND, Vec3::ZERO, 0.1);
        est.update(HAND, Vec3::new(0.0, 1.0, 0.0), 0.1);
        let a = est.velocity(HAND);
        let b = est.velocity(HAND);
        assert_eq!(a, b);
    }
}
