//! Simulated frame clock.
//!
//! The bridge never reads wall time on its own; the host hands it a delta
//! per display frame and every timer in the core runs on this clock.

/// Monotonic time and per-tick delta.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    /// Seconds since start.
    time: f64,
    /// Delta of the current tick. May be zero or negative when the host
    /// clock is paused or stepped backwards.
    dt: f32,
    /// Ticks since start.
    frame: u64,
}

impl FrameClock {
    /// Clock at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { time: 0.0, dt: 0.0, frame: 0 }
    }

    /// Advances one tick. Time never moves backwards.
    pub fn advance(&mut self, dt: f32) {
        self.dt = dt;
        if dt > 0.0 {
            self.time += f64::from(dt);
        }
        self.frame += 1;
    }

    /// Seconds since start.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Delta of the current tick, as supplied.
    #[must_use]
    pub const fn dt(&self) -> f32 {
        self.dt
    }

    /// Ticks since start.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paused_clock_keeps_time() {
        let mut clock = FrameClock::new();
        clock.advance(0.5);
        clock.advance(0.0);
        clock.advance(-1.0);
        assert_eq!(clock.time(), 0.5);
        assert_eq!(clock.dt(), -1.0);
        assert_eq!(clock.frame(), 3);
    }
}
