//! Two-phase key pulses.
//!
//! A tap is "press now, release after a short hold". The release is a
//! scheduled event checked from the tick loop; no timer thread exists.
//! Capacity is fixed so the per-frame path never allocates.

use tracing::{debug, warn};

use vrbridge_shared::constants::PULSE_HOLD_S;
use vrbridge_shared::{LegacyButton, SinkEvent};

use crate::sink::InputSink;

/// Maximum releases that can be pending at once.
pub const MAX_PENDING_PULSES: usize = 8;

/// Slack for comparing tick-accumulated time against a deadline.
const DEADLINE_SLACK_S: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingRelease {
    button: LegacyButton,
    release_at: f64,
}

/// Schedules the release half of tap pulses.
#[derive(Debug, Clone)]
pub struct PulseScheduler {
    hold_s: f64,
    pending: [Option<PendingRelease>; MAX_PENDING_PULSES],
}

impl PulseScheduler {
    /// Creates a scheduler with the given hold time (seconds).
    #[must_use]
    pub fn new(hold_s: f32) -> Self {
        Self {
            hold_s: f64::from(hold_s.max(0.0)),
            pending: [None; MAX_PENDING_PULSES],
        }
    }

    /// Presses `button` now and schedules its release.
    ///
    /// Tapping a button whose release is still pending releases it early
    /// and presses it again with a fresh deadline, so every tap reaches the
    /// sink as its own press/release pair.
    pub fn tap<S: InputSink + ?Sized>(&mut self, button: LegacyButton, now: f64, sink: &mut S) {
        let release_at = now + self.hold_s;

        if let Some(slot) = self.pending.iter_mut().flatten().find(|p| p.button == button) {
            sink.emit(SinkEvent::Release(button));
            sink.emit(SinkEvent::Press(button));
            slot.release_at = release_at;
            debug!("Pulse {} restarted", button.as_str());
            return;
        }

        sink.emit(SinkEvent::Press(button));
        match self.pending.iter_mut().find(|p| p.is_none()) {
            Some(slot) => *slot = Some(PendingRelease { button, release_at }),
            None => {
                warn!("Pulse table full, releasing {} immediately", button.as_str());
                sink.emit(SinkEvent::Release(button));
            }
        }
    }

    /// Fires every release whose deadline has passed.
    pub fn poll<S: InputSink + ?Sized>(&mut self, now: f64, sink: &mut S) {
        for slot in &mut self.pending {
            if let Some(p) = *slot {
                if now + DEADLINE_SLACK_S >= p.release_at {
                    sink.emit(SinkEvent::Release(p.button));
                    *slot = None;
                }
            }
        }
    }

    /// Releases everything immediately (teardown).
    pub fn flush<S: InputSink + ?Sized>(&mut self, sink: &mut S) {
        for slot in &mut self.pending {
            if let Some(p) = slot.take() {
                sink.emit(SinkEvent::Release(p.button));
            }
        }
    }

    /// Releases still waiting.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.iter().flatten().count()
    }
}

impl Default for PulseScheduler {
    fn default() -> Self {
        Self::new(PULSE_HOLD_S)
    }
}
