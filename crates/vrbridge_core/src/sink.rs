//! Input sinks.
//!
//! The legacy input-emulation layer lives outside the bridge. It receives
//! discrete [`SinkEvent`]s either directly or over a channel when it runs
//! on another thread.

use crossbeam_channel::{Sender, TrySendError};
use tracing::warn;

use vrbridge_shared::SinkEvent;

/// Consumer of discrete input events.
pub trait InputSink {
    /// Delivers one event. Must not block.
    fn emit(&mut self, event: SinkEvent);
}

/// Collects events in order. Used by tests and the simulator.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far.
    #[must_use]
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Removes and returns everything received so far.
    pub fn take(&mut self) -> Vec<SinkEvent> {
        std::mem::take(&mut self.events)
    }
}

impl InputSink for RecordingSink {
    fn emit(&mut self, event: SinkEvent) {
        self.events.push(event);
    }
}

/// Forwards events over a bounded channel. Drops (and counts) on overflow.
#[derive(Debug)]
pub struct ChannelSink {
    sender: Sender<SinkEvent>,
    dropped: u64,
}

impl ChannelSink {
    /// Wraps a sender.
    #[must_use]
    pub fn new(sender: Sender<SinkEvent>) -> Self {
        Self { sender, dropped: 0 }
    }

    /// Events lost because the channel was full or closed.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl InputSink for ChannelSink {
    fn emit(&mut self, event: SinkEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(ev)) => {
                self.dropped += 1;
                warn!("Input sink full, dropping {:?}", ev);
            }
            Err(TrySendError::Disconnected(ev)) => {
                self.dropped += 1;
                warn!("Input sink disconnected, dropping {:?}", ev);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use vrbridge_shared::LegacyButton;

    #[test]
    fn test_channel_sink_forwards_in_order() {
        let (tx, rx) = bounded(4);
        let mut sink = ChannelSink::new(tx);
        sink.emit(SinkEvent::Press(LegacyButton::Jump));
        sink.emit(SinkEvent::Release(LegacyButton::Jump));

        assert_eq!(rx.try_recv(), Ok(SinkEvent::Press(LegacyButton::Jump)));
        assert_eq!(rx.try_recv(), Ok(SinkEvent::Release(LegacyButton::Jump)));
        assert_eq!(sink.dropped(), 0);
    }

    #[test]
    fn test_channel_sink_counts_overflow() {
        let (tx, _rx) = bounded(1);
        let mut sink = ChannelSink::new(tx);
        sink.emit(SinkEvent::Press(LegacyButton::Map));
        sink.emit(SinkEvent::Release(LegacyButton::Map));
        assert_eq!(sink.dropped(), 1);
    }

    #[test]
    fn test_recording_sink_take() {
        let mut sink = RecordingSink::new();
        sink.emit(SinkEvent::Press(LegacyButton::Run));
        assert_eq!(sink.take().len(), 1);
        assert!(sink.events().is_empty());
    }
}
