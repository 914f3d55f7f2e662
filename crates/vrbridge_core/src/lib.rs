//! # VRBRIDGE Core
//!
//! The seams between the bridge and the outside world.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   poses, projections,   ┌──────────────────────┐
//! │ TrackingRuntime  │──── recommended size ──>│                      │
//! ├──────────────────┤                         │  tracking / rig /    │
//! │ ActionSource     │──── ActionTable ───────>│  rendering crates    │
//! ├──────────────────┤                         │                      │
//! │ Compositor       │<─── eye textures ───────│                      │
//! ├──────────────────┤                         │                      │
//! │ InputSink        │<─── SinkEvent pulses ───│                      │
//! └──────────────────┘                         └──────────────────────┘
//! ```
//!
//! Every trait here is implemented by the host integration; `MockRuntime`
//! implements the first three for tests and the simulator.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod actions;
pub mod clock;
pub mod error;
pub mod input;
pub mod mock;
pub mod pulse;
pub mod runtime;
pub mod sink;

pub use actions::{ActionBindings, ActionHandle, ActionId, ActionKey, ActionKind, ActionSource, ActionTable};
pub use clock::FrameClock;
pub use error::{BridgeError, BridgeResult};
pub use input::{ControllerInput, Hand};
pub use mock::MockRuntime;
pub use pulse::PulseScheduler;
pub use runtime::{
    Compositor, Eye, HmdMatrix44, RawPose, TextureBounds, TextureHandle, TrackedPointId,
    TrackingRuntime,
};
pub use sink::{ChannelSink, InputSink, RecordingSink};
