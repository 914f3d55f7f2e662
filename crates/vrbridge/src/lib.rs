//! # VRBRIDGE
//!
//! Head-mounted display bridge for a flat-screen game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          BridgeContext                              │
//! │                                                                     │
//! │  logic tick                                                         │
//! │  ┌────────────┐   ┌────────────┐   ┌────────────┐   ┌────────────┐  │
//! │  │ PoseSource │──>│ Velocity   │──>│ Gesture    │──>│ InputSink  │  │
//! │  │            │   │ Estimator  │   │ Classifier │   │ (pulses)   │  │
//! │  └─────┬──────┘   └────────────┘   └────────────┘   └─────▲──────┘  │
//! │        │                                                  │         │
//! │        └────────────────────> CameraRig ──── locomotion ──┘         │
//! │                                   │                                 │
//! │  late tick                        │ origin                          │
//! │  ┌────────────┐   ┌───────────────▼──────────┐   ┌────────────┐     │
//! │  │ head pose  │──>│ StereoRenderPipeline     │──>│ Compositor │     │
//! │  └────────────┘   └──────────────────────────┘   └────────────┘     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let config = BridgeConfig::load("vrbridge.toml")?;
//! let mut ctx = BridgeContext::new(&config, runtime, sink, HeadlessAllocator::new())?;
//! loop {
//!     ctx.run_frame(dt, &camera_signal);
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod context;
pub mod frame_loop;
pub mod sim;

pub use config::BridgeConfig;
pub use context::{BridgeContext, LogicReport};
pub use frame_loop::{FrameStats, FrameStatsAccumulator};
pub use sim::{ScriptedScenario, SCENARIO_LENGTH_S};

// Re-export sub-crates for convenience
pub use vrbridge_core as core;
pub use vrbridge_rendering as rendering;
pub use vrbridge_rig as rig;
pub use vrbridge_shared as shared;
pub use vrbridge_tracking as tracking;
