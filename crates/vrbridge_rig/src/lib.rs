//! # VRBRIDGE Rig
//!
//! Keeps the tracking origin glued to whatever camera the host game is
//! currently rendering from.
//!
//! ```text
//!  CameraSignal ─┐
//!  head Pose ────┼──> CameraRigSynchronizer ──> RigOutput
//!  sticks ───────┘         │
//!                          └── Unanchored / Anchored / MenuMode
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod anchor;
pub mod config;
pub mod synchronizer;

pub use anchor::{CameraAnchor, CameraHandle, CameraSignal};
pub use config::RigConfig;
pub use synchronizer::{CameraRigSynchronizer, RigOutput, RigState};
