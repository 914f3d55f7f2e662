//! # VRBRIDGE Tracking
//!
//! Everything between the runtime's raw device matrices and the discrete
//! actions handed to the input sink.
//!
//! ```text
//! PoseSource ──> VelocityEstimator ──> GestureClassifier ──> InputSink
//!     │                                      ▲
//!     └──────────── head / hand poses ───────┘
//! ```
//!
//! Refresh order inside one logic tick is fixed: poses, then velocities,
//! then gestures.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod gesture;
pub mod pose;
pub mod velocity;

pub use gesture::{
    GestureButtons, GestureClassifier, GestureConfig, GestureEvent, GestureInput, GestureOutput,
    ShortcutSlot,
};
pub use pose::{Pose, PoseFrame, PoseSource};
pub use velocity::{VelocityEstimator, VelocityState};
