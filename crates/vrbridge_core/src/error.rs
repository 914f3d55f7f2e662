//! # Bridge Error Types
//!
//! All errors that can occur at a component seam.
//!
//! Only allocation and configuration failures are returned to the caller of
//! a tick. The rest are recovered where they happen: pose queries become
//! invalid poses, projections keep their previous value, unresolved actions
//! read neutral and failed submissions drop the frame.

use thiserror::Error;

use crate::runtime::Eye;

/// Errors that can occur in the bridge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// A pose, projection or size query could not be answered.
    #[error("tracking unavailable: {0}")]
    TrackingUnavailable(&'static str),

    /// An eye render target could not be created.
    #[error("render target allocation failed at {width}x{height}: {reason}")]
    ResourceAllocation {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
        /// Backend message.
        reason: String,
    },

    /// A named input action is not known to the action source.
    #[error("input action not resolvable: {0}")]
    ActionResolution(String),

    /// The compositor rejected an eye image.
    #[error("compositor rejected {eye:?} eye: {reason}")]
    CompositorSubmit {
        /// Which eye was rejected.
        eye: Eye,
        /// Compositor message.
        reason: String,
    },

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("cannot read configuration {path}: {reason}")]
    ConfigIo {
        /// File path.
        path: String,
        /// OS message.
        reason: String,
    },
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
