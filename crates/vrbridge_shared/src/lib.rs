//! # VRBRIDGE Shared
//!
//! Common types used by every VRBRIDGE crate.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - `wgpu`
//! - tracking runtime bindings
//! - Any GPU or window-related crate
//!
//! If you need graphics types, put them in `vrbridge_rendering`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod events;
pub mod math;

pub use events::{AnalogAxis, LegacyButton, SinkEvent};
pub use math::{Mat4, Quaternion, Transform, Vec2, Vec3};
