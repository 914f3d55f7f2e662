//! # VRBRIDGE Rendering
//!
//! The late-tick half of a display frame.
//!
//! ## Frame Flow
//!
//! ```text
//!  head (world) ──> EyeRig ──> eye views
//!  runtime ───────> projections (HmdMatrix44 -> Mat4)
//!  runtime ───────> recommended size ──> TargetAllocator ──> EyeRenderTarget x2
//!                                                     │
//!  Compositor <── submit(eye, color buffer, V-flip) <─┘
//! ```
//!
//! ## Feature Flags
//!
//! - `gpu`: [`gpu::WgpuAllocator`] creates real `wgpu` textures for the eye
//!   targets. Without it, [`HeadlessAllocator`] hands out opaque ids.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod eye;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod pipeline;
pub mod projection;
pub mod target;

pub use config::RenderConfig;
pub use eye::EyeRig;
pub use pipeline::{EyeView, RenderStats, StereoFrame, StereoRenderPipeline};
pub use projection::{fallback_projection, to_engine, to_runtime};
pub use target::{EyeRenderTarget, HeadlessAllocator, TargetAllocator};
