//! Eye render targets.
//!
//! The pipeline only sees opaque [`TextureHandle`]s. Who backs them is the
//! allocator's business: [`HeadlessAllocator`] for tests and the simulator,
//! `gpu::WgpuAllocator` for real textures.

use vrbridge_core::{BridgeError, BridgeResult, Eye, TextureHandle};

/// One eye's color buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeRenderTarget {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Texture handed to the compositor.
    pub color_buffer: TextureHandle,
}

/// Creates and destroys eye color buffers.
pub trait TargetAllocator {
    /// Creates a color buffer.
    ///
    /// # Errors
    ///
    /// [`BridgeError::ResourceAllocation`] when the backend refuses.
    fn allocate(&mut self, eye: Eye, width: u32, height: u32) -> BridgeResult<TextureHandle>;

    /// Destroys a color buffer. Unknown handles are ignored.
    fn release(&mut self, texture: TextureHandle);
}

/// Allocator without a GPU. Hands out sequential ids and enforces a
/// maximum texture dimension like a real device would.
#[derive(Debug, Clone)]
pub struct HeadlessAllocator {
    next_id: u64,
    live: Vec<TextureHandle>,
    max_dimension: u32,
    refuse: bool,
    allocations: u64,
}

impl HeadlessAllocator {
    /// Default dimension limit, matching common desktop GPUs.
    pub const DEFAULT_MAX_DIMENSION: u32 = 8192;

    /// Creates an allocator with the default limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_dimension(Self::DEFAULT_MAX_DIMENSION)
    }

    /// Creates an allocator with a custom dimension limit.
    #[must_use]
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self { next_id: 1, live: Vec::with_capacity(2), max_dimension, refuse: false, allocations: 0 }
    }

    /// Makes every allocation fail (device lost).
    pub fn set_refuse(&mut self, refuse: bool) {
        self.refuse = refuse;
    }

    /// Buffers currently alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Successful allocations so far.
    #[must_use]
    pub const fn allocations(&self) -> u64 {
        self.allocations
    }
}

impl Default for HeadlessAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetAllocator for HeadlessAllocator {
    fn allocate(&mut self, _eye: Eye, width: u32, height: u32) -> BridgeResult<TextureHandle> {
        let reason = if self.refuse {
            Some("device lost".to_string())
        } else if width == 0 || height == 0 {
            Some("zero-sized target".to_string())
        } else if width > self.max_dimension || height > self.max_dimension {
            Some(format!("exceeds max dimension {}", self.max_dimension))
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(BridgeError::ResourceAllocation { width, height, reason });
        }

        let handle = TextureHandle(self.next_id);
        self.next_id += 1;
        self.allocations += 1;
        self.live.push(handle);
        Ok(handle)
    }

    fn release(&mut self, texture: TextureHandle) {
        self.live.retain(|t| *t != texture);
    }
}
