//! `wgpu`-backed eye targets.

use std::sync::Arc;

use tracing::debug;

use vrbridge_core::{BridgeError, BridgeResult, Eye, TextureHandle};

use crate::target::TargetAllocator;

/// Color format of the eye targets.
pub const EYE_TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Creates eye color buffers as `wgpu` textures.
///
/// The host renders into [`WgpuAllocator::texture`] and hands the handle to
/// the compositor through the pipeline.
pub struct WgpuAllocator {
    device: Arc<wgpu::Device>,
    textures: Vec<(TextureHandle, wgpu::Texture)>,
    next_id: u64,
}

impl WgpuAllocator {
    /// Wraps a device.
    #[must_use]
    pub fn new(device: Arc<wgpu::Device>) -> Self {
        Self { device, textures: Vec::with_capacity(2), next_id: 1 }
    }

    /// Texture behind a handle.
    #[must_use]
    pub fn texture(&self, handle: TextureHandle) -> Option<&wgpu::Texture> {
        self.textures.iter().find(|(h, _)| *h == handle).map(|(_, t)| t)
    }
}

impl TargetAllocator for WgpuAllocator {
    fn allocate(&mut self, eye: Eye, width: u32, height: u32) -> BridgeResult<TextureHandle> {
        let max = self.device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(BridgeError::ResourceAllocation {
                width,
                height,
                reason: format!("outside device limit 1..={max}"),
            });
        }

        let label = match eye {
            Eye::Left => "Eye Target Left",
            Eye::Right => "Eye Target Right",
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: EYE_TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let handle = TextureHandle(self.next_id);
        self.next_id += 1;
        self.textures.push((handle, texture));
        debug!("{} created {}x{}", label, width, height);
        Ok(handle)
    }

    fn release(&mut self, texture: TextureHandle) {
        if let Some(pos) = self.textures.iter().position(|(h, _)| *h == texture) {
            let (_, tex) = self.textures.swap_remove(pos);
            tex.destroy();
        }
    }
}
