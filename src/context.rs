//! # Render Context
//!
//! The GPU handles and surface size the engine works against. A context is
//! created once by the host, owned by one [`BuildViewer`](crate::BuildViewer)
//! and passed explicitly to every operation that allocates or frees GPU memory.
//!
//! Without a device the engine runs headless: every resource is still tracked
//! and released with identical bookkeeping, but no buffers are allocated. Tests
//! and server-side previews use this mode.

#[derive(Debug)]
pub struct RenderContext {
    pub device: Option<wgpu::Device>,
    pub queue: Option<wgpu::Queue>,
    pub width: u32,
    pub height: u32,
}

impl RenderContext {
    /// Context without GPU access
    pub fn headless(width: u32, height: u32) -> Self {
        Self {
            device: None,
            queue: None,
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn with_gpu(device: wgpu::Device, queue: wgpu::Queue, width: u32, height: u32) -> Self {
        Self {
            device: Some(device),
            queue: Some(queue),
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn has_gpu(&self) -> bool {
        self.device.is_some()
    }

    pub fn device(&self) -> Option<&wgpu::Device> {
        self.device.as_ref()
    }

    pub fn queue(&self) -> Option<&wgpu::Queue> {
        self.queue.as_ref()
    }

    /// Zero sizes are clamped to one pixel
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }
}
