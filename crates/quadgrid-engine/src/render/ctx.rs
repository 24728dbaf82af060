/// Device handles and the color target description a renderer draws against.
///
/// Built per frame by the window loop, or by hand for offscreen rendering.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    /// Format of the color attachment; pipelines are built for it.
    pub format: wgpu::TextureFormat,
    /// `(width, height)` of the color attachment in pixels.
    pub size: (u32, u32),
}

impl<'a> RenderCtx<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        format: wgpu::TextureFormat,
        size: (u32, u32),
    ) -> Self {
        Self { device, queue, format, size }
    }
}

/// Where a renderer records: the frame's encoder and its color view.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, view: &'a wgpu::TextureView) -> Self {
        Self { encoder, view }
    }
}
