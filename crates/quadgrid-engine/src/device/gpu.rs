use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::{pick_alpha_mode, pick_format, SurfaceRecovery};
use super::GpuInit;

/// Device, queue and the configured surface of one window.
///
/// The surface borrows the window for `'w`; the runtime keeps both in one
/// self-referential entry.
pub struct Gpu<'w> {
    surface: wgpu::Surface<'w>,
    adapter_info: wgpu::AdapterInfo,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    /// Drawable size in physical pixels. May be zero while minimized.
    size: PhysicalSize<u32>,
}

/// One acquired swapchain image plus the encoder recording into it.
///
/// Hand it back to [`Gpu::present`] promptly; the next image cannot be
/// acquired while this one is held.
pub struct SurfaceFrame {
    texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Each backend set from [`GpuInit`] is tried in order; the error of the
    /// last attempt is returned when none succeeds.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let mut last_err = None;
        for backends in init.backend_attempts() {
            match Self::with_backends(window, &init, backends, size).await {
                Ok(gpu) => return Ok(gpu),
                Err(err) => {
                    log::warn!("GPU bring-up on {backends:?} failed: {err:#}");
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("no backends to try")))
    }

    async fn with_backends(
        window: &'w Window,
        init: &GpuInit,
        backends: wgpu::Backends,
        size: PhysicalSize<u32>,
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let adapter_info = adapter.get_info();
        let features = init.resolve_features(adapter.features()).map_err(|missing| {
            anyhow::anyhow!(
                "adapter '{}' lacks required features {missing:?}",
                adapter_info.name
            )
        })?;

        let required_limits = init.required_limits.clone().using_resolution(adapter.limits());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("quadgrid device"),
                required_features: features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = pick_format(&caps.formats, init.prefer_srgb)
            .context("surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: init.present_mode,
            alpha_mode: pick_alpha_mode(&caps.alpha_modes),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        log::info!(
            "using adapter '{}' ({:?}, {:?}), surface format {format:?}",
            adapter_info.name,
            adapter_info.backend,
            adapter_info.device_type
        );

        Ok(Self {
            surface,
            adapter_info,
            device,
            queue,
            config,
            size,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Records the new drawable size and reconfigures the surface.
    ///
    /// A zero-sized window leaves the surface as is; wgpu rejects 0x0
    /// configurations.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquires the next swapchain image.
    pub fn acquire(&self) -> std::result::Result<SurfaceFrame, SurfaceError> {
        let texture = self.surface.get_current_texture()?;
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quadgrid frame encoder"),
            });

        Ok(SurfaceFrame { texture, view, encoder })
    }

    /// Submits everything recorded into `frame` and presents its image.
    pub fn present(&self, frame: SurfaceFrame) {
        let SurfaceFrame { texture, view, encoder } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        texture.present();
    }

    /// Decides how to continue after [`acquire`](Self::acquire) failed,
    /// reconfiguring the surface when that is the remedy.
    pub fn recover(&mut self, err: &SurfaceError) -> SurfaceRecovery {
        let recovery = SurfaceRecovery::for_error(err);
        if recovery == SurfaceRecovery::Reconfigure && self.size.width > 0 && self.size.height > 0 {
            self.surface.configure(&self.device, &self.config);
        }
        recovery
    }
}
