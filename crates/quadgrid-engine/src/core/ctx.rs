use winit::window::Window;

use crate::device::{Gpu, SurfaceRecovery};
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

/// Result of [`FrameCtx::render`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// The frame was submitted and presented.
    Presented,
    /// Nothing was submitted: zero-sized window or a recoverable surface error.
    Skipped,
    /// The surface cannot be used any more.
    Fatal,
}

/// Everything an [`App`](super::App) gets for one redraw.
///
/// `'a` spans the callback; `'w` is the window borrow held by the surface.
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    /// Acquires the next image, clears it to `clear`, lets `draw` record into
    /// the same encoder and presents the result.
    pub fn render<F>(&mut self, clear: wgpu::Color, draw: F) -> FrameOutcome
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            return FrameOutcome::Skipped;
        }

        let mut frame = match self.gpu.acquire() {
            Ok(frame) => frame,
            Err(err) => {
                log::debug!("surface error: {err}");
                return match self.gpu.recover(&err) {
                    SurfaceRecovery::Fatal => FrameOutcome::Fatal,
                    SurfaceRecovery::Reconfigure | SurfaceRecovery::Skip => FrameOutcome::Skipped,
                };
            }
        };

        clear_pass(&mut frame.encoder, &frame.view, clear);

        {
            let ctx = RenderCtx::new(
                self.gpu.device(),
                self.gpu.queue(),
                self.gpu.surface_format(),
                (size.width, size.height),
            );
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            draw(&ctx, &mut target);
        }

        self.window.pre_present_notify();
        self.gpu.present(frame);
        FrameOutcome::Presented
    }
}

fn clear_pass(encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, color: wgpu::Color) {
    let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("quadgrid clear"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });
}
