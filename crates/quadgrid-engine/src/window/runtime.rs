use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::FrameClock;

/// Title and initial size of the window.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Requested drawable size in physical pixels.
    pub initial_size: PhysicalSize<u32>,
}

impl RuntimeConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            initial_size: PhysicalSize::new(width, height),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new("quadgrid", 1024, 768)
    }
}

/// Requests an app makes during a frame.
///
/// Applied once `on_frame` has returned. Ending the loop is the app's return
/// value, [`AppControl::Exit`].
#[derive(Default)]
pub struct RuntimeCtx {
    title: Option<String>,
}

impl RuntimeCtx {
    /// Replaces the window title. The last call in a frame wins.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }
}

/// Single-window event loop.
pub struct Runtime;

impl Runtime {
    /// Opens the window and redraws continuously, calling `app` once per frame
    /// until it asks to exit, Escape is pressed or the window is closed.
    ///
    /// Returns the app so the caller can read its results. The GPU context and
    /// the window are gone by then.
    pub fn run<A: App>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<A> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut driver = Driver {
            config,
            gpu_init,
            app,
            surface: None,
            error: None,
            closing: false,
        };

        event_loop
            .run_app(&mut driver)
            .context("winit event loop terminated with error")?;

        let Driver { app, surface, error, .. } = driver;
        drop(surface);

        match error {
            Some(err) => Err(err),
            None => Ok(app),
        }
    }
}

/// The window and the GPU context whose surface borrows it.
#[self_referencing]
struct WindowSurface {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowSurface {
    fn open(event_loop: &ActiveEventLoop, config: &RuntimeConfig, init: GpuInit) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        WindowSurfaceTryBuilder {
            clock: FrameClock::new(),
            window,
            gpu_builder: |window| {
                pollster::block_on(Gpu::new(window, init))
                    .context("GPU initialization failed for window")
            },
        }
        .try_build()
    }

    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.with_gpu_mut(|gpu| gpu.resize(size));
        self.request_redraw();
    }
}

struct Driver<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    surface: Option<WindowSurface>,
    /// First fatal error; returned from `Runtime::run` once the loop ends.
    error: Option<anyhow::Error>,
    closing: bool,
}

impl<A: App> Driver<A> {
    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.closing = true;
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(surface) = self.surface.as_mut() else { return };

        let app = &mut self.app;
        let mut requests = RuntimeCtx::default();

        let control = surface.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: fields.window,
                gpu: fields.gpu,
                time: fields.clock.tick(),
                runtime: &mut requests,
            };
            app.on_frame(&mut ctx)
        });

        if let Some(title) = requests.title.take() {
            surface.with_window(|w| w.set_title(&title));
        }

        if control == AppControl::Exit {
            self.close(event_loop);
        }
    }
}

fn is_escape(key: &KeyEvent) -> bool {
    key.state == ElementState::Pressed && key.physical_key == PhysicalKey::Code(KeyCode::Escape)
}

impl<A: App> ApplicationHandler for Driver<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() || self.closing {
            return;
        }

        match WindowSurface::open(event_loop, &self.config, self.gpu_init.clone()) {
            Ok(surface) => {
                surface.request_redraw();
                self.surface = Some(surface);
            }
            Err(err) => {
                self.error = Some(err);
                self.close(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.closing {
            event_loop.exit();
            return;
        }

        // One frame per loop iteration.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(surface) = self.surface.as_ref() {
            surface.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.closing {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::debug!("window close requested");
                self.close(event_loop);
            }
            WindowEvent::KeyboardInput { event: key, .. } if is_escape(&key) => {
                log::debug!("escape pressed; closing");
                self.close(event_loop);
            }
            WindowEvent::Resized(size) => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.resize(size);
                }
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(surface) = self.surface.as_mut() {
                    let size = surface.with_window(|w| w.inner_size());
                    surface.resize(size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_requests_keep_last_title() {
        let mut ctx = RuntimeCtx::default();
        ctx.set_title("a");
        ctx.set_title("b");
        assert_eq!(ctx.title.as_deref(), Some("b"));
    }

    #[test]
    fn default_config_matches_cli_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.initial_size, PhysicalSize::new(1024, 768));
    }
}
