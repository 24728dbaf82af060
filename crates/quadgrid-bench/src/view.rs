use anyhow::Result;

use quadgrid_engine::core::{App, AppControl, FrameCtx};
use quadgrid_engine::device::GpuInit;
use quadgrid_engine::grid::GridConfig;
use quadgrid_engine::render::GridRenderer;
use quadgrid_engine::time::GpuTimer;
use quadgrid_engine::window::{Runtime, RuntimeConfig};

use crate::cli::ViewArgs;
use crate::{frame_timer, unpresented, CLEAR_COLOR};

const TITLE: &str = "quadgrid view";
const NS_PER_MS: f64 = 1_000_000.0;

/// Viewer: draws the grid every redraw and prints the GPU time of the draw.
pub struct ViewApp {
    grid: GridConfig,
    renderer: GridRenderer,
    timer: Option<GpuTimer>,
}

impl ViewApp {
    pub fn new(args: &ViewArgs) -> Result<Self> {
        Ok(Self {
            grid: args.grid.grid()?,
            renderer: GridRenderer::default(),
            timer: None,
        })
    }
}

/// One line of per-frame output.
fn frame_line(elapsed_ns: u64) -> String {
    format!("ms = {:.6}", elapsed_ns as f64 / NS_PER_MS)
}

impl App for ViewApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let timer = self.timer.get_or_insert_with(|| frame_timer(&*ctx));
        let renderer = &mut self.renderer;
        let grid = self.grid;

        let outcome = ctx.render(CLEAR_COLOR, |rctx, target| {
            renderer.render(rctx, target, &grid, Some(&mut *timer));
        });

        if let Some(control) = unpresented(outcome, "the viewer") {
            return control;
        }

        match timer.read(ctx.gpu.device()) {
            Ok(ns) => {
                println!("{}", frame_line(ns));
                AppControl::Continue
            }
            Err(err) => {
                log::error!("{err}");
                AppControl::Exit
            }
        }
    }
}

/// Opens the viewer window and renders until it is closed.
pub fn run(args: &ViewArgs) -> Result<()> {
    let app = ViewApp::new(args)?;
    let gpu_init = GpuInit {
        backends: wgpu::Backends::GL,
        fallback_backends: Some(wgpu::Backends::PRIMARY),
        ..GpuInit::default()
    };
    let config = RuntimeConfig::new(TITLE, args.grid.width, args.grid.height);

    Runtime::run(config, gpu_init, app)?;
    Ok(())
}
