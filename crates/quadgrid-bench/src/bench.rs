use anyhow::Result;

use quadgrid_engine::core::{App, AppControl, FrameCtx};
use quadgrid_engine::device::GpuInit;
use quadgrid_engine::grid::GridConfig;
use quadgrid_engine::render::GridRenderer;
use quadgrid_engine::time::{BenchReport, FrameStats, GpuTimer};
use quadgrid_engine::window::{Runtime, RuntimeConfig};

use crate::cli::BenchArgs;
use crate::{frame_timer, unpresented, CLEAR_COLOR};

const TITLE: &str = "quadgrid bench";

/// Counts completed frames against a fixed target.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameBudget {
    target: u32,
    completed: u32,
}

impl FrameBudget {
    pub fn new(target: u32) -> Self {
        Self { target, completed: 0 }
    }

    /// Marks one frame done and returns the running count.
    pub fn advance(&mut self) -> u32 {
        self.completed = self.completed.saturating_add(1);
        self.completed
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn is_exhausted(&self) -> bool {
        self.completed >= self.target
    }
}

/// Timed benchmark: one instanced draw per frame, GPU time of each draw
/// accumulated until the budget runs out or the window closes.
pub struct BenchApp {
    grid: GridConfig,
    budget: FrameBudget,
    renderer: GridRenderer,
    timer: Option<GpuTimer>,
    stats: FrameStats,
}

impl BenchApp {
    pub fn new(args: &BenchArgs) -> Result<Self> {
        Ok(Self {
            grid: args.grid.grid()?,
            budget: FrameBudget::new(args.frames),
            renderer: GridRenderer::new(args.raster()),
            timer: None,
            stats: FrameStats::new(),
        })
    }

    pub fn report(&self) -> BenchReport {
        self.stats.report(&self.grid, self.budget.target())
    }
}

/// Records one measured frame and decides whether the run continues.
fn complete_frame(stats: &mut FrameStats, budget: &mut FrameBudget, elapsed_ns: u64) -> AppControl {
    stats.record(elapsed_ns);
    budget.advance();
    if budget.is_exhausted() {
        AppControl::Exit
    } else {
        AppControl::Continue
    }
}

fn frame_title(frame: u32) -> String {
    format!("{TITLE} - Frame {frame}")
}

impl App for BenchApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.budget.is_exhausted() {
            return AppControl::Exit;
        }

        let timer = self.timer.get_or_insert_with(|| frame_timer(&*ctx));
        let renderer = &mut self.renderer;
        let grid = self.grid;

        let outcome = ctx.render(CLEAR_COLOR, |rctx, target| {
            renderer.render(rctx, target, &grid, Some(&mut *timer));
        });

        if let Some(control) = unpresented(outcome, "the benchmark") {
            return control;
        }

        let elapsed_ns = match timer.read(ctx.gpu.device()) {
            Ok(ns) => ns,
            Err(err) => {
                log::error!("{err}");
                return AppControl::Exit;
            }
        };
        log::debug!(
            "frame {}: {elapsed_ns} ns on the GPU, {:?} since the previous frame",
            ctx.time.index,
            ctx.time.since_last
        );

        let control = complete_frame(&mut self.stats, &mut self.budget, elapsed_ns);
        ctx.runtime.set_title(frame_title(self.budget.completed()));
        control
    }
}

/// Runs the benchmark window to completion and returns its report.
pub fn run(args: &BenchArgs) -> Result<BenchReport> {
    let app = BenchApp::new(args)?;
    let gpu_init = GpuInit {
        required_features: args.raster().required_features(),
        ..GpuInit::default()
    };
    let config = RuntimeConfig::new(TITLE, args.grid.width, args.grid.height);

    let app = Runtime::run(config, gpu_init, app)?;
    Ok(app.report())
}
