//! Command-line flags shared by the quadgrid programs.

use std::fmt;

use anyhow::{Context, Result};
use clap::{Args, Parser, ValueEnum};

use quadgrid_engine::grid::GridConfig;
use quadgrid_engine::render::{PolygonMode, RasterState};

pub const DEFAULT_WIDTH: u32 = 1024;
pub const DEFAULT_HEIGHT: u32 = 768;
pub const DEFAULT_CELLS_X: u32 = 16;
pub const DEFAULT_CELLS_Y: u32 = 12;
pub const DEFAULT_LAYERS: u32 = 4;
pub const DEFAULT_FRAMES: u32 = 100;

/// Value parser for integer flags that must be greater than zero.
///
/// A lone `-` stands for the flag's default.
fn positive_or(default: u32) -> impl Fn(&str) -> Result<u32, String> + Clone + Send + Sync + 'static {
    move |raw: &str| {
        if raw == "-" {
            return Ok(default);
        }
        match raw.trim().parse::<i64>() {
            Ok(n) if n > 0 => u32::try_from(n).map_err(|_| format!("{n} is too large")),
            _ => Err("must be a number greater than zero".to_owned()),
        }
    }
}

/// Window and grid flags.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct GridArgs {
    /// The window width in pixels
    #[arg(short = 'w', long, value_name = "WIDTH",
          default_value_t = DEFAULT_WIDTH, value_parser = positive_or(DEFAULT_WIDTH))]
    pub width: u32,

    /// The window height in pixels
    #[arg(short = 'g', long, value_name = "HEIGHT",
          default_value_t = DEFAULT_HEIGHT, value_parser = positive_or(DEFAULT_HEIGHT))]
    pub height: u32,

    /// The number of grid cells in horizontal
    #[arg(short = 'x', long = "cells-in-x", visible_alias = "cell-in-x", value_name = "X",
          default_value_t = DEFAULT_CELLS_X, value_parser = positive_or(DEFAULT_CELLS_X))]
    pub cells_x: u32,

    /// The number of grid cells in vertical
    #[arg(short = 'y', long = "cells-in-y", visible_alias = "cell-in-y", value_name = "Y",
          default_value_t = DEFAULT_CELLS_Y, value_parser = positive_or(DEFAULT_CELLS_Y))]
    pub cells_y: u32,

    /// The number of layers
    #[arg(short = 'z', long, value_name = "Z",
          default_value_t = DEFAULT_LAYERS, value_parser = positive_or(DEFAULT_LAYERS))]
    pub layers: u32,
}

impl GridArgs {
    pub fn grid(&self) -> Result<GridConfig> {
        GridConfig::new(self.cells_x, self.cells_y, self.layers).with_context(|| {
            format!(
                "a {} x {} x {} grid exceeds the maximum of {} instances",
                self.cells_x,
                self.cells_y,
                self.layers,
                GridConfig::MAX_INSTANCES
            )
        })
    }
}

/// Event-driven viewer: renders until the window is closed.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "quadgrid-view", version)]
#[command(about = "Draws an instanced quad grid and prints the GPU time of every frame")]
pub struct ViewArgs {
    #[command(flatten)]
    pub grid: GridArgs,
}

impl ViewArgs {
    /// The parameter block printed before the window opens.
    pub fn parameters(&self) -> Parameters<'_> {
        Parameters { grid: &self.grid, bench: None }
    }
}

/// Timed benchmark: renders a fixed number of frames and reports statistics.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "quadgrid-bench", version)]
#[command(about = "Times instanced quad grid draws and reports triangles per second")]
pub struct BenchArgs {
    #[command(flatten)]
    pub grid: GridArgs,

    /// Enable depth test
    #[arg(long)]
    pub enable_depth_test: bool,

    /// Enable cull face
    #[arg(long)]
    pub enable_cull_face: bool,

    /// Polygon mode
    #[arg(long, value_name = "MODE", value_enum, default_value_t = PolygonModeArg::Fill)]
    pub polygon_mode: PolygonModeArg,

    /// Number of rendering frames
    #[arg(short = 'f', long, value_name = "FRAMES",
          default_value_t = DEFAULT_FRAMES, value_parser = positive_or(DEFAULT_FRAMES))]
    pub frames: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum PolygonModeArg {
    Point,
    Line,
    Fill,
}

impl From<PolygonModeArg> for PolygonMode {
    fn from(arg: PolygonModeArg) -> Self {
        match arg {
            PolygonModeArg::Point => PolygonMode::Point,
            PolygonModeArg::Line => PolygonMode::Line,
            PolygonModeArg::Fill => PolygonMode::Fill,
        }
    }
}

impl BenchArgs {
    pub fn raster(&self) -> RasterState {
        RasterState {
            depth_test: self.enable_depth_test,
            cull_face: self.enable_cull_face,
            polygon_mode: self.polygon_mode.into(),
        }
    }

    /// The parameter block printed before the run starts.
    pub fn parameters(&self) -> Parameters<'_> {
        Parameters { grid: &self.grid, bench: Some(self) }
    }
}

/// Display adapter for [`ViewArgs::parameters`] and [`BenchArgs::parameters`].
///
/// The grid lines are shared; the timed variant appends its own settings.
pub struct Parameters<'a> {
    grid: &'a GridArgs,
    bench: Option<&'a BenchArgs>,
}

impl fmt::Display for Parameters<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = self.grid;
        writeln!(f, "======== parameters ========")?;
        writeln!(f, "window width: {}", grid.width)?;
        writeln!(f, "window height: {}", grid.height)?;
        writeln!(f, "cells in x: {}", grid.cells_x)?;
        writeln!(f, "cells in y: {}", grid.cells_y)?;
        writeln!(f, "layers: {}", grid.layers)?;

        let Some(args) = self.bench else { return Ok(()) };
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        writeln!(f, "frames: {}", args.frames)?;
        writeln!(f, "enable depth test: {}", yes_no(args.enable_depth_test))?;
        writeln!(f, "enable cull face: {}", yes_no(args.enable_cull_face))?;
        writeln!(f, "polygon mode: {}", PolygonMode::from(args.polygon_mode).name())
    }
}
