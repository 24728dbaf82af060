use std::fmt;

use crate::grid::GridConfig;

const NS_PER_SEC: f64 = 1_000_000_000.0;

/// Accumulates per-frame GPU times over a benchmark run.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frames: u32,
    total_ns: u64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one measured frame.
    pub fn record(&mut self, elapsed_ns: u64) {
        self.frames += 1;
        self.total_ns = self.total_ns.saturating_add(elapsed_ns);
    }

    /// Number of frames recorded so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn total_ns(&self) -> u64 {
        self.total_ns
    }

    /// Builds the end-of-run report.
    ///
    /// Averages are taken over `requested_frames`, the frame count the run was
    /// configured for, even if it ended early.
    pub fn report(&self, grid: &GridConfig, requested_frames: u32) -> BenchReport {
        let total_s = self.total_ns as f64 / NS_PER_SEC;
        let average_frame_s = total_s / f64::from(requested_frames.max(1));
        let triangles_per_frame = grid.triangles_per_frame();
        let triangles_per_second = if average_frame_s > 0.0 {
            triangles_per_frame as f64 / average_frame_s
        } else {
            0.0
        };

        BenchReport {
            cells_x: grid.cells_x(),
            cells_y: grid.cells_y(),
            layers: grid.layers(),
            triangles_per_frame,
            frames: requested_frames,
            frames_measured: self.frames,
            total_s,
            average_frame_s,
            triangles_per_second,
        }
    }
}

/// Aggregate results printed once a timed run ends.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchReport {
    pub cells_x: u32,
    pub cells_y: u32,
    pub layers: u32,
    pub triangles_per_frame: u64,
    /// Frames the run was configured for.
    pub frames: u32,
    /// Frames actually measured; lower when the run ended early.
    pub frames_measured: u32,
    pub total_s: f64,
    pub average_frame_s: f64,
    pub triangles_per_second: f64,
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "======== results ========")?;
        writeln!(f, "grid: {} x {}", self.cells_x, self.cells_y)?;
        writeln!(f, "layers: {}", self.layers)?;
        writeln!(f, "triangles per frame: {}", self.triangles_per_frame)?;
        writeln!(f, "frames: {}", self.frames)?;
        if self.frames_measured != self.frames {
            writeln!(f, "frames measured: {}", self.frames_measured)?;
        }
        writeln!(f, "total time: {:.6}s", self.total_s)?;
        writeln!(f, "average frame time: {:.6}s", self.average_frame_s)?;
        writeln!(f, "triangles per second (TPS): {:.6}", self.triangles_per_second)
    }
}
