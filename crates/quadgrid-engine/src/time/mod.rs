//! Time subsystem.
//!
//! - `FrameClock`: one per render loop, `tick()` once per frame
//! - `GpuTimer`: GPU elapsed time of one pass per frame
//! - `FrameStats`: accumulation and the end-of-run report

mod frame_clock;
mod gpu_timer;
mod stats;

pub use frame_clock::{FrameClock, FrameTime};
pub use gpu_timer::{GpuTimer, TimerError};
pub use stats::{BenchReport, FrameStats};
