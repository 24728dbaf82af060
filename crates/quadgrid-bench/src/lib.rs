//! quadgrid programs: an event-driven viewer and a timed benchmark.

use quadgrid_engine::core::{AppControl, FrameCtx, FrameOutcome};
use quadgrid_engine::time::GpuTimer;

pub mod bench;
pub mod cli;
pub mod view;

/// Framebuffer clear color shared by both programs.
pub(crate) const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// Creates the frame timer for the window's device and logs how frames are timed.
pub(crate) fn frame_timer(ctx: &FrameCtx<'_, '_>) -> GpuTimer {
    let timer = GpuTimer::new(ctx.gpu.device(), ctx.gpu.queue());
    let info = ctx.gpu.adapter_info();
    log::info!(
        "timing frames on {} ({:?}) with {}",
        info.name,
        info.backend,
        if timer.uses_timestamps() { "timestamp queries" } else { "wall-clock time" },
    );
    timer
}

/// What an app does with a frame that was not presented.
///
/// `None` means the frame was presented and its timing can be read. A lost
/// surface is logged as an error and ends the loop.
pub(crate) fn unpresented(outcome: FrameOutcome, program: &str) -> Option<AppControl> {
    match outcome {
        FrameOutcome::Presented => None,
        FrameOutcome::Skipped => Some(AppControl::Continue),
        FrameOutcome::Fatal => {
            log::error!("surface lost; {program} is closing");
            Some(AppControl::Exit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presented_frames_proceed_to_timing() {
        assert_eq!(unpresented(FrameOutcome::Presented, "test"), None);
    }

    #[test]
    fn skipped_frames_keep_the_loop_running() {
        assert_eq!(unpresented(FrameOutcome::Skipped, "test"), Some(AppControl::Continue));
    }

    #[test]
    fn lost_surface_ends_the_loop() {
        assert_eq!(unpresented(FrameOutcome::Fatal, "test"), Some(AppControl::Exit));
    }
}
