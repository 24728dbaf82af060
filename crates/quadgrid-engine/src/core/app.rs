use super::ctx::FrameCtx;

/// Whether the loop keeps going after a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// A program driven by [`Runtime::run`](crate::window::Runtime::run).
pub trait App {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
