//! The contract between the window loop and a program: an [`App`] is called
//! once per redraw with a [`FrameCtx`] and answers with an [`AppControl`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, FrameOutcome};
