//! GPU device and window surface.
//!
//! [`Gpu`] brings up the adapter/device for a window, keeps the surface
//! configured across resizes and hands out one [`SurfaceFrame`] per redraw.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, SurfaceFrame};
pub use init::GpuInit;
pub use surface::SurfaceRecovery;
