//! Engine for the quadgrid GPU benchmarks.
//!
//! A single-window loop ([`window::Runtime`]) drives an [`core::App`] once per
//! redraw. The grid renderer draws `cells_x * cells_y * layers` instances of
//! one quad with one draw call, and [`time::GpuTimer`] measures that draw.

pub mod core;
pub mod device;
pub mod grid;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
