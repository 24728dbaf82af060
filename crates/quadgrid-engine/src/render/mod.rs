//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers) and record into a
//! caller-provided encoder.
//!
//! Convention:
//! - geometry is authored in local quad space and placed in NDC by the vertex shader
//! - one instanced draw call per frame

mod ctx;
mod grid;
mod mesh;
mod raster;

pub use ctx::{RenderCtx, RenderTarget};
pub use grid::{GridRenderer, GRID_SHADER};
pub use mesh::{QuadVertex, QUAD_VERTICES};
pub use raster::{PolygonMode, RasterState};
