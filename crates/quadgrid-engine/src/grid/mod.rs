//! Instanced grid placement.
//!
//! A draw of `cells_x * cells_y * layers` instances of one unit quad tiles the
//! whole NDC screen once per depth layer. Instance `i` lands in:
//!
//! ```text
//! layer = i / (cells_x * cells_y)
//! y     = (i % (cells_x * cells_y)) / cells_x
//! x     = (i % (cells_x * cells_y)) % cells_x
//! ```
//!
//! Layer 0 sits at depth 1.0, each further layer `1 / layers` closer to the
//! viewer. The grid vertex shader runs the same arithmetic per vertex; the
//! functions here are its CPU reference.

mod config;

pub use config::{CellIndex, Cells, GridConfig};
