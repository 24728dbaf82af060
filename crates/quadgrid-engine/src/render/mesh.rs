//! The static quad mesh drawn once per grid instance.

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 3], // local space, [-1, 1] on x/y
    pub col: [f32; 3], // rgb
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // pos
        1 => Float32x3  // col
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const fn v(x: f32, y: f32, col: [f32; 3]) -> QuadVertex {
    QuadVertex { pos: [x, y, 0.0], col }
}

const RED: [f32; 3] = [1.0, 0.0, 0.0];
const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const BLUE: [f32; 3] = [0.0, 0.0, 1.0];

/// Unit quad as two counter-clockwise triangles (non-indexed).
pub const QUAD_VERTICES: [QuadVertex; 6] = [
    v(-1.0, -1.0, RED),
    v(1.0, -1.0, GREEN),
    v(-1.0, 1.0, BLUE),
    v(-1.0, 1.0, GREEN),
    v(1.0, -1.0, BLUE),
    v(1.0, 1.0, RED),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_area(tri: &[QuadVertex]) -> f32 {
        let [a, b, c] = [tri[0].pos, tri[1].pos, tri[2].pos];
        (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])
    }

    #[test]
    fn both_triangles_are_counter_clockwise() {
        for tri in QUAD_VERTICES.chunks_exact(3) {
            assert!(signed_area(tri) > 0.0);
        }
    }

    #[test]
    fn quad_spans_unit_square() {
        let xs = QUAD_VERTICES.iter().map(|v| v.pos[0]);
        let ys = QUAD_VERTICES.iter().map(|v| v.pos[1]);
        assert_eq!(xs.clone().fold(f32::MAX, f32::min), -1.0);
        assert_eq!(xs.fold(f32::MIN, f32::max), 1.0);
        assert_eq!(ys.clone().fold(f32::MAX, f32::min), -1.0);
        assert_eq!(ys.fold(f32::MIN, f32::max), 1.0);
        // Two triangles of area 2 each.
        let area: f32 = QUAD_VERTICES.chunks_exact(3).map(|t| signed_area(t) / 2.0).sum();
        assert_eq!(area, 4.0);
    }

    #[test]
    fn vertex_stride_is_six_floats() {
        assert_eq!(QuadVertex::layout().array_stride, 24);
    }
}
