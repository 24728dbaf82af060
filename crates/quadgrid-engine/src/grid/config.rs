use std::num::NonZeroU32;

/// Grid dimensions: cells along X and Y, and the number of depth layers.
///
/// All three are at least 1 and their product fits in a `u32` instance count.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GridConfig {
    cells_x: NonZeroU32,
    cells_y: NonZeroU32,
    layers: NonZeroU32,
}

/// Grid coordinates of one instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CellIndex {
    pub layer: u32,
    pub y: u32,
    pub x: u32,
}

impl GridConfig {
    /// Largest instance count a grid may have.
    ///
    /// The vertex shader reads the dimensions and the instance index as `i32`.
    pub const MAX_INSTANCES: u32 = i32::MAX as u32;

    /// Returns `None` if any dimension is zero or the instance count exceeds
    /// [`MAX_INSTANCES`](Self::MAX_INSTANCES).
    pub fn new(cells_x: u32, cells_y: u32, layers: u32) -> Option<Self> {
        Self::from_nonzero(
            NonZeroU32::new(cells_x)?,
            NonZeroU32::new(cells_y)?,
            NonZeroU32::new(layers)?,
        )
    }

    /// Returns `None` if the instance count exceeds [`MAX_INSTANCES`](Self::MAX_INSTANCES).
    ///
    /// Every dimension is at most the instance count, so each one fits in `i32` too.
    pub fn from_nonzero(
        cells_x: NonZeroU32,
        cells_y: NonZeroU32,
        layers: NonZeroU32,
    ) -> Option<Self> {
        let count = cells_x.get().checked_mul(cells_y.get())?.checked_mul(layers.get())?;
        (count <= Self::MAX_INSTANCES).then_some(Self { cells_x, cells_y, layers })
    }

    #[inline]
    pub fn cells_x(&self) -> u32 {
        self.cells_x.get()
    }

    #[inline]
    pub fn cells_y(&self) -> u32 {
        self.cells_y.get()
    }

    #[inline]
    pub fn layers(&self) -> u32 {
        self.layers.get()
    }

    /// Number of cells in one layer.
    #[inline]
    pub fn layer_size(&self) -> u32 {
        self.cells_x() * self.cells_y()
    }

    /// Number of quad instances drawn per frame.
    #[inline]
    pub fn instance_count(&self) -> u32 {
        self.layer_size() * self.layers()
    }

    /// Two triangles per quad instance.
    #[inline]
    pub fn triangles_per_frame(&self) -> u64 {
        2 * u64::from(self.instance_count())
    }

    /// Cell and layer extents in NDC: `(2 / cells_x, 2 / cells_y, 1 / layers)`.
    pub fn steps(&self) -> (f32, f32, f32) {
        (
            2.0 / self.cells_x() as f32,
            2.0 / self.cells_y() as f32,
            1.0 / self.layers() as f32,
        )
    }

    /// Grid coordinates of `instance`.
    ///
    /// `instance` must be below [`instance_count`](Self::instance_count);
    /// larger values yield a layer index past the last layer.
    pub fn cell(&self, instance: u32) -> CellIndex {
        let layer_size = self.layer_size();
        let remain = instance % layer_size;
        CellIndex {
            layer: instance / layer_size,
            y: remain / self.cells_x(),
            x: remain % self.cells_x(),
        }
    }

    /// Clip-space position of local quad vertex `(vx, vy)` for `instance`.
    ///
    /// The local quad spans `[-1, 1]` on both axes and is scaled into its
    /// cell; `w` is always 1.
    pub fn place(&self, instance: u32, vx: f32, vy: f32) -> [f32; 4] {
        let cell = self.cell(instance);
        let (step_x, step_y, step_z) = self.steps();
        [
            step_x * cell.x as f32 - 1.0 + (vx + 1.0) * step_x * 0.5,
            step_y * cell.y as f32 - 1.0 + (vy + 1.0) * step_y * 0.5,
            1.0 - step_z * cell.layer as f32,
            1.0,
        ]
    }

    /// Iterates the cells of every instance, in instance order.
    pub fn cells(&self) -> Cells {
        Cells {
            grid: *self,
            next: 0,
        }
    }
}

/// Iterator returned by [`GridConfig::cells`].
#[derive(Debug, Clone)]
pub struct Cells {
    grid: GridConfig,
    next: u32,
}

impl Iterator for Cells {
    type Item = CellIndex;

    fn next(&mut self) -> Option<CellIndex> {
        if self.next >= self.grid.instance_count() {
            return None;
        }
        let cell = self.grid.cell(self.next);
        self.next += 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.grid.instance_count() - self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Cells {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn grid(x: u32, y: u32, z: u32) -> GridConfig {
        GridConfig::new(x, y, z).unwrap()
    }

    fn c(layer: u32, y: u32, x: u32) -> CellIndex {
        CellIndex { layer, y, x }
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(GridConfig::new(0, 1, 1).is_none());
        assert!(GridConfig::new(1, 0, 1).is_none());
        assert!(GridConfig::new(1, 1, 0).is_none());
    }

    #[test]
    fn overflowing_instance_count_is_rejected() {
        assert!(GridConfig::new(65_536, 65_536, 1).is_none());
        assert!(GridConfig::new(4_096, 4_096, 4_096).is_none());
    }

    #[test]
    fn instance_count_is_capped_at_i32_max() {
        assert!(GridConfig::new(50_000, 50_000, 1).is_none());
        assert!(GridConfig::new(3_000_000_000, 1, 1).is_none());
        assert!(GridConfig::new(46_341, 46_341, 1).is_none());

        let g = GridConfig::new(46_340, 46_340, 1).unwrap();
        assert!(g.instance_count() <= i32::MAX as u32);
        assert!(GridConfig::new(i32::MAX as u32, 1, 1).is_some());
        assert!(GridConfig::new(i32::MAX as u32 + 1, 1, 1).is_none());
    }

    #[test]
    fn counts() {
        let g = grid(4, 3, 2);
        assert_eq!(g.layer_size(), 12);
        assert_eq!(g.instance_count(), 24);
        assert_eq!(g.triangles_per_frame(), 48);
    }

    // ── cell ──────────────────────────────────────────────────────────────

    #[test]
    fn two_by_two_single_layer() {
        let g = grid(2, 2, 1);
        assert_eq!(g.cell(0), c(0, 0, 0));
        assert_eq!(g.cell(1), c(0, 0, 1));
        assert_eq!(g.cell(2), c(0, 1, 0));
        assert_eq!(g.cell(3), c(0, 1, 1));
    }

    #[test]
    fn x_varies_fastest_then_y_then_layer() {
        let g = grid(4, 3, 2);
        assert_eq!(g.cell(3), c(0, 0, 3));
        assert_eq!(g.cell(4), c(0, 1, 0));
        assert_eq!(g.cell(11), c(0, 2, 3));
        assert_eq!(g.cell(12), c(1, 0, 0));
        assert_eq!(g.cell(23), c(1, 2, 3));
    }

    #[test]
    fn past_the_end_spills_into_a_missing_layer() {
        let g = grid(2, 2, 1);
        assert_eq!(g.cell(4), c(1, 0, 0));
    }

    #[test]
    fn cells_are_a_bijection_onto_the_grid() {
        for (x, y, z) in [(1, 1, 1), (2, 2, 1), (4, 3, 2), (16, 12, 4), (7, 1, 5), (1, 9, 3)] {
            let g = grid(x, y, z);
            let seen: HashSet<CellIndex> = g.cells().collect();
            assert_eq!(seen.len() as u32, g.instance_count(), "{x}x{y}x{z}");
            for cell in &seen {
                assert!(cell.layer < z && cell.y < y && cell.x < x, "{cell:?} in {x}x{y}x{z}");
            }
        }
    }

    #[test]
    fn cells_iterator_is_exact_size() {
        let g = grid(3, 2, 2);
        let mut it = g.cells();
        assert_eq!(it.len(), 12);
        let _ = it.next();
        assert_eq!(it.len(), 11);
        assert_eq!(it.last(), Some(c(1, 1, 2)));
    }

    // ── place ─────────────────────────────────────────────────────────────

    #[test]
    fn lower_left_vertex_hits_cell_corner() {
        let g = grid(4, 3, 2);
        let (step_x, step_y, _) = g.steps();
        for i in 0..g.instance_count() {
            let cell = g.cell(i);
            let [x, y, _, w] = g.place(i, -1.0, -1.0);
            assert_eq!(x, step_x * cell.x as f32 - 1.0);
            assert_eq!(y, step_y * cell.y as f32 - 1.0);
            assert_eq!(w, 1.0);
        }
    }

    #[test]
    fn upper_right_vertex_hits_next_cell_corner() {
        let g = grid(2, 2, 1);
        let [x, y, _, _] = g.place(0, 1.0, 1.0);
        assert_eq!((x, y), (0.0, 0.0));
        let [x, y, _, _] = g.place(3, 1.0, 1.0);
        assert_eq!((x, y), (1.0, 1.0));
    }

    #[test]
    fn single_cell_covers_the_screen() {
        let g = grid(1, 1, 1);
        assert_eq!(g.place(0, -1.0, -1.0), [-1.0, -1.0, 1.0, 1.0]);
        assert_eq!(g.place(0, 1.0, 1.0), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn depth_decreases_layer_by_layer() {
        let g = grid(2, 2, 4);
        let depths: Vec<f32> = (0..g.layers())
            .map(|layer| g.place(layer * g.layer_size(), 0.0, 0.0)[2])
            .collect();
        assert_eq!(depths, vec![1.0, 0.75, 0.5, 0.25]);
        assert!(depths.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn depth_is_shared_within_a_layer() {
        let g = grid(3, 3, 3);
        for i in 0..g.instance_count() {
            let expected = 1.0 - g.cell(i).layer as f32 / 3.0;
            assert!((g.place(i, 0.3, -0.7)[2] - expected).abs() < 1e-6);
        }
    }
}
