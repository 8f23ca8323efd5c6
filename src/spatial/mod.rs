use glam::Vec2;

/// Uniform grid over the arena for 3x3-block neighbor queries.
///
/// Cell size must be >= the largest query radius or the 3x3 block misses
/// valid neighbors. Cells are stretched so a whole number of them tiles the
/// arena exactly, which keeps wrapped queries correct. Rebuilt from scratch
/// every step.
pub struct SpatialGrid {
    /// Requested minimum cell size.
    cell_size: f32,
    /// Reciprocal of the actual (stretched) cell size per axis.
    inv_cell: Vec2,
    extent: Vec2,
    cols: usize,
    rows: usize,
    /// Each bucket holds particle indices. Pre-allocated, cleared each step.
    buckets: Vec<Vec<u32>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32, extent: Vec2) -> Self {
        let mut grid = Self {
            cell_size,
            inv_cell: Vec2::ONE,
            extent,
            cols: 0,
            rows: 0,
            buckets: Vec::new(),
        };
        grid.resize(cell_size);
        grid
    }

    /// Change the cell size, reallocating buckets. Only called between runs.
    pub fn resize(&mut self, cell_size: f32) {
        self.cell_size = cell_size;
        self.cols = ((self.extent.x / cell_size).floor() as usize).max(1);
        self.rows = ((self.extent.y / cell_size).floor() as usize).max(1);
        self.inv_cell = Vec2::new(
            self.cols as f32 / self.extent.x,
            self.rows as f32 / self.extent.y,
        );
        self.buckets.clear();
        self.buckets.resize_with(self.cols * self.rows, || Vec::with_capacity(8));
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Clear all buckets. Call at start of each rebuild.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear(); // Keeps allocation.
        }
    }

    /// Insert a particle. Returns false if the position lies outside the
    /// arena; such particles are skipped by this step's queries.
    pub fn insert(&mut self, pos: Vec2, index: u32) -> bool {
        match self.cell_of(pos) {
            Some((cx, cy)) => {
                self.buckets[cy * self.cols + cx].push(index);
                true
            }
            None => false,
        }
    }

    /// Rebuild from a full position slice. Returns how many were dropped.
    pub fn rebuild(&mut self, positions: &[Vec2]) -> usize {
        self.clear();
        let mut dropped = 0;
        for (i, &pos) in positions.iter().enumerate() {
            if !self.insert(pos, i as u32) {
                dropped += 1;
            }
        }
        dropped
    }

    /// Visit every index in the 3x3 block of cells around `pos`.
    ///
    /// With `wrap` the block continues across the opposite edges (toroidal
    /// world); otherwise it is clipped to the grid.
    pub fn query_neighbors(&self, pos: Vec2, wrap: bool, mut callback: impl FnMut(u32)) {
        let (cx, cy) = self.cell_coords(pos);
        let xs = self.axis_cells(cx, self.cols, wrap);
        let ys = self.axis_cells(cy, self.rows, wrap);
        for &y in ys.iter().flatten() {
            for &x in xs.iter().flatten() {
                for &index in &self.buckets[y * self.cols + x] {
                    callback(index);
                }
            }
        }
    }

    /// Up to three distinct cell indices along one axis.
    fn axis_cells(&self, center: i64, len: usize, wrap: bool) -> [Option<usize>; 3] {
        let mut out = [None; 3];
        let len_i = len as i64;
        for (slot, d) in (-1i64..=1).enumerate() {
            let c = center + d;
            let wrapped = if wrap {
                c.rem_euclid(len_i)
            } else if c < 0 || c >= len_i {
                continue;
            } else {
                c
            };
            let idx = wrapped as usize;
            // Tiny grids wrap onto the same cell twice.
            if !out[..slot].contains(&Some(idx)) {
                out[slot] = Some(idx);
            }
        }
        out
    }

    /// Unclamped cell coordinates, used as the query center.
    fn cell_coords(&self, pos: Vec2) -> (i64, i64) {
        let cx = (pos.x * self.inv_cell.x).floor() as i64;
        let cy = (pos.y * self.inv_cell.y).floor() as i64;
        (cx.clamp(-1, self.cols as i64), cy.clamp(-1, self.rows as i64))
    }

    /// Bucket for an in-arena position. The far walls are inclusive.
    fn cell_of(&self, pos: Vec2) -> Option<(usize, usize)> {
        // Also rejects NaN.
        if !(pos.x >= 0.0 && pos.x <= self.extent.x && pos.y >= 0.0 && pos.y <= self.extent.y) {
            return None;
        }
        let cx = ((pos.x * self.inv_cell.x) as usize).min(self.cols - 1);
        let cy = ((pos.y * self.inv_cell.y) as usize).min(self.rows - 1);
        Some((cx, cy))
    }
}
