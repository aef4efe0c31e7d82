/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for faster neighbor lookups.
 * It divides the world rectangle into square cells at least as large as the
 * largest interaction radius, so every boid within range of a position lies
 * in that position's cell or one of the eight cells around it.
 *
 * Positions outside the world (boids inside the wrap margin, or pushed past
 * the home border) are clamped into the edge cells.
 *
 * Each axis holds at most MAX_CELLS_PER_AXIS cells. Worlds that would need
 * more get proportionally larger cells, which only widens the candidate set.
 */

use crate::boid::BoidState;

pub const MAX_CELLS_PER_AXIS: usize = 256;

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    pub cell_size: f32,
    pub cols: usize,
    pub rows: usize,
    pub grid: Vec<Vec<usize>>,
}

impl SpatialGrid {
    /// A grid whose cells are at least `cell_size` wide, and larger when the
    /// world would otherwise need more than [`MAX_CELLS_PER_AXIS`] per axis.
    pub fn new(cell_size: f32, width: f32, height: f32) -> Self {
        let cell_size = SpatialGrid::effective_cell_size(cell_size, width, height);
        let (cols, rows) = SpatialGrid::dimensions(cell_size, width, height);

        Self {
            cell_size,
            cols,
            rows,
            grid: vec![Vec::new(); cols * rows],
        }
    }

    // True when this grid can be reused for the given cell size and world
    pub fn matches(&self, cell_size: f32, width: f32, height: f32) -> bool {
        let cell_size = SpatialGrid::effective_cell_size(cell_size, width, height);
        self.cell_size == cell_size
            && (self.cols, self.rows) == SpatialGrid::dimensions(cell_size, width, height)
    }

    fn effective_cell_size(cell_size: f32, width: f32, height: f32) -> f32 {
        cell_size.max(width.max(height) / MAX_CELLS_PER_AXIS as f32)
    }

    fn dimensions(cell_size: f32, width: f32, height: f32) -> (usize, usize) {
        let cells = |extent: f32| ((extent / cell_size).ceil() as usize).clamp(1, MAX_CELLS_PER_AXIS);
        (cells(width), cells(height))
    }

    // Convert world coordinates to clamped grid coordinates
    #[inline]
    fn cell_coords(&self, x: f32, y: f32) -> (usize, usize) {
        let grid_x = (x / self.cell_size).floor().clamp(0.0, (self.cols - 1) as f32) as usize;
        let grid_y = (y / self.cell_size).floor().clamp(0.0, (self.rows - 1) as f32) as usize;
        (grid_x, grid_y)
    }

    // Convert world coordinates to grid cell index
    #[inline]
    pub fn pos_to_cell_index(&self, x: f32, y: f32) -> usize {
        let (grid_x, grid_y) = self.cell_coords(x, y);
        grid_y * self.cols + grid_x
    }

    // Clear the grid
    pub fn clear(&mut self) {
        for cell in &mut self.grid {
            cell.clear();
        }
    }

    // Insert a boid into the grid
    #[inline]
    pub fn insert(&mut self, boid_index: usize, x: f32, y: f32) {
        let cell_index = self.pos_to_cell_index(x, y);
        self.grid[cell_index].push(boid_index);
    }

    // Refill the grid from a tick snapshot
    pub fn rebuild(&mut self, snapshot: &[BoidState]) {
        self.clear();
        for (i, state) in snapshot.iter().enumerate() {
            self.insert(i, state.position.x, state.position.y);
        }
    }

    /// Indices of every boid in the 3x3 block of cells around `(x, y)`,
    /// in ascending order.
    pub fn nearby_indices(&self, x: f32, y: f32) -> Vec<usize> {
        let (grid_x, grid_y) = self.cell_coords(x, y);
        let mut result = Vec::new();

        let min_x = grid_x.saturating_sub(1);
        let max_x = (grid_x + 1).min(self.cols - 1);
        let min_y = grid_y.saturating_sub(1);
        let max_y = (grid_y + 1).min(self.rows - 1);

        for check_y in min_y..=max_y {
            let y_index = check_y * self.cols;
            for check_x in min_x..=max_x {
                result.extend_from_slice(&self.grid[y_index + check_x]);
            }
        }

        // Same order as a full scan, so sums come out bit-identical
        result.sort_unstable();
        result
    }
}
