/*
 * Spatial Grid Module
 *
 * Uniform grid over the simulation area for neighbor lookups. Each cell is
 * at least as wide as the largest rule range, so every agent within range
 * of a query point sits in the query cell or one of its eight neighbors.
 *
 * Positions outside the area are clamped into the border cells, both on
 * insert and on query. Clamping never pulls two cells further apart, so the
 * 3x3 lookup still finds every in-range pair.
 */

use crate::params::Bounds;
use crate::vector::Vector2;

// Cells narrower than this would make the grid needlessly large
const MIN_CELL_SIZE: f32 = 4.0;

pub struct SpatialGrid {
    pub cell_size: f32,
    pub columns: usize,
    pub rows: usize,
    cells: Vec<Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32, bounds: Bounds) -> Self {
        let (cell_size, columns, rows) = Self::layout(cell_size, bounds);

        Self {
            cell_size,
            columns,
            rows,
            cells: vec![Vec::new(); columns * rows],
        }
    }

    fn layout(cell_size: f32, bounds: Bounds) -> (f32, usize, usize) {
        let cell_size = if cell_size.is_finite() {
            cell_size.max(MIN_CELL_SIZE)
        } else {
            MIN_CELL_SIZE
        };
        let columns = ((bounds.width / cell_size).ceil() as usize).max(1);
        let rows = ((bounds.height / cell_size).ceil() as usize).max(1);
        (cell_size, columns, rows)
    }

    /// Whether this grid can serve queries for `range` over `bounds`.
    pub fn fits(&self, range: f32, bounds: Bounds) -> bool {
        Self::layout(range, bounds) == (self.cell_size, self.columns, self.rows)
    }

    #[inline]
    fn cell_coords(&self, position: Vector2) -> (usize, usize) {
        let cx = (position.x / self.cell_size).floor();
        let cy = (position.y / self.cell_size).floor();
        // NaN casts to 0, which is as good a cell as any
        let cx = cx.clamp(0.0, (self.columns - 1) as f32) as usize;
        let cy = cy.clamp(0.0, (self.rows - 1) as f32) as usize;
        (cx, cy)
    }

    // Clear the grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    #[inline]
    pub fn insert(&mut self, index: usize, position: Vector2) {
        let (cx, cy) = self.cell_coords(position);
        self.cells[cy * self.columns + cx].push(index);
    }

    /// Clear and re-insert every position.
    pub fn rebuild<I: IntoIterator<Item = Vector2>>(&mut self, positions: I) {
        self.clear();
        for (i, position) in positions.into_iter().enumerate() {
            self.insert(i, position);
        }
    }

    // Get indices within and adjacent to the cell containing the given position
    pub fn nearby(&self, position: Vector2) -> Vec<usize> {
        let (cx, cy) = self.cell_coords(position);
        let mut result = Vec::new();

        for y in cy.saturating_sub(1)..=(cy + 1).min(self.rows - 1) {
            let row = y * self.columns;
            for x in cx.saturating_sub(1)..=(cx + 1).min(self.columns - 1) {
                result.extend_from_slice(&self.cells[row + x]);
            }
        }

        // Index order keeps the rule sums identical to a full scan
        result.sort_unstable();
        result
    }
}
