/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for neighbor lookups on the
 * toroidal world. It divides the world into a grid of cells at least as
 * large as the biggest perception radius, so every boid within that radius
 * lies in the 3x3 block of cells around a position. The block wraps across
 * the world edges like the world itself.
 *
 * The grid only narrows the candidate set; the neighbor rule still measures
 * every candidate, so results match a full scan up to summation order.
 */

use nannou::prelude::*;

use crate::boid::Boid;
use crate::flock::WorldBounds;

// Keeps memory bounded for tiny radii on large worlds; bigger cells are
// still correct, just less selective
const MAX_CELLS_PER_AXIS: usize = 256;

pub struct SpatialGrid {
    cols: usize,
    rows: usize,
    cell_width: f32,
    cell_height: f32,
    grid: Vec<Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32, bounds: WorldBounds) -> Self {
        let cols = cells_along(bounds.width, cell_size);
        let rows = cells_along(bounds.height, cell_size);

        Self {
            cols,
            rows,
            cell_width: bounds.width / cols as f32,
            cell_height: bounds.height / rows as f32,
            grid: vec![Vec::new(); cols * rows],
        }
    }

    // Grid sized for the largest of the three perception radii
    pub fn for_radii(radius: f32, bounds: WorldBounds) -> Self {
        Self::new(radius.max(f32::EPSILON), bounds)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    #[inline]
    fn cell_coords(&self, pos: Point2) -> (usize, usize) {
        let x = ((pos.x / self.cell_width).floor().max(0.0) as usize).min(self.cols - 1);
        let y = ((pos.y / self.cell_height).floor().max(0.0) as usize).min(self.rows - 1);
        (x, y)
    }

    pub fn clear(&mut self) {
        for cell in &mut self.grid {
            cell.clear();
        }
    }

    #[inline]
    pub fn insert(&mut self, boid_index: usize, position: Point2) {
        let (x, y) = self.cell_coords(position);
        self.grid[y * self.cols + x].push(boid_index);
    }

    // Clear and re-insert every boid
    pub fn rebuild(&mut self, boids: &[Boid]) {
        self.clear();
        for (i, boid) in boids.iter().enumerate() {
            self.insert(i, boid.position);
        }
    }

    /// Indices of boids in the cell containing `position` and the eight
    /// cells around it, wrapping across the edges. Each cell is visited once
    /// even when the grid is narrower than three cells.
    pub fn nearby_indices(&self, position: Point2) -> Vec<usize> {
        let (cx, cy) = self.cell_coords(position);
        let columns = wrapped_span(cx, self.cols);
        let rows = wrapped_span(cy, self.rows);

        let mut result = Vec::new();
        for &y in rows.iter().flatten() {
            let row_start = y * self.cols;
            for &x in columns.iter().flatten() {
                result.extend_from_slice(&self.grid[row_start + x]);
            }
        }
        result
    }
}

fn cells_along(extent: f32, cell_size: f32) -> usize {
    ((extent / cell_size).floor() as usize).clamp(1, MAX_CELLS_PER_AXIS)
}

// Up to three distinct cell indices around `center` on a ring of `len` cells
fn wrapped_span(center: usize, len: usize) -> [Option<usize>; 3] {
    match len {
        1 => [Some(0), None, None],
        2 => [Some(0), Some(1), None],
        _ => [
            Some((center + len - 1) % len),
            Some(center),
            Some((center + 1) % len),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boid_at(x: f32, y: f32) -> Boid {
        Boid::new(pt2(x, y), vec2(1.0, 0.0), 0)
    }

    fn sorted_nearby(grid: &SpatialGrid, position: Point2) -> Vec<usize> {
        let mut nearby = grid.nearby_indices(position);
        nearby.sort_unstable();
        nearby
    }

    #[test]
    fn cells_are_at_least_cell_size() {
        let grid = SpatialGrid::new(80.0, WorldBounds::new(1000.0, 500.0).unwrap());
        assert_eq!(grid.dimensions(), (12, 6));
        assert!(grid.cell_width >= 80.0 && grid.cell_height >= 80.0);
    }

    #[test]
    fn finds_neighbors_in_adjacent_cells() {
        let bounds = WorldBounds::new(100.0, 100.0).unwrap();
        let boids = vec![boid_at(10.0, 10.0), boid_at(15.0, 12.0), boid_at(60.0, 60.0)];
        let mut grid = SpatialGrid::new(20.0, bounds);
        grid.rebuild(&boids);

        assert_eq!(sorted_nearby(&grid, boids[0].position), vec![0, 1]);
        assert_eq!(sorted_nearby(&grid, boids[2].position), vec![2]);
    }

    #[test]
    fn wraps_across_world_edges() {
        let bounds = WorldBounds::new(100.0, 100.0).unwrap();
        let boids = vec![boid_at(1.0, 1.0), boid_at(99.0, 99.0), boid_at(50.0, 50.0)];
        let mut grid = SpatialGrid::new(20.0, bounds);
        grid.rebuild(&boids);

        assert_eq!(sorted_nearby(&grid, boids[0].position), vec![0, 1]);
    }

    #[test]
    fn narrow_grid_visits_each_cell_once() {
        let bounds = WorldBounds::new(30.0, 30.0).unwrap();
        let boids = vec![boid_at(1.0, 1.0), boid_at(29.0, 29.0)];
        let mut grid = SpatialGrid::new(20.0, bounds);
        grid.rebuild(&boids);

        assert_eq!(grid.dimensions(), (1, 1));
        assert_eq!(sorted_nearby(&grid, boids[0].position), vec![0, 1]);
    }

    #[test]
    fn tiny_radius_is_capped() {
        let grid = SpatialGrid::for_radii(0.0, WorldBounds::new(5000.0, 5000.0).unwrap());
        assert_eq!(grid.dimensions(), (MAX_CELLS_PER_AXIS, MAX_CELLS_PER_AXIS));
    }
}
