//! Bridge to the gameplay occupancy grid
//!
//! Sculpting height under a building or unit invalidates it, so every cell
//! a height stroke touches is reported to the host's occupancy grid.

/// Host-side spatial grid of gameplay occupants
pub trait OccupancyGridBridge {
    /// Occupancy cell containing world `(x, z)`
    fn sample(&self, world_x: f32, world_z: f32) -> (i32, i32);

    /// Remove whatever occupies the cell
    fn evict(&mut self, grid_x: i32, grid_y: i32);
}

/// For hosts without gameplay occupants
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOccupancy;

impl OccupancyGridBridge for NoOccupancy {
    fn sample(&self, _world_x: f32, _world_z: f32) -> (i32, i32) {
        (0, 0)
    }

    fn evict(&mut self, _grid_x: i32, _grid_y: i32) {}
}
