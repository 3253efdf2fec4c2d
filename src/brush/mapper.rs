//! World-space brush footprint to grid-index rectangles

use std::ops::Range;

use crate::core::Vec2;

/// A brush footprint mapped onto one field's grid.
///
/// `start`/`end` are the unclipped logical bounds (end exclusive) and may lie
/// outside `[0, resolution)`. The clipped ranges are what may be read or
/// written; the unclipped bounds keep the kernel mapping stable at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRect {
    pub start_x: i64,
    pub start_z: i64,
    pub end_x: i64,
    pub end_z: i64,
    pub resolution: usize,
}

impl GridRect {
    /// Unclipped footprint width in cells
    pub fn expected_width(&self) -> i64 {
        self.end_x.saturating_sub(self.start_x)
    }

    /// Unclipped footprint height in cells
    pub fn expected_height(&self) -> i64 {
        self.end_z.saturating_sub(self.start_z)
    }

    /// Cells cut off the low-x edge
    pub fn clip_x(&self) -> i64 {
        self.start_x.saturating_neg().max(0)
    }

    /// Cells cut off the low-z edge
    pub fn clip_z(&self) -> i64 {
        self.start_z.saturating_neg().max(0)
    }

    /// Grid columns inside the field
    pub fn clipped_x(&self) -> Range<usize> {
        clip_axis(self.start_x, self.end_x, self.resolution)
    }

    /// Grid rows inside the field
    pub fn clipped_z(&self) -> Range<usize> {
        clip_axis(self.start_z, self.end_z, self.resolution)
    }

    pub fn clipped_width(&self) -> usize {
        self.clipped_x().len()
    }

    pub fn clipped_height(&self) -> usize {
        self.clipped_z().len()
    }

    /// True when no cell of the footprint lies inside the field
    pub fn is_empty(&self) -> bool {
        self.clipped_x().is_empty() || self.clipped_z().is_empty()
    }
}

fn clip_axis(start: i64, end: i64, resolution: usize) -> Range<usize> {
    let lo = start.max(0);
    let hi = end.min(resolution as i64);
    if hi <= lo {
        0..0
    } else {
        lo as usize..hi as usize
    }
}

/// Converts a brush at a world position into grid rectangles.
///
/// Height, alpha and detail grids each have their own resolution, so every
/// stroke maps its footprint once per target field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    /// Terrain extent on the X and Z axes
    world_size: Vec2,
}

impl CoordinateMapper {
    pub fn new(world_size: Vec2) -> Self {
        Self { world_size }
    }

    pub fn world_size(&self) -> Vec2 {
        self.world_size
    }

    /// Map a brush of radius `area` centered at world `(x, z)` onto a grid
    /// of `resolution` cells per side.
    pub fn footprint(&self, x: f32, z: f32, area: f32, resolution: usize) -> GridRect {
        let r = resolution as f32;
        // Float-to-int `as` saturates, so huge radii pin to the i64 range
        let to_grid = |coord: f32, size: f32| (coord * r / size).floor() as i64;

        GridRect {
            start_x: to_grid(x - area, self.world_size.x),
            start_z: to_grid(z - area, self.world_size.y),
            end_x: to_grid(x + area, self.world_size.x),
            end_z: to_grid(z + area, self.world_size.y),
            resolution,
        }
    }

    /// World position of a grid cell's origin
    pub fn cell_to_world(&self, gx: usize, gz: usize, resolution: usize) -> (f32, f32) {
        let r = resolution as f32;
        (
            gx as f32 * self.world_size.x / r,
            gz as f32 * self.world_size.y / r,
        )
    }

    /// Nearest grid cell for a world position, clamped into the grid
    pub fn world_to_cell(&self, x: f32, z: f32, resolution: usize) -> (usize, usize) {
        let r = resolution as f32;
        let max = resolution.saturating_sub(1) as f32;
        (
            (x * r / self.world_size.x).floor().clamp(0.0, max) as usize,
            (z * r / self.world_size.y).floor().clamp(0.0, max) as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(Vec2::new(100.0, 100.0))
    }

    #[test]
    fn test_interior_footprint() {
        let rect = mapper().footprint(50.0, 50.0, 5.0, 100);

        assert_eq!((rect.start_x, rect.end_x), (45, 55));
        assert_eq!((rect.start_z, rect.end_z), (45, 55));
        assert_eq!(rect.clipped_x(), 45..55);
        assert_eq!(rect.expected_width(), 10);
        assert_eq!(rect.clip_x(), 0);
    }

    #[test]
    fn test_edge_footprint_is_clipped() {
        let rect = mapper().footprint(2.0, 98.0, 5.0, 100);

        assert_eq!(rect.start_x, -3);
        assert_eq!(rect.clip_x(), 3);
        assert_eq!(rect.clipped_x(), 0..7);
        assert_eq!(rect.end_z, 103);
        assert_eq!(rect.clipped_z(), 93..100);
        // Logical size is unaffected by clipping
        assert_eq!(rect.expected_width(), 10);
        assert_eq!(rect.expected_height(), 10);
    }

    #[test]
    fn test_clipped_rect_always_inside_grid() {
        let m = mapper();
        for &res in &[17usize, 64, 129] {
            for step in -30..=30 {
                let x = step as f32 * 7.3;
                let z = 100.0 - step as f32 * 5.1;
                for &area in &[0.5f32, 3.0, 40.0, 250.0] {
                    let rect = m.footprint(x, z, area, res);
                    let xs = rect.clipped_x();
                    let zs = rect.clipped_z();
                    assert!(xs.end <= res && zs.end <= res);
                    assert!(xs.start <= xs.end && zs.start <= zs.end);
                }
            }
        }
    }

    #[test]
    fn test_empty_iff_outside() {
        let m = mapper();

        assert!(m.footprint(-20.0, 50.0, 5.0, 100).is_empty());
        assert!(m.footprint(50.0, 130.0, 5.0, 100).is_empty());
        assert!(!m.footprint(-2.0, 50.0, 5.0, 100).is_empty());
        assert!(!m.footprint(101.0, 101.0, 5.0, 100).is_empty());
    }

    #[test]
    fn test_resolutions_are_independent() {
        let m = mapper();
        let height = m.footprint(50.0, 50.0, 10.0, 513);
        let detail = m.footprint(50.0, 50.0, 10.0, 64);

        assert_eq!(height.expected_width(), 102);
        assert_eq!(detail.expected_width(), 13);
    }

    #[test]
    fn test_huge_radius_covers_grid() {
        let m = mapper();
        let rect = m.footprint(50.0, 50.0, 1.0e10, 257);

        assert_eq!(rect.clipped_x(), 0..257);
        assert_eq!(rect.clipped_z(), 0..257);
        assert!(rect.expected_width() > 0);
        assert!(rect.clip_x() > 0);

        let pinned = m.footprint(0.0, 0.0, f32::MAX, 64);
        assert_eq!(pinned.clipped_x(), 0..64);
        assert_eq!(pinned.expected_width(), i64::MAX);
        assert_eq!(pinned.clip_z(), i64::MAX);
    }

    #[test]
    fn test_world_cell_roundtrip() {
        let m = mapper();
        let (wx, wz) = m.cell_to_world(25, 75, 100);
        assert_eq!((wx, wz), (25.0, 75.0));
        assert_eq!(m.world_to_cell(wx + 0.5, wz + 0.5, 100), (25, 75));
        assert_eq!(m.world_to_cell(-10.0, 1000.0, 100), (0, 99));
    }
}
