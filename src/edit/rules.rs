//! Per-mode field update rules
//!
//! Each rule maps the brush onto its target field's grid, resamples the
//! kernel over the clipped rectangle and mutates cells in place. Cells whose
//! influence is at or below the skip threshold are never touched. Every rule
//! returns the number of cells it wrote.

use rand::Rng;

use super::config::EditorConfig;
use super::occupancy::OccupancyGridBridge;
use super::session::HeightTool;
use super::stroke::StrokeContext;
use crate::brush::{BrushKernel, CoordinateMapper, KernelResampler};
use crate::terrain::{AlphaField, DetailField, HeightField};

/// Raise/lower, smooth or flatten the height field.
///
/// Every cell with influence also evicts its gameplay occupant, including
/// smooth border cells that are not written.
pub fn apply_height_stroke(
    field: &mut HeightField,
    mapper: &CoordinateMapper,
    kernel: &BrushKernel,
    ctx: &StrokeContext,
    config: &EditorConfig,
    occupancy: &mut dyn OccupancyGridBridge,
) -> usize {
    let resolution = field.resolution();
    let rect = mapper.footprint(ctx.point.x, ctx.point.z, ctx.area, resolution);
    if rect.is_empty() {
        return 0;
    }
    log::trace!("Height stroke {:?} over {:?}", ctx.tool, rect);

    let sampler = KernelResampler::new(kernel, &rect, ctx.strength);
    let xs = rect.clipped_x();
    let zs = rect.clipped_z();
    let (width, height) = (xs.len(), zs.len());
    let mut modified = 0;

    for j in 0..height {
        for i in 0..width {
            let influence = sampler.influence(i, j);
            if influence <= config.skip_threshold {
                continue;
            }

            let gx = xs.start + i;
            let gz = zs.start + j;
            let (wx, wz) = mapper.cell_to_world(gx, gz, resolution);
            let (ox, oz) = occupancy.sample(wx, wz);
            occupancy.evict(ox, oz);

            let current = field.get(gx, gz);
            let next = match ctx.tool {
                HeightTool::RaiseLower => Some(
                    current + influence * ctx.sign * ctx.strength / config.raise_divisor * ctx.dt,
                ),
                HeightTool::FlattenByValue => {
                    (influence > config.flatten_threshold).then_some(ctx.flatten_target)
                }
                HeightTool::FlattenByHeight => {
                    (influence > config.flatten_threshold).then_some(ctx.reference_height)
                }
                HeightTool::Smooth => {
                    if i == 0 || i == width - 1 || j == 0 || j == height - 1 {
                        None
                    } else {
                        let average = neighborhood_average(field, gx, gz);
                        let t = (influence * config.smooth_gain * ctx.strength).clamp(0.0, 1.0);
                        Some(current + (average - current) * t)
                    }
                }
            };

            if let Some(value) = next {
                field.set(gx, gz, value);
                modified += 1;
            }
        }
    }

    modified
}

/// Mean of the 3x3 block around an interior cell, read in place
fn neighborhood_average(field: &HeightField, gx: usize, gz: usize) -> f32 {
    let mut sum = 0.0;
    for z in gz - 1..=gz + 1 {
        for x in gx - 1..=gx + 1 {
            sum += field.get(x, z);
        }
    }
    sum / 9.0
}

/// Grow the selected texture layer and decay all others toward zero.
///
/// Weights are clamped per layer; cells are not renormalized.
pub fn apply_paint_stroke(
    alpha: &mut AlphaField,
    mapper: &CoordinateMapper,
    kernel: &BrushKernel,
    ctx: &StrokeContext,
    config: &EditorConfig,
) -> usize {
    if ctx.selected_layer >= alpha.layers() {
        return 0;
    }
    let rect = mapper.footprint(ctx.point.x, ctx.point.z, ctx.area, alpha.resolution());
    if rect.is_empty() {
        return 0;
    }
    log::trace!("Paint stroke layer {} over {:?}", ctx.selected_layer, rect);

    let sampler = KernelResampler::new(kernel, &rect, ctx.strength);
    let xs = rect.clipped_x();
    let zs = rect.clipped_z();
    let mut modified = 0;

    for (j, gz) in zs.enumerate() {
        for (i, gx) in xs.clone().enumerate() {
            let influence = sampler.influence(i, j);
            if influence <= config.skip_threshold {
                continue;
            }

            for (layer, weight) in alpha.cell_mut(gx, gz).iter_mut().enumerate() {
                let next = if layer == ctx.selected_layer {
                    *weight + influence
                } else {
                    *weight - *weight * influence
                };
                *weight = next.clamp(0.0, 1.0);
            }
            modified += 1;
        }
    }

    modified
}

/// Overwrite detail density: each touched cell becomes 1 with probability
/// `strength`, else 0.
pub fn apply_detail_stroke<R: Rng + ?Sized>(
    detail: &mut DetailField,
    mapper: &CoordinateMapper,
    kernel: &BrushKernel,
    ctx: &StrokeContext,
    config: &EditorConfig,
    rng: &mut R,
) -> usize {
    let rect = mapper.footprint(ctx.point.x, ctx.point.z, ctx.area, detail.resolution());
    if rect.is_empty() {
        return 0;
    }
    log::trace!("Detail stroke over {:?}", rect);

    let sampler = KernelResampler::new(kernel, &rect, ctx.strength);
    let xs = rect.clipped_x();
    let zs = rect.clipped_z();
    let mut modified = 0;

    for (j, gz) in zs.enumerate() {
        for (i, gx) in xs.clone().enumerate() {
            if sampler.influence(i, j) <= config.skip_threshold {
                continue;
            }
            detail.set(gx, gz, rng.r#gen::<f32>() < ctx.strength);
            modified += 1;
        }
    }

    modified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Vec2, Vec3};
    use crate::edit::occupancy::NoOccupancy;
    use crate::edit::session::EditMode;
    use rand::{SeedableRng, rngs::SmallRng};

    /// Records every eviction
    #[derive(Default)]
    struct RecordingOccupancy {
        evicted: Vec<(i32, i32)>,
    }

    impl OccupancyGridBridge for RecordingOccupancy {
        fn sample(&self, world_x: f32, world_z: f32) -> (i32, i32) {
            (world_x.floor() as i32, world_z.floor() as i32)
        }

        fn evict(&mut self, grid_x: i32, grid_y: i32) {
            self.evicted.push((grid_x, grid_y));
        }
    }

    fn ctx(tool: HeightTool, point: Vec3, area: f32, strength: f32) -> StrokeContext {
        StrokeContext {
            point,
            area,
            strength,
            sign: 1.0,
            mode: EditMode::EditTerrain,
            tool,
            selected_layer: 0,
            detail_layer: 0,
            flatten_target: 0.0,
            reference_height: 0.0,
            dt: 0.1,
        }
    }

    fn mapper(size: f32) -> CoordinateMapper {
        CoordinateMapper::new(Vec2::splat(size))
    }

    fn full_kernel() -> BrushKernel {
        BrushKernel::uniform(8, 8, 1.0).unwrap()
    }

    #[test]
    fn test_raise_is_frame_rate_independent() {
        let config = EditorConfig::default();
        let kernel = full_kernel();
        let m = mapper(32.0);
        let run = |dt: f32, ticks: usize| {
            let mut field = HeightField::new(32).unwrap();
            field.fill(0.2);
            let mut c = ctx(HeightTool::RaiseLower, Vec3::new(16.0, 0.0, 16.0), 4.0, 0.5);
            c.dt = dt;
            for _ in 0..ticks {
                apply_height_stroke(&mut field, &m, &kernel, &c, &config, &mut NoOccupancy);
            }
            field.get(16, 16)
        };

        let fine = run(0.01, 100);
        let coarse = run(0.05, 20);
        assert!((fine - coarse).abs() < 1e-4, "{} vs {}", fine, coarse);
        // influence 0.5 * strength 0.5 / 2 per second, for one second
        assert!((fine - 0.325).abs() < 1e-4);
    }

    #[test]
    fn test_lower_with_negative_sign() {
        let config = EditorConfig::default();
        let mut field = HeightField::new(16).unwrap();
        field.fill(0.5);
        let mut c = ctx(HeightTool::RaiseLower, Vec3::new(8.0, 0.0, 8.0), 2.0, 1.0);
        c.sign = -1.0;
        c.dt = 0.2;

        let m = mapper(16.0);
        apply_height_stroke(&mut field, &m, &full_kernel(), &c, &config, &mut NoOccupancy);
        assert!((field.get(8, 8) - 0.4).abs() < 1e-6);
        assert_eq!(field.get(0, 0), 0.5);
    }

    #[test]
    fn test_flatten_by_value_respects_threshold() {
        let config = EditorConfig::default();
        let m = mapper(16.0);
        let kernel = full_kernel();
        let mut field = HeightField::new(16).unwrap();
        field.fill(0.1);

        let mut c = ctx(HeightTool::FlattenByValue, Vec3::new(8.0, 0.0, 8.0), 3.0, 0.4);
        c.flatten_target = 0.7;
        // 1.0 * 0.4 is not above 0.5: nothing happens
        let written = apply_height_stroke(&mut field, &m, &kernel, &c, &config, &mut NoOccupancy);
        assert_eq!(written, 0);
        assert_eq!(field.get(8, 8), 0.1);

        c.strength = 0.8;
        let written = apply_height_stroke(&mut field, &m, &kernel, &c, &config, &mut NoOccupancy);
        assert_eq!(written, 36);
        assert_eq!(field.get(8, 8), 0.7);
    }

    #[test]
    fn test_flatten_by_height_uses_reference() {
        let config = EditorConfig::default();
        let mut field = HeightField::new(16).unwrap();
        let mut c = ctx(HeightTool::FlattenByHeight, Vec3::new(8.0, 0.0, 8.0), 2.0, 1.0);
        c.reference_height = 0.33;

        let m = mapper(16.0);
        apply_height_stroke(&mut field, &m, &full_kernel(), &c, &config, &mut NoOccupancy);
        assert_eq!(field.get(7, 7), 0.33);
        assert_eq!(field.get(12, 12), 0.0);
    }

    #[test]
    fn test_smooth_converges_and_keeps_border() {
        let config = EditorConfig::default();
        let m = mapper(32.0);
        let kernel = full_kernel();

        let mut field = HeightField::new(32).unwrap();
        for z in 0..32 {
            for x in 0..32 {
                field.set(x, z, 0.2 + ((x * 7 + z * 13) % 5) as f32 * 0.01);
            }
        }
        field.set(16, 16, 1.0);
        let before = field.clone();

        let c = ctx(HeightTool::Smooth, Vec3::new(16.0, 0.0, 16.0), 4.0, 0.25);
        let rect = m.footprint(16.0, 16.0, 4.0, 32);
        for _ in 0..100 {
            apply_height_stroke(&mut field, &m, &kernel, &c, &config, &mut NoOccupancy);
        }

        let spike = field.get(16, 16);
        let gap = (spike - neighborhood_average(&field, 16, 16)).abs();
        assert!(spike < 0.5, "spike should fall, got {}", spike);
        assert!(gap < 0.05, "spike should approach its neighborhood, gap {}", gap);

        let (xs, zs) = (rect.clipped_x(), rect.clipped_z());
        for z in zs.clone() {
            for x in xs.clone() {
                let border = x == xs.start || x == xs.end - 1 || z == zs.start || z == zs.end - 1;
                if border {
                    assert_eq!(field.get(x, z), before.get(x, z), "border ({}, {}) changed", x, z);
                }
            }
        }
        // Outside the brush nothing moves
        assert_eq!(field.get(2, 2), before.get(2, 2));
    }

    #[test]
    fn test_height_stroke_evicts_occupants() {
        let config = EditorConfig::default();
        let mut field = HeightField::new(16).unwrap();
        let mut occupancy = RecordingOccupancy::default();
        let c = ctx(HeightTool::RaiseLower, Vec3::new(8.0, 0.0, 8.0), 1.0, 1.0);

        apply_height_stroke(&mut field, &mapper(16.0), &full_kernel(), &c, &config, &mut occupancy);

        assert_eq!(occupancy.evicted.len(), 4);
        assert!(occupancy.evicted.contains(&(7, 7)));
        assert!(occupancy.evicted.contains(&(8, 8)));
    }

    #[test]
    fn test_zero_influence_skips_everything() {
        let config = EditorConfig::default();
        let kernel = BrushKernel::uniform(4, 4, 0.0).unwrap();
        let mut field = HeightField::new(16).unwrap();
        let mut occupancy = RecordingOccupancy::default();
        let c = ctx(HeightTool::FlattenByValue, Vec3::new(8.0, 0.0, 8.0), 3.0, 1.0);

        let m = mapper(16.0);
        let written = apply_height_stroke(&mut field, &m, &kernel, &c, &config, &mut occupancy);
        assert_eq!(written, 0);
        assert!(occupancy.evicted.is_empty());
    }

    #[test]
    fn test_stroke_off_terrain_is_noop() {
        let config = EditorConfig::default();
        let mut field = HeightField::new(16).unwrap();
        let c = ctx(HeightTool::RaiseLower, Vec3::new(-50.0, 0.0, 8.0), 3.0, 1.0);

        let (m, kernel) = (mapper(16.0), full_kernel());
        let written = apply_height_stroke(&mut field, &m, &kernel, &c, &config, &mut NoOccupancy);
        assert_eq!(written, 0);
    }

    #[test]
    fn test_paint_layer_trend() {
        let config = EditorConfig::default();
        let m = mapper(16.0);
        let mut alpha = AlphaField::new(16, 3).unwrap();
        for z in 0..16 {
            for x in 0..16 {
                alpha.set(x, z, 1, 0.6);
            }
        }

        let mut c = ctx(HeightTool::RaiseLower, Vec3::new(8.0, 0.0, 8.0), 2.0, 0.1);
        c.mode = EditMode::PaintTerrain;
        c.selected_layer = 2;

        let mut previous = alpha.cell(8, 8).to_vec();
        for _ in 0..200 {
            apply_paint_stroke(&mut alpha, &m, &full_kernel(), &c, &config);
            let now = alpha.cell(8, 8).to_vec();
            assert!(now[2] >= previous[2]);
            assert!(now[0] <= previous[0] && now[0] >= 0.0);
            assert!(now[1] <= previous[1] && now[1] >= 0.0);
            previous = now;
        }

        assert_eq!(previous[2], 1.0);
        assert!(previous[0] < 1e-6);
        assert!(previous[1] < 1e-6);
        // Untouched cell keeps its mix
        assert_eq!(alpha.cell(0, 0), &[1.0, 0.6, 0.0]);
    }

    #[test]
    fn test_paint_strong_brush_never_negative() {
        let config = EditorConfig::default();
        let mut alpha = AlphaField::new(8, 2).unwrap();
        let mut c = ctx(HeightTool::RaiseLower, Vec3::new(4.0, 0.0, 4.0), 2.0, 3.0);
        c.selected_layer = 1;

        apply_paint_stroke(&mut alpha, &mapper(8.0), &full_kernel(), &c, &config);
        assert_eq!(alpha.cell(4, 4), &[0.0, 1.0]);
    }

    #[test]
    fn test_paint_out_of_range_layer() {
        let config = EditorConfig::default();
        let mut alpha = AlphaField::new(8, 2).unwrap();
        let mut c = ctx(HeightTool::RaiseLower, Vec3::new(4.0, 0.0, 4.0), 2.0, 1.0);
        c.selected_layer = 5;

        assert_eq!(apply_paint_stroke(&mut alpha, &mapper(8.0), &full_kernel(), &c, &config), 0);
        assert_eq!(alpha.cell(4, 4), &[1.0, 0.0]);
    }

    #[test]
    fn test_detail_fraction_matches_strength() {
        let config = EditorConfig::default();
        let mut detail = DetailField::new(256).unwrap();
        let mut rng = SmallRng::seed_from_u64(1234);
        let c = ctx(HeightTool::RaiseLower, Vec3::new(128.0, 0.0, 128.0), 200.0, 0.3);

        let (m, kernel) = (mapper(256.0), full_kernel());
        let written = apply_detail_stroke(&mut detail, &m, &kernel, &c, &config, &mut rng);
        assert_eq!(written, 256 * 256);

        let fraction = detail.count() as f32 / written as f32;
        assert!((fraction - 0.3).abs() < 0.02, "fraction {}", fraction);
    }

    #[test]
    fn test_detail_overwrites() {
        let config = EditorConfig::default();
        let mut detail = DetailField::from_values(8, vec![1; 64]).unwrap();
        let mut rng = SmallRng::seed_from_u64(5);
        let c = ctx(HeightTool::RaiseLower, Vec3::new(4.0, 0.0, 4.0), 2.0, 0.01);

        apply_detail_stroke(&mut detail, &mapper(8.0), &full_kernel(), &c, &config, &mut rng);
        // Strength 0.01 clears nearly the whole footprint rather than adding to it
        assert!(detail.count() <= 64 - 14);
        assert!(detail.get(0, 0));
    }
}
