//! Radar minimap rendering from splat weights

use image::{Rgba, RgbaImage};

use super::field::AlphaField;

/// Colors per texture layer, in layer order
pub const DEFAULT_RADAR_PALETTE: [[u8; 4]; 8] = [
    [0, 255, 0, 255],     // grass
    [100, 100, 100, 255],
    [117, 71, 14, 255],
    [227, 204, 0, 255],
    [255, 255, 0, 255],
    [120, 120, 120, 255],
    [180, 180, 180, 255],
    [125, 125, 125, 255],
];

/// Render one pixel per alpha cell.
///
/// A pixel takes the color of the highest layer whose weight exceeds
/// `threshold`; cells with no such layer stay fully transparent. Pixel
/// `(x, y)` is cell `(x, z)`. Layers beyond the palette wrap around it.
pub fn render_radar(alpha: &AlphaField, palette: &[[u8; 4]], threshold: f32) -> RgbaImage {
    let resolution = alpha.resolution() as u32;
    let mut image = RgbaImage::new(resolution, resolution);
    if palette.is_empty() {
        return image;
    }

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let cell = alpha.cell(x as usize, y as usize);
        if let Some(layer) = (0..cell.len()).rev().find(|&l| cell[l] > threshold) {
            *pixel = Rgba(palette[layer % palette.len()]);
        }
    }

    image
}
