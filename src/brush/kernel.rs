//! Sampled brush influence field

use std::path::Path;

use image::DynamicImage;

use crate::core::{Error, Result};

/// A 2D grid of influence values in `[0, 1]`, stored row-major.
///
/// Built from one channel of a brush image. A kernel is never mutated after
/// construction; selecting another brush builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushKernel {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl BrushKernel {
    /// Create a kernel from raw row-major values.
    ///
    /// Values are clamped into `[0, 1]`; non-finite values are rejected.
    pub fn from_values(width: usize, height: usize, values: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidBrush(format!(
                "kernel must be non-empty, got {}x{}",
                width, height
            )));
        }
        if values.len() != width * height {
            return Err(Error::InvalidBrush(format!(
                "expected {} values for a {}x{} kernel, got {}",
                width * height,
                width,
                height,
                values.len()
            )));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(Error::InvalidBrush(format!("non-finite kernel value {}", bad)));
        }

        let values = values.into_iter().map(|v| v.clamp(0.0, 1.0)).collect();
        Ok(Self { width, height, values })
    }

    /// Build a kernel from the red channel of a brush image.
    ///
    /// Pixel `(x, y)` of the image becomes kernel cell `(x, y)`.
    pub fn from_image(image: &DynamicImage) -> Result<Self> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let values = rgba
            .pixels()
            .map(|pixel| pixel.0[0] as f32 / 255.0)
            .collect();

        Self::from_values(width as usize, height as usize, values)
    }

    /// Load a brush image from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)?;
        let kernel = Self::from_image(&image)?;
        log::info!(
            "Loaded brush kernel {}x{} from {}",
            kernel.width,
            kernel.height,
            path.display()
        );
        Ok(kernel)
    }

    /// Kernel with the same influence everywhere
    pub fn uniform(width: usize, height: usize, value: f32) -> Result<Self> {
        Self::from_values(width, height, vec![value; width * height])
    }

    /// Round brush with full influence inside `hardness` (fraction of the
    /// radius) and a linear falloff to zero at the edge.
    pub fn radial(size: usize, hardness: f32) -> Result<Self> {
        let hardness = hardness.clamp(0.0, 0.999);
        let center = (size as f32 - 1.0) * 0.5;
        let radius = size as f32 * 0.5;

        let mut values = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 - center;
                let dy = y as f32 - center;
                let d = (dx * dx + dy * dy).sqrt() / radius;
                let v = if d <= hardness {
                    1.0
                } else {
                    ((1.0 - d) / (1.0 - hardness)).max(0.0)
                };
                values.push(v);
            }
        }

        Self::from_values(size, size, values)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Influence at kernel cell `(x, y)`
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[y * self.width + x]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}
