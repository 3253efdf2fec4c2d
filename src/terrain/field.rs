//! Grid-shaped terrain layers
//!
//! All fields are square and stored row-major as `[z][x]` (the alpha field
//! adds a trailing layer axis). Callers index with `(x, z)`.

use crate::core::{Error, Result};

/// Whole-field byte snapshots, used for undo payloads.
pub trait SnapshotField {
    /// Full-resolution copy of the field, row-major, native byte order
    fn snapshot_bytes(&self) -> Vec<u8>;

    /// Replace the field contents from a previous [`snapshot_bytes`](Self::snapshot_bytes)
    fn restore_bytes(&mut self, bytes: &[u8]) -> Result<()>;
}

fn check_resolution(resolution: usize, what: &str) -> Result<()> {
    if resolution == 0 {
        return Err(Error::InvalidTerrain(format!("{} resolution must be > 0", what)));
    }
    Ok(())
}

fn restore_f32(target: &mut [f32], bytes: &[u8], what: &str) -> Result<()> {
    let expected = std::mem::size_of_val(target);
    if bytes.len() != expected {
        return Err(Error::UndoPayload(format!(
            "{} snapshot is {} bytes, field needs {}",
            what,
            bytes.len(),
            expected
        )));
    }
    bytemuck::cast_slice_mut::<f32, u8>(target).copy_from_slice(bytes);
    Ok(())
}

/// Normalized elevation grid; world height is `value * vertical_scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    resolution: usize,
    values: Vec<f32>,
}

impl HeightField {
    /// Flat field at height 0
    pub fn new(resolution: usize) -> Result<Self> {
        check_resolution(resolution, "height")?;
        Ok(Self {
            resolution,
            values: vec![0.0; resolution * resolution],
        })
    }

    /// Field from row-major values; values are clamped into `[0, 1]`
    pub fn from_values(resolution: usize, values: Vec<f32>) -> Result<Self> {
        check_resolution(resolution, "height")?;
        if values.len() != resolution * resolution {
            return Err(Error::InvalidTerrain(format!(
                "height field {}x{} needs {} values, got {}",
                resolution,
                resolution,
                resolution * resolution,
                values.len()
            )));
        }
        Ok(Self {
            resolution,
            values: values.into_iter().map(|v| v.clamp(0.0, 1.0)).collect(),
        })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> f32 {
        self.values[z * self.resolution + x]
    }

    /// Write a height, clamped into `[0, 1]`
    #[inline]
    pub fn set(&mut self, x: usize, z: usize, value: f32) {
        self.values[z * self.resolution + x] = value.clamp(0.0, 1.0);
    }

    pub fn fill(&mut self, value: f32) {
        self.values.fill(value.clamp(0.0, 1.0));
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

impl SnapshotField for HeightField {
    fn snapshot_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.values).to_vec()
    }

    fn restore_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        restore_f32(&mut self.values, bytes, "height")
    }
}

/// Texture splat weights, `layers` floats per cell.
///
/// Weights are kept in `[0, 1]` individually; nothing forces a cell's
/// weights to sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaField {
    resolution: usize,
    layers: usize,
    weights: Vec<f32>,
}

impl AlphaField {
    /// Field with layer 0 fully weighted everywhere
    pub fn new(resolution: usize, layers: usize) -> Result<Self> {
        check_resolution(resolution, "alpha")?;
        let mut weights = vec![0.0; resolution * resolution * layers];
        if layers > 0 {
            for cell in weights.chunks_exact_mut(layers) {
                cell[0] = 1.0;
            }
        }
        Ok(Self { resolution, layers, weights })
    }

    /// Field from `[z][x][layer]` weights; values are clamped into `[0, 1]`
    pub fn from_weights(resolution: usize, layers: usize, weights: Vec<f32>) -> Result<Self> {
        check_resolution(resolution, "alpha")?;
        let expected = resolution * resolution * layers;
        if weights.len() != expected {
            return Err(Error::InvalidTerrain(format!(
                "alpha field {}x{}x{} needs {} weights, got {}",
                resolution,
                resolution,
                layers,
                expected,
                weights.len()
            )));
        }
        Ok(Self {
            resolution,
            layers,
            weights: weights.into_iter().map(|w| w.clamp(0.0, 1.0)).collect(),
        })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    #[inline]
    fn offset(&self, x: usize, z: usize) -> usize {
        (z * self.resolution + x) * self.layers
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize, layer: usize) -> f32 {
        self.weights[self.offset(x, z) + layer]
    }

    /// Write one weight, clamped into `[0, 1]`
    #[inline]
    pub fn set(&mut self, x: usize, z: usize, layer: usize, value: f32) {
        let offset = self.offset(x, z);
        self.weights[offset + layer] = value.clamp(0.0, 1.0);
    }

    /// All layer weights of one cell
    pub fn cell(&self, x: usize, z: usize) -> &[f32] {
        let offset = self.offset(x, z);
        &self.weights[offset..offset + self.layers]
    }

    pub fn cell_mut(&mut self, x: usize, z: usize) -> &mut [f32] {
        let offset = self.offset(x, z);
        &mut self.weights[offset..offset + self.layers]
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

impl SnapshotField for AlphaField {
    fn snapshot_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.weights).to_vec()
    }

    fn restore_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        restore_f32(&mut self.weights, bytes, "alpha")
    }
}

/// Binary density grid for one detail (vegetation) layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailField {
    resolution: usize,
    values: Vec<u8>,
}

impl DetailField {
    pub fn new(resolution: usize) -> Result<Self> {
        check_resolution(resolution, "detail")?;
        Ok(Self {
            resolution,
            values: vec![0; resolution * resolution],
        })
    }

    /// Field from row-major densities; any nonzero value is stored as 1
    pub fn from_values(resolution: usize, values: Vec<u8>) -> Result<Self> {
        check_resolution(resolution, "detail")?;
        if values.len() != resolution * resolution {
            return Err(Error::InvalidTerrain(format!(
                "detail field {}x{} needs {} values, got {}",
                resolution,
                resolution,
                resolution * resolution,
                values.len()
            )));
        }
        Ok(Self {
            resolution,
            values: values.into_iter().map(|v| (v != 0) as u8).collect(),
        })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> bool {
        self.values[z * self.resolution + x] != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, z: usize, present: bool) {
        self.values[z * self.resolution + x] = present as u8;
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Number of cells set to 1
    pub fn count(&self) -> usize {
        self.values.iter().filter(|&&v| v != 0).count()
    }
}

impl SnapshotField for DetailField {
    fn snapshot_bytes(&self) -> Vec<u8> {
        self.values.clone()
    }

    fn restore_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() != self.values.len() {
            return Err(Error::UndoPayload(format!(
                "detail snapshot is {} bytes, field needs {}",
                bytes.len(),
                self.values.len()
            )));
        }
        self.values.copy_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_set_clamps() {
        let mut field = HeightField::new(4).unwrap();
        field.set(1, 2, 1.7);
        field.set(2, 1, -0.3);

        assert_eq!(field.get(1, 2), 1.0);
        assert_eq!(field.get(2, 1), 0.0);
        // Row-major [z][x]
        assert_eq!(field.values()[2 * 4 + 1], 1.0);
    }

    #[test]
    fn test_zero_resolution_rejected() {
        assert!(HeightField::new(0).is_err());
        assert!(AlphaField::new(0, 4).is_err());
        assert!(DetailField::new(0).is_err());
    }

    #[test]
    fn test_from_values_length_checked() {
        assert!(HeightField::from_values(3, vec![0.0; 8]).is_err());
        assert!(AlphaField::from_weights(2, 3, vec![0.0; 11]).is_err());
        assert!(DetailField::from_values(2, vec![0; 3]).is_err());
    }

    #[test]
    fn test_alpha_defaults_to_first_layer() {
        let field = AlphaField::new(3, 4).unwrap();
        assert_eq!(field.cell(2, 2), &[1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_height_snapshot_restore() {
        let mut field = HeightField::new(8).unwrap();
        field.set(3, 3, 0.75);
        let snapshot = field.snapshot_bytes();
        assert_eq!(snapshot.len(), 8 * 8 * 4);

        field.fill(0.1);
        field.restore_bytes(&snapshot).unwrap();
        assert_eq!(field.get(3, 3), 0.75);
        assert_eq!(field.get(0, 0), 0.0);
    }

    #[test]
    fn test_restore_rejects_wrong_size() {
        let mut field = AlphaField::new(4, 2).unwrap();
        let other = AlphaField::new(5, 2).unwrap();
        assert!(matches!(
            field.restore_bytes(&other.snapshot_bytes()),
            Err(Error::UndoPayload(_))
        ));
    }

    #[test]
    fn test_detail_binary() {
        let mut field = DetailField::from_values(2, vec![0, 5, 1, 0]).unwrap();
        assert_eq!(field.values(), &[0, 1, 1, 0]);
        field.set(0, 0, true);
        assert_eq!(field.count(), 3);
        assert!(field.get(1, 0));
    }
}
