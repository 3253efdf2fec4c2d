//! Terrain data: the three editable fields plus world extents

use serde::{Deserialize, Serialize};

use super::field::{AlphaField, DetailField, HeightField};
use crate::brush::CoordinateMapper;
use crate::core::{Error, Result, Vec2, Vec3};

/// Dimensions of a terrain, as a host would configure it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainDesc {
    /// World extent: x width, y vertical scale, z depth
    pub size: [f32; 3],
    pub heightmap_resolution: usize,
    pub alphamap_resolution: usize,
    pub alphamap_layers: usize,
    pub detail_resolution: usize,
    pub detail_layers: usize,
}

impl Default for TerrainDesc {
    fn default() -> Self {
        Self {
            size: [200.0, 60.0, 200.0],
            heightmap_resolution: 257,
            alphamap_resolution: 256,
            alphamap_layers: 4,
            detail_resolution: 256,
            detail_layers: 1,
        }
    }
}

impl TerrainDesc {
    /// Reject descriptions no terrain can be built from
    pub fn validate(&self) -> Result<()> {
        if self.size.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(Error::InvalidTerrain(format!(
                "terrain size must be positive and finite, got {:?}",
                self.size
            )));
        }
        if self.heightmap_resolution == 0
            || self.alphamap_resolution == 0
            || self.detail_resolution == 0
        {
            return Err(Error::InvalidTerrain(
                "field resolutions must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Owned terrain fields. The editor borrows this mutably for the duration of
/// a tick; renderers and physics read it between ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainData {
    size: Vec3,
    height: HeightField,
    alpha: AlphaField,
    details: Vec<DetailField>,
}

impl TerrainData {
    /// Build a flat terrain painted with layer 0 and no details.
    ///
    /// Fails fast on an unusable description so misconfiguration never
    /// reaches the per-tick path.
    pub fn new(desc: &TerrainDesc) -> Result<Self> {
        desc.validate()?;

        let details = (0..desc.detail_layers)
            .map(|_| DetailField::new(desc.detail_resolution))
            .collect::<Result<Vec<_>>>()?;

        let terrain = Self {
            size: Vec3::from_array(desc.size),
            height: HeightField::new(desc.heightmap_resolution)?,
            alpha: AlphaField::new(desc.alphamap_resolution, desc.alphamap_layers)?,
            details,
        };

        log::info!(
            "Terrain bound: {:?} world, height {}², alpha {}²x{}, detail {}²x{}",
            desc.size,
            desc.heightmap_resolution,
            desc.alphamap_resolution,
            desc.alphamap_layers,
            desc.detail_resolution,
            desc.detail_layers
        );
        Ok(terrain)
    }

    /// Assemble a terrain from existing fields
    pub fn from_fields(
        size: Vec3,
        height: HeightField,
        alpha: AlphaField,
        details: Vec<DetailField>,
    ) -> Result<Self> {
        if size.to_array().iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(Error::InvalidTerrain(format!(
                "terrain size must be positive and finite, got {:?}",
                size
            )));
        }
        if let Some(first) = details.first() {
            if details.iter().any(|d| d.resolution() != first.resolution()) {
                return Err(Error::InvalidTerrain(
                    "detail layers must share one resolution".to_string(),
                ));
            }
        }
        Ok(Self { size, height, alpha, details })
    }

    /// Description matching this terrain's current shape
    pub fn desc(&self) -> TerrainDesc {
        TerrainDesc {
            size: self.size.to_array(),
            heightmap_resolution: self.height.resolution(),
            alphamap_resolution: self.alpha.resolution(),
            alphamap_layers: self.alpha.layers(),
            detail_resolution: self
                .details
                .first()
                .map(|d| d.resolution())
                .unwrap_or(0),
            detail_layers: self.details.len(),
        }
    }

    /// World extent (x, vertical scale, z)
    pub fn size(&self) -> Vec3 {
        self.size
    }

    pub fn vertical_scale(&self) -> f32 {
        self.size.y
    }

    /// Mapper for this terrain's horizontal extent
    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(Vec2::new(self.size.x, self.size.z))
    }

    pub fn height(&self) -> &HeightField {
        &self.height
    }

    pub fn height_mut(&mut self) -> &mut HeightField {
        &mut self.height
    }

    pub fn alpha(&self) -> &AlphaField {
        &self.alpha
    }

    pub fn alpha_mut(&mut self) -> &mut AlphaField {
        &mut self.alpha
    }

    pub fn detail_layer_count(&self) -> usize {
        self.details.len()
    }

    pub fn detail(&self, layer: usize) -> Option<&DetailField> {
        self.details.get(layer)
    }

    pub fn detail_mut(&mut self, layer: usize) -> Option<&mut DetailField> {
        self.details.get_mut(layer)
    }

    pub fn details(&self) -> &[DetailField] {
        &self.details
    }

    /// Normalized height of the cell under world `(x, z)`
    pub fn sample_height(&self, x: f32, z: f32) -> f32 {
        let (gx, gz) = self.mapper().world_to_cell(x, z, self.height.resolution());
        self.height.get(gx, gz)
    }

    /// World-space height under `(x, z)`
    pub fn sample_world_height(&self, x: f32, z: f32) -> f32 {
        self.sample_height(x, z) * self.size.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_desc() -> TerrainDesc {
        TerrainDesc {
            size: [64.0, 20.0, 32.0],
            heightmap_resolution: 65,
            alphamap_resolution: 32,
            alphamap_layers: 3,
            detail_resolution: 16,
            detail_layers: 2,
        }
    }

    #[test]
    fn test_new_terrain() {
        let terrain = TerrainData::new(&small_desc()).unwrap();

        assert_eq!(terrain.height().resolution(), 65);
        assert_eq!(terrain.alpha().layers(), 3);
        assert_eq!(terrain.detail_layer_count(), 2);
        assert_eq!(terrain.vertical_scale(), 20.0);
        assert_eq!(terrain.desc(), small_desc());
    }

    #[test]
    fn test_invalid_desc_fails_fast() {
        let mut desc = small_desc();
        desc.size[1] = 0.0;
        assert!(matches!(TerrainData::new(&desc), Err(Error::InvalidTerrain(_))));

        let mut desc = small_desc();
        desc.alphamap_resolution = 0;
        assert!(TerrainData::new(&desc).is_err());
    }

    #[test]
    fn test_sample_height() {
        let mut terrain = TerrainData::new(&small_desc()).unwrap();
        // x spans 64 world units over 65 cells, z spans 32 over 65
        let (gx, gz) = terrain.mapper().world_to_cell(10.0, 10.0, 65);
        terrain.height_mut().set(gx, gz, 0.5);

        assert_eq!(terrain.sample_height(10.0, 10.0), 0.5);
        assert_eq!(terrain.sample_world_height(10.0, 10.0), 10.0);
        assert_eq!(terrain.sample_height(50.0, 5.0), 0.0);
    }

    #[test]
    fn test_desc_json_defaults() {
        let desc: TerrainDesc = serde_json::from_str(r#"{ "alphamap_layers": 8 }"#).unwrap();
        assert_eq!(desc.alphamap_layers, 8);
        assert_eq!(desc.heightmap_resolution, TerrainDesc::default().heightmap_resolution);
    }
}
