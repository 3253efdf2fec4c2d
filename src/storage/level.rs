//! Terrain level persistence
//!
//! File layout: `TSLV` magic, `u32` format version, then an LZ4-compressed
//! rkyv archive of every field.

use std::path::Path;

use rkyv::{Archive, Deserialize, Serialize};

use super::compression;
use crate::core::{Error, Result, Vec3};
use crate::terrain::{AlphaField, DetailField, HeightField, TerrainData};

const MAGIC: &[u8; 4] = b"TSLV";
const VERSION: u32 = 1;
const HEADER_LEN: usize = 8;

/// Serializable terrain snapshot
#[derive(Archive, Deserialize, Serialize)]
struct TerrainArchive {
    size: [f32; 3],
    heightmap_resolution: u32,
    heights: Vec<f32>,
    alphamap_resolution: u32,
    alphamap_layers: u32,
    weights: Vec<f32>,
    detail_resolution: u32,
    details: Vec<Vec<u8>>,
}

impl TerrainArchive {
    fn capture(terrain: &TerrainData) -> Self {
        let desc = terrain.desc();
        Self {
            size: desc.size,
            heightmap_resolution: desc.heightmap_resolution as u32,
            heights: terrain.height().values().to_vec(),
            alphamap_resolution: desc.alphamap_resolution as u32,
            alphamap_layers: desc.alphamap_layers as u32,
            weights: terrain.alpha().weights().to_vec(),
            detail_resolution: desc.detail_resolution as u32,
            details: terrain.details().iter().map(|d| d.values().to_vec()).collect(),
        }
    }

    fn into_terrain(self) -> Result<TerrainData> {
        let height = HeightField::from_values(self.heightmap_resolution as usize, self.heights)?;
        let alpha = AlphaField::from_weights(
            self.alphamap_resolution as usize,
            self.alphamap_layers as usize,
            self.weights,
        )?;
        let details = self
            .details
            .into_iter()
            .map(|values| DetailField::from_values(self.detail_resolution as usize, values))
            .collect::<Result<Vec<_>>>()?;

        TerrainData::from_fields(Vec3::from_array(self.size), height, alpha, details)
    }
}

/// Serialize a terrain to bytes
pub fn encode_terrain(terrain: &TerrainData) -> Result<Vec<u8>> {
    let archive = TerrainArchive::capture(terrain);
    let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&archive)
        .map_err(|e| Error::Decode(format!("terrain archive failed: {}", e)))?;

    let packed = compression::compress(&bytes);
    let mut out = Vec::with_capacity(HEADER_LEN + packed.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&packed);
    Ok(out)
}

/// Deserialize a terrain written by [`encode_terrain`]
pub fn decode_terrain(data: &[u8]) -> Result<TerrainData> {
    if data.len() < HEADER_LEN || &data[..4] != MAGIC {
        return Err(Error::Decode("invalid terrain magic bytes".to_string()));
    }
    let version = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    if version != VERSION {
        return Err(Error::Decode(format!(
            "unsupported terrain version: expected {}, got {}",
            VERSION, version
        )));
    }

    let decompressed = compression::decompress(&data[HEADER_LEN..])?;
    // rkyv needs the archive aligned; a plain Vec<u8> gives no guarantee
    let mut aligned = rkyv::util::AlignedVec::<16>::with_capacity(decompressed.len());
    aligned.extend_from_slice(&decompressed);

    let archived = rkyv::access::<ArchivedTerrainArchive, rkyv::rancor::Error>(&aligned)
        .map_err(|e| Error::Decode(e.to_string()))?;
    let archive: TerrainArchive = rkyv::deserialize::<TerrainArchive, rkyv::rancor::Error>(archived)
        .map_err(|e| Error::Decode(e.to_string()))?;

    archive.into_terrain()
}

/// Write a terrain to disk, creating parent directories
pub fn save_terrain(path: impl AsRef<Path>, terrain: &TerrainData) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let bytes = encode_terrain(terrain)?;
    std::fs::write(path, &bytes)?;
    log::info!("Saved terrain to {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Read a terrain from disk
pub fn load_terrain(path: impl AsRef<Path>) -> Result<TerrainData> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let terrain = decode_terrain(&bytes)?;
    log::info!("Loaded terrain from {}", path.display());
    Ok(terrain)
}
