//! Editable terrain fields

pub mod field;
pub use field::{AlphaField, DetailField, HeightField, SnapshotField};

pub mod data;
pub use data::{TerrainData, TerrainDesc};

pub mod radar;
pub use radar::{render_radar, DEFAULT_RADAR_PALETTE};
