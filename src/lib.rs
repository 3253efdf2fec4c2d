//! Terrasculpt - brush-based heightmap, splat and detail editing

pub mod core;
pub mod brush;
pub mod terrain;
pub mod edit;
pub mod storage;
