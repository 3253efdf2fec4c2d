//! Payload compression and terrain persistence

pub mod compression;
pub mod level;

pub use compression::{compress, decompress};
pub use level::{decode_terrain, encode_terrain, load_terrain, save_terrain};
