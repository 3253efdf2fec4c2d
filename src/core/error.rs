//! Error types for the sculpting engine

use thiserror::Error;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid terrain: {0}")]
    InvalidTerrain(String),

    #[error("Invalid brush: {0}")]
    InvalidBrush(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Undo payload error: {0}")]
    UndoPayload(String),
}
