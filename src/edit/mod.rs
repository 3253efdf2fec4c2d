//! Brush-driven terrain editing
//!
//! [`TerrainFieldEditor`] consumes one [`TickInput`] per frame and applies the
//! active mode's rule to the bound terrain. Undo history and gameplay
//! occupancy are reached through the [`UndoCoordinator`] and
//! [`OccupancyGridBridge`] traits.

pub mod config;
pub mod session;
pub mod stroke;
pub mod rules;
pub mod editor;
pub mod undo;
pub mod occupancy;
pub mod readiness;

// Re-exports
pub use config::EditorConfig;
pub use session::{pointing_height_label, EditMode, EditSessionState, HeightTool};
pub use stroke::{BrushPreview, PointerHit, PreviewStyle, TickInput, TickOutcome};
pub use editor::TerrainFieldEditor;
pub use undo::{EditKind, UndoCoordinator, UndoSnapshot, UndoStack, STROKE_START_OFFSET};
pub use occupancy::{NoOccupancy, OccupancyGridBridge};
pub use readiness::ReadinessGate;
