//! Stroke-start snapshots and the undo stack that stores them
//!
//! The editor hands a full-resolution copy of the affected field to an
//! [`UndoCoordinator`] once per stroke. [`UndoStack`] is the in-crate
//! coordinator: payloads are kept compressed and restored whole.

use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::storage::compression;
use crate::terrain::{SnapshotField, TerrainData};

/// Offset passed with every stroke snapshot.
///
/// Snapshots always cover the whole field, so this is a fixed marker; the
/// parameter is kept for region-based snapshots.
pub const STROKE_START_OFFSET: usize = 0;

/// Which field a snapshot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditKind {
    /// Height field
    TerrainEdit,
    /// Alpha (splat weight) field
    TerrainPaint,
}

/// Receives one whole-field snapshot at the start of every stroke
pub trait UndoCoordinator {
    fn snapshot(&mut self, kind: EditKind, bytes: Vec<u8>, offset: usize);
}

/// An uncompressed snapshot as handed over by the editor
#[derive(Debug, Clone, PartialEq)]
pub struct UndoSnapshot {
    pub kind: EditKind,
    pub payload: Vec<u8>,
    pub offset: usize,
}

/// Collect snapshots verbatim, for hosts with their own history
impl UndoCoordinator for Vec<UndoSnapshot> {
    fn snapshot(&mut self, kind: EditKind, bytes: Vec<u8>, offset: usize) {
        self.push(UndoSnapshot { kind, payload: bytes, offset });
    }
}

#[derive(Debug, Clone)]
struct StoredSnapshot {
    kind: EditKind,
    compressed: Vec<u8>,
    offset: usize,
}

impl StoredSnapshot {
    fn capture(kind: EditKind, bytes: &[u8], offset: usize) -> Self {
        Self {
            kind,
            compressed: compression::compress(bytes),
            offset,
        }
    }
}

fn field_mut(terrain: &mut TerrainData, kind: EditKind) -> &mut dyn SnapshotField {
    match kind {
        EditKind::TerrainEdit => terrain.height_mut() as &mut dyn SnapshotField,
        EditKind::TerrainPaint => terrain.alpha_mut() as &mut dyn SnapshotField,
    }
}

/// Bounded snapshot history with redo.
pub struct UndoStack {
    /// Oldest first
    past: Vec<StoredSnapshot>,
    /// Most recently undone last
    future: Vec<StoredSnapshot>,
    capacity: usize,
}

impl UndoStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Restore the most recent snapshot into `terrain`.
    ///
    /// The field's current state becomes the redo entry. Returns the kind of
    /// field restored, or `None` when there is nothing to undo.
    pub fn undo(&mut self, terrain: &mut TerrainData) -> Result<Option<EditKind>> {
        let Some(entry) = self.past.pop() else {
            return Ok(None);
        };
        match Self::swap_into(terrain, &entry) {
            Ok(current) => {
                log::info!("Undo {:?}", entry.kind);
                self.future.push(current);
                Ok(Some(entry.kind))
            }
            Err(e) => {
                self.past.push(entry);
                Err(e)
            }
        }
    }

    /// Re-apply the most recently undone snapshot
    pub fn redo(&mut self, terrain: &mut TerrainData) -> Result<Option<EditKind>> {
        let Some(entry) = self.future.pop() else {
            return Ok(None);
        };
        match Self::swap_into(terrain, &entry) {
            Ok(current) => {
                log::info!("Redo {:?}", entry.kind);
                self.past.push(current);
                Ok(Some(entry.kind))
            }
            Err(e) => {
                self.future.push(entry);
                Err(e)
            }
        }
    }

    /// Restore `entry`, returning a snapshot of what it replaced
    fn swap_into(terrain: &mut TerrainData, entry: &StoredSnapshot) -> Result<StoredSnapshot> {
        let payload = compression::decompress(&entry.compressed)?;
        let field = field_mut(terrain, entry.kind);
        let current = StoredSnapshot::capture(entry.kind, &field.snapshot_bytes(), entry.offset);
        field.restore_bytes(&payload)?;
        Ok(current)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.past.len()
    }

    pub fn redo_count(&self) -> usize {
        self.future.len()
    }

    /// Compressed bytes held across both stacks
    pub fn memory_bytes(&self) -> usize {
        self.past
            .iter()
            .chain(self.future.iter())
            .map(|s| s.compressed.len())
            .sum()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

impl UndoCoordinator for UndoStack {
    fn snapshot(&mut self, kind: EditKind, bytes: Vec<u8>, offset: usize) {
        let entry = StoredSnapshot::capture(kind, &bytes, offset);
        log::debug!(
            "Undo snapshot {:?}: {} bytes ({} compressed)",
            kind,
            bytes.len(),
            entry.compressed.len()
        );

        self.future.clear();
        self.past.push(entry);
        if self.past.len() > self.capacity {
            let excess = self.past.len() - self.capacity;
            self.past.drain(..excess);
        }
    }
}
