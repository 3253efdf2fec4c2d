//! Per-tick stroke engine
//!
//! [`TerrainFieldEditor`] turns pointer input into field edits. A stroke
//! begins on the first held tick, snapshots the target field for undo,
//! captures the current brush kernel and ends when the button is released.

use std::sync::Arc;

use rand::{SeedableRng, rngs::SmallRng};

use super::config::EditorConfig;
use super::occupancy::OccupancyGridBridge;
use super::readiness::ReadinessGate;
use super::rules;
use super::session::{EditMode, EditSessionState, HeightTool};
use super::stroke::{
    ActiveStroke, BrushPreview, PreviewStyle, StrokeContext, TickInput, TickOutcome,
};
use super::undo::{EditKind, STROKE_START_OFFSET, UndoCoordinator};
use crate::brush::BrushKernel;
use crate::core::{Result, Vec3};
use crate::terrain::{SnapshotField, TerrainData};

/// Applies brush strokes to a bound [`TerrainData`]
pub struct TerrainFieldEditor {
    config: EditorConfig,
    session: EditSessionState,
    /// Brush for the next stroke
    kernel: Option<Arc<BrushKernel>>,
    stroke: Option<ActiveStroke>,
    enabled: bool,
    pointing_height: Option<f32>,
    rng: SmallRng,
}

impl TerrainFieldEditor {
    /// Create a disabled editor; enable it once the level is loaded
    pub fn new(config: EditorConfig) -> Result<Self> {
        config.validate()?;
        let session = EditSessionState::new(&config);
        let rng = SmallRng::seed_from_u64(config.detail_seed);
        Ok(Self {
            config,
            session,
            kernel: None,
            stroke: None,
            enabled: false,
            pointing_height: None,
            rng,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn session(&self) -> &EditSessionState {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditSessionState {
        &mut self.session
    }

    /// Replace the brush. A stroke in progress keeps the kernel it started with.
    pub fn set_brush(&mut self, kernel: BrushKernel) {
        log::info!("Brush set: {}x{}", kernel.width(), kernel.height());
        self.kernel = Some(Arc::new(kernel));
    }

    pub fn brush(&self) -> Option<&BrushKernel> {
        self.kernel.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled != self.enabled {
            log::debug!("Editor {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
        if !enabled {
            self.stroke = None;
        }
    }

    /// Enable editing once `gate` reports the level loaded. Returns whether
    /// the editor is enabled.
    pub fn enable_when_ready(&mut self, gate: &ReadinessGate) -> bool {
        if !self.enabled && gate.is_ready() {
            self.set_enabled(true);
        }
        self.enabled
    }

    pub fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }

    /// Normalized height under the pointer as of the last tick with a hit
    pub fn pointing_height(&self) -> Option<f32> {
        self.pointing_height
    }

    /// Run one tick of input against `terrain`
    pub fn update(
        &mut self,
        terrain: &mut TerrainData,
        input: &TickInput,
        undo: &mut dyn UndoCoordinator,
        occupancy: &mut dyn OccupancyGridBridge,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if !input.button_held && self.end_stroke() {
            outcome.stroke_ended = true;
        }

        let mode = self.session.mode();
        if !self.enabled || mode == EditMode::None {
            if self.end_stroke() {
                outcome.stroke_ended = true;
            }
            return outcome;
        }

        let Some(hit) = input.hit.filter(|h| !h.over_ui) else {
            return outcome;
        };
        let point = hit.point;

        let vertical_scale = terrain.vertical_scale();
        let reference_height = point.y / vertical_scale;
        self.pointing_height = Some(reference_height);
        outcome.pointing_height = Some(reference_height);
        outcome.preview = Some(self.preview(point, vertical_scale));

        if !input.button_held {
            return outcome;
        }

        // Switching mode mid-stroke starts a fresh stroke on the new field
        if self.stroke.as_ref().is_some_and(|s| s.mode != mode) {
            self.end_stroke();
            outcome.stroke_ended = true;
        }
        if self.stroke.is_none() {
            let Some(stroke) = self.begin_stroke(terrain, mode, undo) else {
                return outcome;
            };
            self.stroke = Some(stroke);
            outcome.stroke_started = true;
        }

        if input.copy_height {
            let sampled = terrain.sample_height(point.x, point.z);
            self.session.set_flatten_target(sampled);
            outcome.copied_height = Some(self.session.flatten_target());
            log::debug!("Copied flatten target {:.3}", sampled);
            return outcome;
        }

        let Some(stroke) = self.stroke.as_mut() else {
            return outcome;
        };
        stroke.ticks += 1;
        let kernel = Arc::clone(&stroke.kernel);

        let ctx = StrokeContext {
            point,
            area: self.session.brush_radius(),
            strength: self.session.strength(),
            sign: if input.invert { -1.0 } else { 1.0 },
            mode,
            tool: self.session.height_tool(),
            selected_layer: self.session.selected_layer(),
            detail_layer: self.session.detail_layer(),
            flatten_target: self.session.flatten_target(),
            reference_height,
            dt: input.dt,
        };
        let mapper = terrain.mapper();

        outcome.cells_modified = match mode {
            EditMode::EditTerrain => rules::apply_height_stroke(
                terrain.height_mut(),
                &mapper,
                &kernel,
                &ctx,
                &self.config,
                occupancy,
            ),
            EditMode::PaintTerrain => {
                rules::apply_paint_stroke(terrain.alpha_mut(), &mapper, &kernel, &ctx, &self.config)
            }
            EditMode::PaintDetails => match terrain.detail_mut(ctx.detail_layer) {
                Some(detail) => rules::apply_detail_stroke(
                    detail,
                    &mapper,
                    &kernel,
                    &ctx,
                    &self.config,
                    &mut self.rng,
                ),
                None => 0,
            },
            EditMode::None => 0,
        };

        outcome
    }

    /// Validate the target field, snapshot it and capture the kernel.
    ///
    /// Returns `None` when there is nothing to edit; no snapshot is taken then.
    fn begin_stroke(
        &self,
        terrain: &TerrainData,
        mode: EditMode,
        undo: &mut dyn UndoCoordinator,
    ) -> Option<ActiveStroke> {
        let Some(kernel) = self.kernel.clone() else {
            log::warn!("Stroke ignored: no brush set");
            return None;
        };

        match mode {
            EditMode::EditTerrain => {
                undo.snapshot(
                    EditKind::TerrainEdit,
                    terrain.height().snapshot_bytes(),
                    STROKE_START_OFFSET,
                );
            }
            EditMode::PaintTerrain => {
                let layers = terrain.alpha().layers();
                let selected = self.session.selected_layer();
                if selected >= layers {
                    log::warn!(
                        "Stroke ignored: layer {} selected, terrain has {}",
                        selected,
                        layers
                    );
                    return None;
                }
                undo.snapshot(
                    EditKind::TerrainPaint,
                    terrain.alpha().snapshot_bytes(),
                    STROKE_START_OFFSET,
                );
            }
            EditMode::PaintDetails => {
                let layer = self.session.detail_layer();
                if terrain.detail(layer).is_none() {
                    log::warn!(
                        "Stroke ignored: detail layer {} unavailable ({} present)",
                        layer,
                        terrain.detail_layer_count()
                    );
                    return None;
                }
            }
            EditMode::None => return None,
        }

        log::debug!("Stroke started: {:?}", mode);
        Some(ActiveStroke {
            kernel,
            mode,
            ticks: 0,
        })
    }

    /// Returns true if a stroke was active
    fn end_stroke(&mut self) -> bool {
        match self.stroke.take() {
            Some(stroke) => {
                log::debug!("Stroke ended: {:?} after {} ticks", stroke.mode, stroke.ticks);
                true
            }
            None => false,
        }
    }

    fn preview(&self, hit: Vec3, vertical_scale: f32) -> BrushPreview {
        let flatten_tool = self.session.mode() == EditMode::EditTerrain;
        let (position, style, guide) = match self.session.height_tool() {
            HeightTool::FlattenByHeight if flatten_tool => {
                (hit, PreviewStyle::Flat, Some((hit, hit)))
            }
            HeightTool::FlattenByValue if flatten_tool => {
                let target_y = self.session.flatten_target() * vertical_scale;
                let target = Vec3::new(hit.x, target_y, hit.z);
                (target, PreviewStyle::Floating, Some((hit, target)))
            }
            _ => (hit, PreviewStyle::Terrain, None),
        };

        BrushPreview {
            position,
            style,
            radius: self.session.brush_radius(),
            guide,
            visible: self.session.brush_visible(),
        }
    }
}
