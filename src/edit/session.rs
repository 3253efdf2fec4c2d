//! Editor mode and brush settings chosen by the UI

use serde::{Deserialize, Serialize};

use super::config::EditorConfig;

/// Top-level editing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditMode {
    #[default]
    None,
    EditTerrain,
    PaintTerrain,
    PaintDetails,
}

/// Height rule used under [`EditMode::EditTerrain`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeightTool {
    #[default]
    RaiseLower,
    Smooth,
    FlattenByHeight,
    FlattenByValue,
}

/// Pure state holder for the active mode and brush settings.
///
/// Setters are plain assignments; the enums are the only validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditSessionState {
    mode: EditMode,
    height_tool: HeightTool,
    /// Brush radius in world units
    brush_radius: f32,
    strength: f32,
    selected_layer: usize,
    detail_layer: usize,
    brush_visible: bool,
    /// Flatten-by-value target, normalized height
    flatten_target: f32,
}

impl EditSessionState {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            mode: EditMode::None,
            height_tool: HeightTool::RaiseLower,
            brush_radius: config.default_brush_radius,
            strength: config.default_strength,
            selected_layer: 0,
            detail_layer: 0,
            brush_visible: true,
            flatten_target: config.default_flatten_target,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        if mode != self.mode {
            log::debug!("Edit mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    pub fn height_tool(&self) -> HeightTool {
        self.height_tool
    }

    pub fn set_height_tool(&mut self, tool: HeightTool) {
        self.height_tool = tool;
    }

    pub fn brush_radius(&self) -> f32 {
        self.brush_radius
    }

    pub fn set_brush_radius(&mut self, radius: f32) {
        self.brush_radius = radius;
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength;
    }

    /// Texture layer that paint strokes grow
    pub fn selected_layer(&self) -> usize {
        self.selected_layer
    }

    pub fn set_selected_layer(&mut self, layer: usize) {
        self.selected_layer = layer;
    }

    /// Detail layer that detail strokes overwrite
    pub fn detail_layer(&self) -> usize {
        self.detail_layer
    }

    pub fn set_detail_layer(&mut self, layer: usize) {
        self.detail_layer = layer;
    }

    pub fn brush_visible(&self) -> bool {
        self.brush_visible
    }

    pub fn set_brush_visible(&mut self, visible: bool) {
        self.brush_visible = visible;
    }

    pub fn flatten_target(&self) -> f32 {
        self.flatten_target
    }

    /// Slider value in `[0, 1]`
    pub fn set_flatten_target(&mut self, target: f32) {
        self.flatten_target = target.clamp(0.0, 1.0);
    }

    /// Text for the brush size readout
    pub fn brush_size_label(&self) -> String {
        format!("Brush Size [{}]", self.brush_radius)
    }
}

impl Default for EditSessionState {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

/// Text for the pointing height readout
pub fn pointing_height_label(height: f32) -> String {
    format!("Pointing height : {:.2}", height)
}
