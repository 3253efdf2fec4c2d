//! Per-tick stroke inputs and results

use std::sync::Arc;

use crate::brush::BrushKernel;
use crate::core::Vec3;

use super::session::{EditMode, HeightTool};

/// Result of the host's pointer raycast for this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerHit {
    /// World-space hit on the terrain
    pub point: Vec3,
    /// Pointer is over a UI element; the editor ignores the hit
    pub over_ui: bool,
}

/// Everything the host feeds the editor for one simulation tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    pub hit: Option<PointerHit>,
    /// Primary button currently down
    pub button_held: bool,
    /// Inversion modifier (lowers instead of raises)
    pub invert: bool,
    /// Copy-height modifier (samples the flatten target instead of editing)
    pub copy_height: bool,
    /// Tick duration in seconds
    pub dt: f32,
}

impl TickInput {
    /// No hit, no buttons
    pub fn idle(dt: f32) -> Self {
        Self {
            hit: None,
            button_held: false,
            invert: false,
            copy_height: false,
            dt,
        }
    }

    /// Pointer over terrain at `point`, button up
    pub fn hover(point: Vec3, dt: f32) -> Self {
        Self {
            hit: Some(PointerHit { point, over_ui: false }),
            ..Self::idle(dt)
        }
    }

    /// Pointer over terrain at `point`, button down
    pub fn held(point: Vec3, dt: f32) -> Self {
        Self {
            button_held: true,
            ..Self::hover(point, dt)
        }
    }

    pub fn with_invert(mut self) -> Self {
        self.invert = true;
        self
    }

    pub fn with_copy_height(mut self) -> Self {
        self.copy_height = true;
        self
    }

    pub fn over_ui(mut self) -> Self {
        if let Some(hit) = self.hit.as_mut() {
            hit.over_ui = true;
        }
        self
    }
}

/// The value set a single tick of a stroke is applied with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeContext {
    pub point: Vec3,
    /// Brush radius in world units
    pub area: f32,
    pub strength: f32,
    /// -1 with the inversion modifier, else 1
    pub sign: f32,
    pub mode: EditMode,
    pub tool: HeightTool,
    pub selected_layer: usize,
    pub detail_layer: usize,
    /// Flatten-by-value target, normalized
    pub flatten_target: f32,
    /// Flatten-by-height reference, normalized height of the hit point
    pub reference_height: f32,
    pub dt: f32,
}

/// State kept from stroke start until the button is released
#[derive(Debug, Clone)]
pub struct ActiveStroke {
    /// Kernel captured at stroke start; brush changes apply to the next stroke
    pub kernel: Arc<BrushKernel>,
    pub mode: EditMode,
    pub ticks: u32,
}

/// How the brush preview is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStyle {
    /// Projected onto the terrain surface
    Terrain,
    /// Flat disc at the hit height
    Flat,
    /// Disc floating at the flatten target, no terrain projection
    Floating,
}

/// Where and how the host should draw the brush this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushPreview {
    pub position: Vec3,
    pub style: PreviewStyle,
    pub radius: f32,
    /// Line from the hit point to the preview, for flatten tools
    pub guide: Option<(Vec3, Vec3)>,
    pub visible: bool,
}

/// What one tick did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub preview: Option<BrushPreview>,
    /// Normalized height under the pointer
    pub pointing_height: Option<f32>,
    pub stroke_started: bool,
    pub stroke_ended: bool,
    /// Cells written this tick
    pub cells_modified: usize,
    /// Set when the copy-height modifier sampled a new flatten target
    pub copied_height: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_builders() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let input = TickInput::held(p, 0.016).with_invert().over_ui();

        assert!(input.button_held);
        assert!(input.invert);
        assert!(!input.copy_height);
        assert_eq!(input.hit, Some(PointerHit { point: p, over_ui: true }));

        let idle = TickInput::idle(0.016).over_ui();
        assert_eq!(idle.hit, None);
    }
}
