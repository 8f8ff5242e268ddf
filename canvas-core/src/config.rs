//! Editor configuration.
//!
//! Every section has sensible defaults, so a partial JSON document only needs
//! to name the values it overrides:
//!
//! ```text
//! { "camera": { "max_scale": 50.0 }, "render": { "cull_mode": "overlap" } }
//! ```

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult};

/// Zoom limits for the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Smallest allowed scale factor.
    pub min_scale: f64,
    /// Largest allowed scale factor.
    pub max_scale: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.02,
            max_scale: 2000.0,
        }
    }
}

/// Pointer gesture tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Distance in device pixels the pointer must travel before a press becomes a drag.
    pub drag_threshold_px: f64,
    /// Zoom multiplier per wheel notch.
    pub wheel_zoom_step: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: 4.0,
            wheel_zoom_step: 1.1,
        }
    }
}

/// How items are tested against the viewport before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CullMode {
    /// Draw only items whose bounds lie fully inside the viewport.
    ///
    /// Items straddling the viewport edge are skipped.
    #[default]
    Contained,
    /// Draw every item whose bounds overlap the viewport.
    Overlap,
}

/// Colors used when drawing a frame (CSS color strings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)] // Field names are the documentation
pub struct Palette {
    pub background: String,
    pub grid_line: String,
    pub text: String,
    pub item_fill: String,
    pub item_stroke: String,
    pub marquee_fill: String,
    pub marquee_stroke: String,
    pub selection_fill: String,
    pub selection_stroke: String,
    pub collision_stroke: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            grid_line: "#cccccc".to_string(),
            text: "#000000".to_string(),
            item_fill: "#000000".to_string(),
            item_stroke: "#337722".to_string(),
            marquee_fill: "rgba(80, 170, 255, 0.2)".to_string(),
            marquee_stroke: "rgba(80, 170, 255, 0.8)".to_string(),
            selection_fill: "rgba(255, 255, 255, 0.4)".to_string(),
            selection_stroke: "rgba(80, 170, 255, 0.8)".to_string(),
            collision_stroke: "rgba(230, 40, 40, 0.9)".to_string(),
        }
    }
}

/// Frame drawing options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct RenderConfig {
    /// Viewport culling strategy.
    pub cull_mode: CullMode,
    /// Background grid spacing in millimeters.
    pub grid_spacing_mm: f64,
    /// Grid is skipped when its on-screen spacing drops below this many pixels.
    pub min_grid_spacing_px: f64,
    /// Extra world units added around selected items when highlighting them.
    pub selection_padding: f64,
    /// Draw the background grid.
    pub show_grid: bool,
    /// Draw the zoom / cursor status line.
    pub show_status: bool,
    /// Outline items that collide with another item.
    pub highlight_collisions: bool,
    /// Colors.
    pub palette: Palette,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::Contained,
            grid_spacing_mm: 10.0,
            min_grid_spacing_px: 4.0,
            selection_padding: 20.0,
            show_grid: true,
            show_status: true,
            highlight_collisions: true,
            palette: Palette::default(),
        }
    }
}

/// Complete editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Camera limits.
    pub camera: CameraConfig,
    /// Pointer gesture tuning.
    pub interaction: InteractionConfig,
    /// Frame drawing options.
    pub render: RenderConfig,
}

impl EditorConfig {
    /// Parse and validate a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values fail
    /// [`EditorConfig::validate`].
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        serde_json::to_string_pretty(self).map_err(CanvasError::Serialization)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> CanvasResult<()> {
        let cam = &self.camera;
        if !(cam.min_scale.is_finite() && cam.min_scale > 0.0) {
            return Err(invalid(format!(
                "camera.min_scale must be positive, got {}",
                cam.min_scale
            )));
        }
        if !(cam.max_scale.is_finite() && cam.max_scale > cam.min_scale) {
            return Err(invalid(format!(
                "camera.max_scale ({}) must exceed min_scale ({})",
                cam.max_scale, cam.min_scale
            )));
        }
        if !(cam.min_scale..=cam.max_scale).contains(&1.0) {
            return Err(invalid(
                "camera scale range must include 1.0 so the view can be reset".to_string(),
            ));
        }

        let input = &self.interaction;
        if !(input.drag_threshold_px.is_finite() && input.drag_threshold_px >= 0.0) {
            return Err(invalid(format!(
                "interaction.drag_threshold_px must be non-negative, got {}",
                input.drag_threshold_px
            )));
        }
        if !(input.wheel_zoom_step.is_finite() && input.wheel_zoom_step > 1.0) {
            return Err(invalid(format!(
                "interaction.wheel_zoom_step must be greater than 1, got {}",
                input.wheel_zoom_step
            )));
        }

        let render = &self.render;
        if !(render.grid_spacing_mm.is_finite() && render.grid_spacing_mm > 0.0) {
            return Err(invalid(format!(
                "render.grid_spacing_mm must be positive, got {}",
                render.grid_spacing_mm
            )));
        }
        if !(render.min_grid_spacing_px.is_finite() && render.min_grid_spacing_px > 0.0) {
            return Err(invalid(format!(
                "render.min_grid_spacing_px must be positive, got {}",
                render.min_grid_spacing_px
            )));
        }
        if render.selection_padding < 0.0 {
            return Err(invalid(format!(
                "render.selection_padding must be non-negative, got {}",
                render.selection_padding
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> CanvasError {
    CanvasError::InvalidConfig(msg)
}
