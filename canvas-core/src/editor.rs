//! Editing session: the camera, selection and interaction wired together.
//!
//! The host owns the frame loop and the input callbacks; the editor only
//! reacts to them.
//!
//! ```text
//! host input ──► Editor::handle_event ──► Interaction ──► Camera / Selection
//! host frame ──► Editor::draw_frame ──► Surface
//! ```

use serde::Serialize;

use crate::camera::Camera;
use crate::collection::{Collision, Collisions, ItemCollection};
use crate::config::EditorConfig;
use crate::event::{CanvasMetrics, InputSource, PointerEvent};
use crate::interaction::{Effect, Interaction, InteractionMode};
use crate::item::{Item, ItemId, ItemRef};
use crate::selection::Selection;
use crate::surface::{Path, Surface};
use crate::vec2::UNITS_PER_MM;
use crate::{CanvasError, CanvasResult, Vec2};

/// Collision outline width in screen pixels.
const COLLISION_LINE_WIDTH: f64 = 2.0;

/// Grid line width in screen pixels.
const GRID_LINE_WIDTH: f64 = 1.0;

/// Grid is skipped when either axis would need more lines than this.
const MAX_GRID_LINES_PER_AXIS: f64 = 512.0;

/// Where the status line is drawn, in screen pixels.
const STATUS_POSITION: Vec2 = Vec2::new(8.0, 8.0);

/// Counters for one drawn frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    /// Items that passed culling and were drawn.
    pub items_drawn: usize,
    /// Items skipped by culling.
    pub items_culled: usize,
    /// Grid lines drawn.
    pub grid_lines: usize,
    /// Items outlined as colliding.
    pub colliding_items: usize,
}

/// One editing session.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    config: EditorConfig,
    camera: Camera,
    selection: Selection,
    interaction: Interaction,
}

impl Editor {
    /// Create an empty session.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: EditorConfig) -> CanvasResult<Self> {
        config.validate()?;
        Ok(Self {
            camera: Camera::new(config.camera),
            interaction: Interaction::new(config.interaction),
            selection: Selection::default(),
            config,
        })
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The camera.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The camera, for programmatic pan and zoom.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// The selection.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The selection, for programmatic selection changes.
    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Current drag mode.
    #[must_use]
    pub const fn mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    /// The pointer state machine.
    #[must_use]
    pub const fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Report a new canvas size and placement.
    ///
    /// `css_width` and `css_height` are the element's layout size; the
    /// backing store is expected to be that size times `device_pixel_ratio`.
    /// `origin` is the element's top-left in client coordinates.
    pub fn set_viewport(
        &mut self,
        css_width: f64,
        css_height: f64,
        device_pixel_ratio: f64,
        origin: Vec2,
    ) {
        let size = Vec2::new(css_width, css_height).scale(device_pixel_ratio);
        tracing::debug!(%size, device_pixel_ratio, %origin, "viewport");
        self.camera.set_viewport(size);
        self.interaction
            .set_metrics(CanvasMetrics::new(origin, device_pixel_ratio));
    }

    /// Add an item as a selectable candidate and return its handle.
    pub fn add_item(&mut self, item: Item) -> ItemRef {
        let item = ItemRef::new(item);
        self.selection.add_selectable(item.clone());
        item
    }

    /// Add an existing handle. Returns `false` if it is already present.
    pub fn add_item_ref(&mut self, item: ItemRef) -> bool {
        self.selection.add_selectable(item)
    }

    /// Remove an item from the session by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ItemNotFound`] if no item has this ID.
    pub fn remove_item(&mut self, id: ItemId) -> CanvasResult<ItemRef> {
        let item = self.item(id).ok_or(CanvasError::ItemNotFound(id))?;
        self.selection.remove_item(&item);
        Ok(item)
    }

    /// Find an item by ID.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<ItemRef> {
        self.selection.selectable().get(id).cloned()
    }

    /// All items, in paint order.
    #[must_use]
    pub const fn items(&self) -> &ItemCollection {
        self.selection.selectable()
    }

    /// Feed one pointer event through the interaction state machine.
    pub fn handle_event(&mut self, event: PointerEvent) -> Effect {
        let effect = self
            .interaction
            .handle(event, &mut self.camera, &mut self.selection);
        if !effect.is_none() {
            tracing::trace!(?event, ?effect, "pointer event");
        }
        effect
    }

    /// Handle every pending event from `source`, in order.
    pub fn drain_input(&mut self, source: &mut dyn InputSource) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Some(event) = source.next_event() {
            effects.push(self.handle_event(event));
        }
        effects
    }

    /// Intersecting pairs of collidable items.
    #[must_use]
    pub fn collisions(&self) -> Collisions {
        self.items().find_collisions()
    }

    /// Every item that is part of at least one collision, in paint order.
    #[must_use]
    pub fn colliding_items(&self) -> ItemCollection {
        let pairs: Vec<Collision> = self.collisions().collect();
        let mut colliding = ItemCollection::with_pos(self.items().pos());
        for item in self.items() {
            if pairs.iter().any(|pair| pair.involves(item)) {
                colliding.add(item.clone());
            }
        }
        colliding
    }

    /// Put the world origin in the middle of the viewport.
    pub fn center_origin(&mut self) {
        self.camera.center_on(Vec2::zero());
    }

    /// Draw one frame.
    ///
    /// Background and grid are drawn in screen space, then items, collision
    /// outlines and selection overlays in world space, then the status line in
    /// screen space again.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::DivisionByZero`] if the grid spacing collapses
    /// to zero.
    pub fn draw_frame(&self, surface: &mut dyn Surface) -> CanvasResult<FrameStats> {
        let render = &self.config.render;
        let viewport = self.camera.viewport();
        let mut stats = FrameStats::default();

        surface.reset_transform();
        surface.clear_rect(Vec2::zero(), viewport);
        surface.set_fill_style(&render.palette.background);
        surface.fill_rect(Vec2::zero(), viewport);

        if render.show_grid {
            stats.grid_lines = self.draw_grid(surface)?;
        }

        let colliding = if render.highlight_collisions {
            self.colliding_items()
        } else {
            ItemCollection::new()
        };
        stats.colliding_items = colliding.len();

        stats.items_drawn = self.camera.in_world_space(surface, |s| {
            let drawn = self
                .items()
                .draw(s, &self.camera, render.cull_mode, &render.palette);
            if !colliding.is_empty() {
                s.set_stroke_style(&render.palette.collision_stroke);
                s.set_line_width(COLLISION_LINE_WIDTH / self.camera.scale());
                for item in &colliding {
                    let outline = colliding.world_box(&item.borrow());
                    s.stroke_rect(outline.min(), outline.size());
                }
            }
            let show_marquee = self.mode() == InteractionMode::Select;
            self.selection.draw(s, &self.camera, show_marquee, render);
            drawn
        });
        stats.items_culled = self.items().len() - stats.items_drawn;

        if render.show_status {
            surface.set_fill_style(&render.palette.text);
            surface.fill_text(&self.status_line(), STATUS_POSITION);
        }
        Ok(stats)
    }

    /// Zoom percentage and cursor position in millimeters.
    #[must_use]
    pub fn status_line(&self) -> String {
        let cursor = self.interaction.cursor_world(&self.camera).to_mm();
        format!(
            "{:.0}%  x {:.1} mm  y {:.1} mm",
            self.camera.scale() * 100.0,
            cursor.x,
            cursor.y
        )
    }

    /// Screen-space grid aligned with the world origin. Returns lines drawn.
    fn draw_grid(&self, surface: &mut dyn Surface) -> CanvasResult<usize> {
        let render = &self.config.render;
        let spacing = render.grid_spacing_mm * UNITS_PER_MM * self.camera.scale();
        if spacing < render.min_grid_spacing_px {
            tracing::trace!(spacing, "grid too dense, skipped");
            return Ok(0);
        }

        let viewport = self.camera.viewport();
        let start = self.camera.pos().modulo(spacing)? - Vec2::uniform(spacing);
        let span = (viewport - start).scale(1.0 / spacing);
        if span.x.max(span.y) >= MAX_GRID_LINES_PER_AXIS {
            tracing::trace!(spacing, %viewport, "grid has too many lines, skipped");
            return Ok(0);
        }
        let mut path = Path::new();
        let mut lines = 0;

        let mut x = start.x;
        while x <= viewport.x {
            path = path
                .move_to(Vec2::new(x, 0.0))
                .line_to(Vec2::new(x, viewport.y));
            lines += 1;
            x += spacing;
        }
        let mut y = start.y;
        while y <= viewport.y {
            path = path
                .move_to(Vec2::new(0.0, y))
                .line_to(Vec2::new(viewport.x, y));
            lines += 1;
            y += spacing;
        }

        surface.set_stroke_style(&render.palette.grid_line);
        surface.set_line_width(GRID_LINE_WIDTH);
        surface.stroke_path(&path);
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CullMode;
    use crate::event::{MouseButton, ScriptedInput};
    use crate::surface::{DrawCommand, RecordingSurface, Transform2};

    fn editor() -> Editor {
        let mut editor = Editor::default();
        editor.set_viewport(400.0, 300.0, 1.0, Vec2::zero());
        editor
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = EditorConfig::default();
        config.camera.min_scale = -1.0;
        assert!(matches!(Editor::new(config), Err(CanvasError::InvalidConfig(_))));
    }

    #[test]
    fn test_viewport_scales_by_pixel_ratio() {
        let mut editor = Editor::default();
        editor.set_viewport(400.0, 300.0, 2.0, Vec2::new(10.0, 10.0));
        assert_eq!(editor.camera().viewport(), Vec2::new(800.0, 600.0));
        assert_eq!(editor.interaction().metrics().device_pixel_ratio, 2.0);
    }

    #[test]
    fn test_remove_item() {
        let mut editor = editor();
        let item = editor.add_item(Item::new(Vec2::zero(), Vec2::uniform(5.0)));
        editor.selection_mut().select(&item);
        let removed = editor.remove_item(item.id()).expect("present");
        assert_eq!(removed, item);
        assert!(editor.items().is_empty());
        assert!(editor.selection().selected().is_empty());
        assert!(editor.remove_item(item.id()).is_err());
    }

    #[test]
    fn test_colliding_items_in_paint_order() {
        let mut editor = editor();
        let a = editor.add_item(Item::new(Vec2::zero(), Vec2::uniform(10.0)));
        let lone = editor.add_item(Item::new(Vec2::new(100.0, 0.0), Vec2::uniform(10.0)));
        let b = editor.add_item(Item::new(Vec2::new(5.0, 0.0), Vec2::uniform(10.0)));
        let colliding = editor.colliding_items();
        assert_eq!(colliding.iter().collect::<Vec<_>>(), vec![&a, &b]);
        assert!(!colliding.contains(&lone));
        assert_eq!(editor.collisions().count(), 1);
    }

    #[test]
    fn test_draw_frame_brackets_world_space() {
        let mut editor = editor();
        editor.center_origin();
        editor.add_item(Item::new(Vec2::zero(), Vec2::uniform(10.0)));
        editor.add_item(Item::new(Vec2::new(5000.0, 0.0), Vec2::uniform(10.0)));

        let mut surface = RecordingSurface::new();
        let stats = editor.draw_frame(&mut surface).expect("frame");
        assert_eq!(stats.items_drawn, 1);
        assert_eq!(stats.items_culled, 1);
        assert!(stats.grid_lines > 0);
        assert_eq!(surface.transform(), Transform2::IDENTITY);
        assert!(matches!(
            surface.commands().last(),
            Some(DrawCommand::FillText { text, .. }) if text.starts_with("100%")
        ));
    }

    #[test]
    fn test_grid_skipped_when_too_dense() {
        let mut editor = editor();
        let camera = editor.camera_mut();
        while camera.zoom_at(Vec2::zero(), 0.5) {}
        let stats = editor
            .draw_frame(&mut RecordingSurface::new())
            .expect("frame");
        assert_eq!(stats.grid_lines, 0);
    }

    #[test]
    fn test_grid_line_count_is_bounded() {
        let mut editor = Editor::default();
        editor.set_viewport(50_000.0, 300.0, 1.0, Vec2::zero());
        let stats = editor
            .draw_frame(&mut RecordingSurface::new())
            .expect("frame");
        assert_eq!(stats.grid_lines, 0);

        editor.set_viewport(20_000.0, 300.0, 1.0, Vec2::zero());
        let stats = editor
            .draw_frame(&mut RecordingSurface::new())
            .expect("frame");
        assert!(stats.grid_lines > 400 && stats.grid_lines < 2 * 512);
    }

    #[test]
    fn test_overlap_cull_mode_draws_straddling_items() {
        let mut config = EditorConfig::default();
        config.render.cull_mode = CullMode::Overlap;
        let mut editor = Editor::new(config).expect("valid");
        editor.set_viewport(100.0, 100.0, 1.0, Vec2::zero());
        editor.add_item(Item::new(Vec2::new(100.0, 50.0), Vec2::uniform(20.0)));
        let stats = editor
            .draw_frame(&mut RecordingSurface::new())
            .expect("frame");
        assert_eq!(stats.items_drawn, 1);
    }

    #[test]
    fn test_marquee_drawn_only_while_selecting() {
        let mut editor = editor();
        let mut script = ScriptedInput::new([
            PointerEvent::Down {
                client: Vec2::new(10.0, 10.0),
                button: MouseButton::Primary,
            },
            PointerEvent::Move {
                client: Vec2::new(60.0, 60.0),
                movement: Vec2::new(50.0, 50.0),
            },
        ]);
        editor.drain_input(&mut script);
        assert_eq!(editor.mode(), InteractionMode::Select);

        let mut surface = RecordingSurface::new();
        editor.draw_frame(&mut surface).expect("frame");
        assert!(surface.commands().contains(&DrawCommand::StrokeRect {
            origin: Vec2::new(10.0, 10.0),
            size: Vec2::new(50.0, 50.0),
        }));
    }
}
