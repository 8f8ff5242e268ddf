//! Pointer interaction state machine.
//!
//! [`Interaction`] turns raw pointer events into camera and selection
//! mutations. It owns no geometry: the camera and selection are passed in on
//! every call, and neither of them knows about the interaction.
//!
//! ```text
//!            primary drag, pressed on selection
//!        ┌────────────────────────────────────────► MOVE ──┐
//!  NONE ─┤                                                  ├─ primary up / leave ─► NONE
//!        └────────────────────────────────────────► SELECT ┘
//!            primary drag elsewhere
//! ```
//!
//! Panning with the secondary button is tracked by a press flag rather than a
//! mode and can overlap any mode; item moves are suppressed while it is held.

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::config::InteractionConfig;
use crate::event::{CanvasMetrics, MouseButton, PointerEvent};
use crate::item::ItemId;
use crate::selection::Selection;
use crate::{Box2, Vec2};

/// What a primary-button drag is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// No drag in progress (possibly a press that has not moved far enough yet).
    #[default]
    None,
    /// Drawing a marquee.
    Select,
    /// Dragging the current selection.
    Move,
}

/// Observable outcome of one pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
#[allow(missing_docs)] // Field names are the documentation
pub enum Effect {
    /// Nothing changed.
    None,
    /// The camera was panned by a screen-space delta.
    Panned { delta: Vec2 },
    /// The camera zoomed to a new scale.
    Zoomed { scale: f64 },
    /// A zoom was refused because it would leave the scale limits.
    ZoomRejected,
    /// The camera returned to identity.
    CameraReset,
    /// A drag turned into a marquee.
    MarqueeStarted { selection_box: Box2 },
    /// The marquee followed the cursor.
    MarqueeUpdated { selection_box: Box2 },
    /// The marquee was released; `selected` items were added.
    MarqueeCommitted { selected: usize },
    /// A drag over the selection started moving it.
    MoveStarted { delta: Vec2 },
    /// The selection moved by a world-space delta.
    ItemsMoved { delta: Vec2 },
    /// The selection was dropped.
    MoveFinished,
    /// A click picked the topmost item under the cursor.
    Picked { item: ItemId },
    /// A click on empty space cleared the selection.
    SelectionCleared,
    /// A drag was aborted by the pointer leaving the canvas.
    Cancelled,
}

impl Effect {
    /// Whether this is [`Effect::None`].
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Pointer state machine for one editing session.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    config: InteractionConfig,
    metrics: CanvasMetrics,
    mode: InteractionMode,
    primary_down: bool,
    secondary_down: bool,
    press_screen: Vec2,
    press_world: Vec2,
    last_world: Vec2,
    cursor: Vec2,
}

impl Interaction {
    /// Create an idle state machine.
    #[must_use]
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current drag mode.
    #[must_use]
    pub const fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Whether the primary button is held.
    #[must_use]
    pub const fn is_primary_down(&self) -> bool {
        self.primary_down
    }

    /// Whether the secondary (pan) button is held.
    #[must_use]
    pub const fn is_panning(&self) -> bool {
        self.secondary_down
    }

    /// Last known cursor position in canvas device pixels.
    #[must_use]
    pub const fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Last known cursor position in world space.
    #[must_use]
    pub fn cursor_world(&self, camera: &Camera) -> Vec2 {
        camera.to_world(self.cursor)
    }

    /// Canvas placement used to convert client coordinates.
    #[must_use]
    pub const fn metrics(&self) -> CanvasMetrics {
        self.metrics
    }

    /// Update canvas placement after a layout or pixel ratio change.
    pub fn set_metrics(&mut self, metrics: CanvasMetrics) {
        self.metrics = metrics;
    }

    /// Gesture tuning.
    #[must_use]
    pub const fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Feed one event through the state machine.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        camera: &mut Camera,
        selection: &mut Selection,
    ) -> Effect {
        if let Some(client) = event.client() {
            if !client.is_finite() {
                tracing::trace!(?event, "non-finite pointer position ignored");
                return Effect::None;
            }
            self.cursor = self.metrics.to_canvas(client);
        }
        match event {
            PointerEvent::Down { button, .. } => self.on_down(button, camera),
            PointerEvent::Up { button, .. } => self.on_up(button, camera, selection),
            PointerEvent::Move { movement, .. } => self.on_move(movement, camera, selection),
            PointerEvent::Leave => self.cancel(selection),
            PointerEvent::Wheel { delta_y, .. } => self.on_wheel(delta_y, camera),
            PointerEvent::AuxClick { button, .. } => self.on_aux_click(button, camera),
        }
    }

    /// Drop both press flags and any drag in progress.
    ///
    /// The selection itself is left as it was before the drag.
    pub fn cancel(&mut self, selection: &mut Selection) -> Effect {
        let active = self.primary_down || self.secondary_down || self.mode != InteractionMode::None;
        self.primary_down = false;
        self.secondary_down = false;
        self.set_mode(InteractionMode::None);
        selection.clear_selection_box();
        if active {
            Effect::Cancelled
        } else {
            Effect::None
        }
    }

    fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode != mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "interaction mode");
            self.mode = mode;
        }
    }

    fn on_down(&mut self, button: MouseButton, camera: &Camera) -> Effect {
        match button {
            MouseButton::Primary => {
                self.primary_down = true;
                self.press_screen = self.cursor;
                self.press_world = camera.to_world(self.cursor);
                self.last_world = self.press_world;
            }
            MouseButton::Secondary => self.secondary_down = true,
            MouseButton::Auxiliary | MouseButton::Other(_) => {}
        }
        Effect::None
    }

    fn on_move(&mut self, movement: Vec2, camera: &mut Camera, selection: &mut Selection) -> Effect {
        let mut effect = Effect::None;
        if self.secondary_down {
            let delta = self.metrics.scale_delta(movement);
            camera.pan(delta);
            effect = Effect::Panned { delta };
        }
        if !self.primary_down {
            return effect;
        }

        let world = camera.to_world(self.cursor);
        let dragged = match self.mode {
            InteractionMode::None => {
                if self.cursor.distance(self.press_screen) <= self.config.drag_threshold_px {
                    return effect;
                }
                if selection.is_selected_item_under_point(world) {
                    self.set_mode(InteractionMode::Move);
                    // `last_world` is still the press point, so the first step
                    // covers the whole distance travelled past the threshold.
                    let delta = self.step_selection(world, selection);
                    Effect::MoveStarted { delta }
                } else {
                    self.set_mode(InteractionMode::Select);
                    let selection_box = Box2::new(self.press_world, world);
                    selection.set_selection_box(selection_box);
                    Effect::MarqueeStarted { selection_box }
                }
            }
            InteractionMode::Select => {
                let selection_box = Box2::new(self.press_world, world);
                selection.set_selection_box(selection_box);
                Effect::MarqueeUpdated { selection_box }
            }
            InteractionMode::Move => {
                let delta = self.step_selection(world, selection);
                Effect::ItemsMoved { delta }
            }
        };
        if matches!(dragged, Effect::ItemsMoved { delta } if delta == Vec2::zero()) {
            effect
        } else {
            dragged
        }
    }

    /// Move the selection by the world delta since the last step, unless panning.
    fn step_selection(&mut self, world: Vec2, selection: &mut Selection) -> Vec2 {
        let delta = if self.secondary_down {
            Vec2::zero()
        } else {
            world - self.last_world
        };
        if delta != Vec2::zero() {
            selection.move_selected(delta);
        }
        self.last_world = world;
        delta
    }

    fn on_up(&mut self, button: MouseButton, camera: &Camera, selection: &mut Selection) -> Effect {
        match button {
            MouseButton::Primary if self.primary_down => {
                self.primary_down = false;
                match self.mode {
                    InteractionMode::Select => {
                        let selected = selection.select_from_box();
                        selection.clear_selection_box();
                        self.set_mode(InteractionMode::None);
                        Effect::MarqueeCommitted { selected }
                    }
                    InteractionMode::Move => {
                        self.set_mode(InteractionMode::None);
                        Effect::MoveFinished
                    }
                    InteractionMode::None => {
                        selection.deselect();
                        match selection.select_item_under_point(camera.to_world(self.cursor)) {
                            Some(item) => Effect::Picked { item: item.id() },
                            None => Effect::SelectionCleared,
                        }
                    }
                }
            }
            MouseButton::Secondary => {
                self.secondary_down = false;
                Effect::None
            }
            _ => Effect::None,
        }
    }

    fn on_wheel(&mut self, delta_y: f64, camera: &mut Camera) -> Effect {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return Effect::None;
        }
        let step = self.config.wheel_zoom_step;
        let multiplier = if delta_y < 0.0 { step } else { 1.0 / step };
        if camera.zoom_at(self.cursor, multiplier) {
            Effect::Zoomed {
                scale: camera.scale(),
            }
        } else {
            Effect::ZoomRejected
        }
    }

    fn on_aux_click(&mut self, button: MouseButton, camera: &mut Camera) -> Effect {
        if button != MouseButton::Auxiliary {
            return Effect::None;
        }
        camera.reset();
        // Keep an in-progress move anchored to the cursor in the new view.
        self.last_world = camera.to_world(self.cursor);
        Effect::CameraReset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Item, ItemRef};

    fn down(x: f64, y: f64, button: MouseButton) -> PointerEvent {
        PointerEvent::Down {
            client: Vec2::new(x, y),
            button,
        }
    }

    fn up(x: f64, y: f64, button: MouseButton) -> PointerEvent {
        PointerEvent::Up {
            client: Vec2::new(x, y),
            button,
        }
    }

    fn mv(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            client: Vec2::new(x, y),
            movement: Vec2::zero(),
        }
    }

    fn setup() -> (Interaction, Camera, Selection, ItemRef) {
        let item = ItemRef::new(Item::new(Vec2::new(50.0, 50.0), Vec2::uniform(20.0)));
        let mut selection = Selection::default();
        selection.add_selectable(item.clone());
        (Interaction::default(), Camera::default(), selection, item)
    }

    #[test]
    fn test_small_jitter_stays_a_click() {
        let (mut ix, mut cam, mut sel, item) = setup();
        ix.handle(down(50.0, 50.0, MouseButton::Primary), &mut cam, &mut sel);
        assert_eq!(ix.handle(mv(52.0, 51.0), &mut cam, &mut sel), Effect::None);
        assert_eq!(ix.mode(), InteractionMode::None);
        let effect = ix.handle(up(52.0, 51.0, MouseButton::Primary), &mut cam, &mut sel);
        assert_eq!(effect, Effect::Picked { item: item.id() });
    }

    #[test]
    fn test_drag_on_empty_space_starts_marquee() {
        let (mut ix, mut cam, mut sel, _) = setup();
        ix.handle(down(0.0, 0.0, MouseButton::Primary), &mut cam, &mut sel);
        let effect = ix.handle(mv(30.0, 30.0), &mut cam, &mut sel);
        assert!(matches!(effect, Effect::MarqueeStarted { .. }));
        assert_eq!(ix.mode(), InteractionMode::Select);
        assert_eq!(sel.selection_box(), Box2::new(Vec2::zero(), Vec2::new(30.0, 30.0)));
    }

    #[test]
    fn test_drag_on_selected_item_moves_it() {
        let (mut ix, mut cam, mut sel, item) = setup();
        sel.select(&item);
        ix.handle(down(50.0, 50.0, MouseButton::Primary), &mut cam, &mut sel);
        let effect = ix.handle(mv(55.0, 50.0), &mut cam, &mut sel);
        assert_eq!(effect, Effect::MoveStarted { delta: Vec2::new(5.0, 0.0) });
        assert_eq!(item.borrow().pos(), Vec2::new(55.0, 50.0));
        ix.handle(mv(55.0, 60.0), &mut cam, &mut sel);
        assert_eq!(item.borrow().pos(), Vec2::new(55.0, 60.0));
        assert_eq!(
            ix.handle(up(55.0, 60.0, MouseButton::Primary), &mut cam, &mut sel),
            Effect::MoveFinished
        );
        assert_eq!(ix.mode(), InteractionMode::None);
        assert!(sel.selected().contains(&item));
    }

    #[test]
    fn test_drag_onto_selected_item_moves_it() {
        let (mut ix, mut cam, mut sel, item) = setup();
        sel.select(&item);
        ix.handle(down(30.0, 50.0, MouseButton::Primary), &mut cam, &mut sel);
        let effect = ix.handle(mv(45.0, 50.0), &mut cam, &mut sel);
        assert_eq!(effect, Effect::MoveStarted { delta: Vec2::new(15.0, 0.0) });
        assert_eq!(item.borrow().pos(), Vec2::new(65.0, 50.0));
    }

    #[test]
    fn test_drag_off_selected_item_starts_marquee() {
        let (mut ix, mut cam, mut sel, item) = setup();
        sel.select(&item);
        ix.handle(down(58.0, 50.0, MouseButton::Primary), &mut cam, &mut sel);
        let effect = ix.handle(mv(100.0, 50.0), &mut cam, &mut sel);
        assert!(matches!(effect, Effect::MarqueeStarted { .. }));
        assert_eq!(ix.mode(), InteractionMode::Select);
        assert_eq!(item.borrow().pos(), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_non_finite_position_is_ignored() {
        let (mut ix, mut cam, mut sel, _) = setup();
        let effect = ix.handle(down(f64::NAN, 50.0, MouseButton::Primary), &mut cam, &mut sel);
        assert_eq!(effect, Effect::None);
        assert!(!ix.is_primary_down());
        assert_eq!(ix.cursor_world(&cam), Vec2::zero());
    }

    #[test]
    fn test_secondary_drag_pans() {
        let (mut ix, mut cam, mut sel, _) = setup();
        ix.handle(down(10.0, 10.0, MouseButton::Secondary), &mut cam, &mut sel);
        let effect = ix.handle(
            PointerEvent::Move {
                client: Vec2::new(15.0, 12.0),
                movement: Vec2::new(5.0, 2.0),
            },
            &mut cam,
            &mut sel,
        );
        assert_eq!(effect, Effect::Panned { delta: Vec2::new(5.0, 2.0) });
        assert_eq!(cam.pos(), Vec2::new(5.0, 2.0));
        ix.handle(up(15.0, 12.0, MouseButton::Secondary), &mut cam, &mut sel);
        assert!(!ix.is_panning());
    }

    #[test]
    fn test_wheel_direction() {
        let (mut ix, mut cam, mut sel, _) = setup();
        let wheel = |delta_y| PointerEvent::Wheel {
            client: Vec2::new(100.0, 100.0),
            delta_y,
        };
        assert!(matches!(ix.handle(wheel(-1.0), &mut cam, &mut sel), Effect::Zoomed { scale } if scale > 1.0));
        cam.reset();
        assert!(matches!(ix.handle(wheel(1.0), &mut cam, &mut sel), Effect::Zoomed { scale } if scale < 1.0));
        assert_eq!(ix.handle(wheel(0.0), &mut cam, &mut sel), Effect::None);
    }

    #[test]
    fn test_aux_click_only_for_auxiliary() {
        let (mut ix, mut cam, mut sel, _) = setup();
        cam.pan(Vec2::new(3.0, 3.0));
        let click = |button| PointerEvent::AuxClick {
            client: Vec2::zero(),
            button,
        };
        assert_eq!(ix.handle(click(MouseButton::Secondary), &mut cam, &mut sel), Effect::None);
        assert_eq!(cam.pos(), Vec2::new(3.0, 3.0));
        assert_eq!(ix.handle(click(MouseButton::Auxiliary), &mut cam, &mut sel), Effect::CameraReset);
        assert_eq!(cam.pos(), Vec2::zero());
    }

    #[test]
    fn test_spurious_up_is_ignored() {
        let (mut ix, mut cam, mut sel, item) = setup();
        sel.select(&item);
        assert_eq!(
            ix.handle(up(0.0, 0.0, MouseButton::Primary), &mut cam, &mut sel),
            Effect::None
        );
        assert_eq!(sel.selected().len(), 1);
    }

    #[test]
    fn test_leave_when_idle_is_quiet() {
        let (mut ix, mut cam, mut sel, _) = setup();
        assert_eq!(ix.handle(PointerEvent::Leave, &mut cam, &mut sel), Effect::None);
    }
}
