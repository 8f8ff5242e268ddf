//! # Canvas Editor WASM Application
//!
//! Browser bindings for the editing surface: a DOM-backed drawing surface and
//! an [`EditorApp`] that forwards pointer events from JavaScript.
//!
//! ## Usage
//!
//! Build for WASM:
//! ```bash
//! wasm-pack build --target web canvas-app
//! ```
//!
//! Then import in JavaScript:
//! ```javascript
//! import init, { EditorApp } from './pkg/canvas_app.js';
//!
//! await init();
//! const app = new EditorApp('main-canvas');
//! canvas.addEventListener('pointermove', (e) =>
//!     app.pointerMove(e.clientX, e.clientY, e.movementX, e.movementY));
//!
//! function render() {
//!     app.render();
//!     requestAnimationFrame(render);
//! }
//! render();
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dom;

use canvas_core::{
    Effect, Editor, EditorConfig, ImageSource, Item, ItemId, ItemRef, MouseButton, Path,
    PointerEvent, Vec2,
};
use canvas_renderer::{Renderer, RendererConfig};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub use dom::{DomCanvasBackend, DomSurface};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    tracing::info!("Canvas editor WASM initialized");
}

/// Parse an item ID coming from JavaScript.
fn parse_item_id(id: &str) -> Result<ItemId, String> {
    uuid::Uuid::parse_str(id)
        .map(ItemId::from_uuid)
        .map_err(|e| format!("Invalid item id '{id}': {e}"))
}

/// Serialize an effect for the host. Effects are plain data and never fail to
/// serialize.
fn effect_json(effect: &Effect) -> String {
    serde_json::to_string(effect).unwrap_or_default()
}

/// Camera and cursor readout for the host UI.
#[derive(Debug, Clone, Serialize)]
struct ViewState {
    scale: f64,
    pos: Vec2,
    cursor_world: Vec2,
    mode: String,
    selected: usize,
}

impl ViewState {
    fn of(editor: &Editor) -> Self {
        Self {
            scale: editor.camera().scale(),
            pos: editor.camera().pos(),
            cursor_world: editor.interaction().cursor_world(editor.camera()),
            mode: format!("{:?}", editor.mode()),
            selected: editor.selection().selected().len(),
        }
    }
}

/// The editing surface bound to one `<canvas>` element.
#[wasm_bindgen]
pub struct EditorApp {
    canvas: HtmlCanvasElement,
    editor: Editor,
    renderer: Renderer,
}

#[wasm_bindgen]
impl EditorApp {
    /// Create an editor on the canvas with the given element ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas element cannot be found or has no 2D
    /// context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<EditorApp, JsValue> {
        Self::build(canvas_id, EditorConfig::default())
    }

    /// Create an editor with a JSON [`EditorConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the config is malformed or invalid, or if the
    /// canvas cannot be set up.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(canvas_id: &str, config_json: &str) -> Result<EditorApp, JsValue> {
        let config = EditorConfig::from_json(config_json)
            .map_err(|e| JsValue::from_str(&format!("Config error: {e}")))?;
        Self::build(canvas_id, config)
    }

    /// Re-read the canvas layout size, position and device pixel ratio.
    ///
    /// Call after the page layout changes or the window moves between
    /// displays.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas backing store cannot be resized.
    #[wasm_bindgen(js_name = syncViewport)]
    pub fn sync_viewport(&mut self) -> Result<(), JsValue> {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let rect = self.canvas.get_bounding_client_rect();
        self.editor.set_viewport(
            rect.width(),
            rect.height(),
            dpr,
            Vec2::new(rect.left(), rect.top()),
        );
        let size = self.editor.camera().viewport();
        // Backing store sizes are whole device pixels.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (width, height) = (size.x.round().max(1.0) as u32, size.y.round().max(1.0) as u32);
        self.renderer
            .resize(width, height)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Draw one frame.
    pub fn render(&mut self) {
        if let Err(e) = self.renderer.render(&self.editor) {
            tracing::warn!("Frame failed: {}", e);
        }
    }

    /// A pointer button was pressed. Returns the effect as JSON.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, client_x: f64, client_y: f64, button: u8) -> String {
        self.dispatch(PointerEvent::Down {
            client: Vec2::new(client_x, client_y),
            button: MouseButton::from_dom(button),
        })
    }

    /// A pointer button was released. Returns the effect as JSON.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, client_x: f64, client_y: f64, button: u8) -> String {
        self.dispatch(PointerEvent::Up {
            client: Vec2::new(client_x, client_y),
            button: MouseButton::from_dom(button),
        })
    }

    /// The pointer moved. `movement_*` are the event's CSS pixel deltas.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(
        &mut self,
        client_x: f64,
        client_y: f64,
        movement_x: f64,
        movement_y: f64,
    ) -> String {
        self.dispatch(PointerEvent::Move {
            client: Vec2::new(client_x, client_y),
            movement: Vec2::new(movement_x, movement_y),
        })
    }

    /// The pointer left the canvas.
    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) -> String {
        self.dispatch(PointerEvent::Leave)
    }

    /// A wheel event. The host should call `preventDefault` on it.
    pub fn wheel(&mut self, client_x: f64, client_y: f64, delta_y: f64) -> String {
        self.dispatch(PointerEvent::Wheel {
            client: Vec2::new(client_x, client_y),
            delta_y,
        })
    }

    /// A non-primary click, such as a middle click.
    #[wasm_bindgen(js_name = auxClick)]
    pub fn aux_click(&mut self, client_x: f64, client_y: f64, button: u8) -> String {
        self.dispatch(PointerEvent::AuxClick {
            client: Vec2::new(client_x, client_y),
            button: MouseButton::from_dom(button),
        })
    }

    /// Add an item centered at (`x`, `y`) in world units. Returns its ID.
    #[wasm_bindgen(js_name = addItem)]
    pub fn add_item(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rotation_degrees: f64,
        collides: bool,
    ) -> String {
        let item = Item::new(Vec2::new(x, y), Vec2::new(width, height))
            .with_rotation_degrees(rotation_degrees)
            .with_collides(collides);
        self.editor.add_item(item).id().to_string()
    }

    /// Give an item an image payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is malformed or unknown.
    #[wasm_bindgen(js_name = setItemImage)]
    pub fn set_item_image(&mut self, id: &str, src: &str) -> Result<(), JsValue> {
        let item = self.find(id)?;
        item.borrow_mut().set_image(Some(ImageSource::new(src)));
        Ok(())
    }

    /// Give an item a vector path payload, as JSON path commands.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is malformed or unknown, or the path JSON
    /// does not parse.
    #[wasm_bindgen(js_name = setItemPath)]
    pub fn set_item_path(&mut self, id: &str, path_json: &str) -> Result<(), JsValue> {
        let path: Path =
            serde_json::from_str(path_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let item = self.find(id)?;
        item.borrow_mut().set_path(Some(path));
        Ok(())
    }

    /// Remove an item.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is malformed or unknown.
    #[wasm_bindgen(js_name = removeItem)]
    pub fn remove_item(&mut self, id: &str) -> Result<(), JsValue> {
        let id = parse_item_id(id).map_err(|e| JsValue::from_str(&e))?;
        self.editor
            .remove_item(id)
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Number of items on the canvas.
    #[wasm_bindgen(js_name = itemCount)]
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.editor.items().len()
    }

    /// IDs of the selected items.
    #[wasm_bindgen(js_name = selectedIds)]
    #[must_use]
    pub fn selected_ids(&self) -> Vec<String> {
        self.editor
            .selection()
            .selected()
            .iter()
            .map(|item| item.id().to_string())
            .collect()
    }

    /// Number of intersecting item pairs.
    #[wasm_bindgen(js_name = collisionCount)]
    #[must_use]
    pub fn collision_count(&self) -> usize {
        self.editor.collisions().count()
    }

    /// Current interaction mode: `None`, `Select` or `Move`.
    #[must_use]
    pub fn mode(&self) -> String {
        format!("{:?}", self.editor.mode())
    }

    /// Camera and cursor state as JSON.
    #[wasm_bindgen(js_name = viewState)]
    #[must_use]
    pub fn view_state(&self) -> String {
        serde_json::to_string(&ViewState::of(&self.editor)).unwrap_or_default()
    }

    /// Restore the default zoom and pan.
    #[wasm_bindgen(js_name = resetCamera)]
    pub fn reset_camera(&mut self) {
        self.editor.camera_mut().reset();
    }

    /// Get the current frame count.
    #[wasm_bindgen(js_name = frameCount)]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.renderer.frame_count()
    }

    /// Counters of the last frame as a plain object.
    #[wasm_bindgen(js_name = frameStats)]
    #[must_use]
    pub fn frame_stats(&self) -> JsValue {
        let stats = self.renderer.last_stats();
        let obj = js_sys::Object::new();
        #[allow(clippy::cast_precision_loss)]
        let fields = [
            ("itemsDrawn", stats.items_drawn as f64),
            ("itemsCulled", stats.items_culled as f64),
            ("gridLines", stats.grid_lines as f64),
            ("collidingItems", stats.colliding_items as f64),
        ];
        for (key, value) in fields {
            let _ = js_sys::Reflect::set(&obj, &JsValue::from_str(key), &JsValue::from_f64(value));
        }
        obj.into()
    }
}

impl EditorApp {
    fn build(canvas_id: &str, config: EditorConfig) -> Result<EditorApp, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document object"))?;

        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("Canvas element '{canvas_id}' not found")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("Element is not a canvas"))?;

        let ctx = canvas
            .get_context("2d")
            .map_err(|_| JsValue::from_str("Failed to get 2D context"))?
            .ok_or_else(|| JsValue::from_str("2D context not available"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("Failed to cast to 2D context"))?;

        let editor = Editor::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let renderer_config = RendererConfig {
            width: canvas.width().max(1),
            height: canvas.height().max(1),
            ..RendererConfig::default()
        };
        let backend = DomCanvasBackend::new(canvas.clone(), ctx);
        let renderer = Renderer::with_backend(renderer_config, Box::new(backend))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let mut app = Self {
            canvas,
            editor,
            renderer,
        };
        app.sync_viewport()?;
        app.editor.center_origin();
        tracing::info!("Editor attached to canvas '{canvas_id}'");
        Ok(app)
    }

    fn dispatch(&mut self, event: PointerEvent) -> String {
        effect_json(&self.editor.handle_event(event))
    }

    fn find(&self, id: &str) -> Result<ItemRef, JsValue> {
        let id = parse_item_id(id).map_err(|e| JsValue::from_str(&e))?;
        self.editor
            .item(id)
            .ok_or_else(|| JsValue::from_str(&format!("Item not found: {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_id() {
        let id = ItemId::new();
        assert_eq!(parse_item_id(&id.to_string()), Ok(id));
        let err = parse_item_id("not-a-uuid").expect_err("malformed");
        assert!(err.contains("not-a-uuid"));
    }

    #[test]
    fn test_effect_json_is_tagged() {
        let json = effect_json(&Effect::Zoomed { scale: 1.1 });
        assert!(json.contains("\"effect\":\"zoomed\""));
        assert!(json.contains("1.1"));
    }

    #[test]
    fn test_view_state_reports_selection() {
        let mut editor = Editor::default();
        let item = editor.add_item(Item::new(Vec2::zero(), Vec2::uniform(10.0)));
        editor.selection_mut().select(&item);
        let state = ViewState::of(&editor);
        assert_eq!(state.selected, 1);
        assert_eq!(state.mode, "None");
        let json = serde_json::to_string(&state).expect("json");
        assert!(json.contains("\"cursor_world\""));
    }
}
