//! DOM drawing surface over a `CanvasRenderingContext2d`.

use std::collections::HashMap;

use canvas_core::{ImageSource, Path, PathCommand, Surface, Transform2, Vec2};
use canvas_renderer::{BackendType, RenderBackend, RenderError, RenderResult};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Path2d};

/// Images requested by items, keyed by source.
///
/// The browser loads images asynchronously. An image is requested the first
/// time an item draws it and is skipped on every frame until it has loaded.
#[derive(Default)]
struct ImageCache {
    images: HashMap<String, HtmlImageElement>,
}

impl ImageCache {
    /// The loaded image for `source`, starting the load if needed.
    fn ready(&mut self, source: &ImageSource) -> Option<&HtmlImageElement> {
        if !self.images.contains_key(&source.src) {
            match HtmlImageElement::new() {
                Ok(img) => {
                    img.set_src(&source.src);
                    tracing::debug!("Loading image {}", source.src);
                    self.images.insert(source.src.clone(), img);
                }
                Err(e) => {
                    tracing::warn!("Failed to create image element: {:?}", e);
                    return None;
                }
            }
        }
        self.images
            .get(&source.src)
            .filter(|img| img.complete() && img.natural_width() > 0)
    }
}

fn warn_on_err(what: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        tracing::warn!("Failed to {what}: {:?}", e);
    }
}

/// [`Surface`] implementation on a browser 2D context.
pub struct DomSurface {
    ctx: CanvasRenderingContext2d,
    images: ImageCache,
}

impl DomSurface {
    /// Wrap a 2D context.
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        ctx.set_text_baseline("top");
        Self {
            ctx,
            images: ImageCache::default(),
        }
    }

    fn build_path(path: &Path) -> Option<Path2d> {
        let p = match Path2d::new() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Failed to create Path2D: {:?}", e);
                return None;
            }
        };
        for command in path.commands() {
            match *command {
                PathCommand::MoveTo { to } => p.move_to(to.x, to.y),
                PathCommand::LineTo { to } => p.line_to(to.x, to.y),
                PathCommand::Arc {
                    center,
                    radius,
                    start,
                    end,
                } => warn_on_err(
                    "add arc",
                    p.arc(center.x, center.y, radius, start, end),
                ),
                PathCommand::Close => p.close_path(),
            }
        }
        Some(p)
    }
}

impl Surface for DomSurface {
    fn clear_rect(&mut self, origin: Vec2, size: Vec2) {
        self.ctx.clear_rect(origin.x, origin.y, size.x, size.y);
    }

    fn set_transform(&mut self, t: Transform2) {
        warn_on_err(
            "set transform",
            self.ctx.set_transform(t.a, t.b, t.c, t.d, t.e, t.f),
        );
    }

    fn reset_transform(&mut self) {
        warn_on_err("reset transform", self.ctx.reset_transform());
    }

    fn translate(&mut self, offset: Vec2) {
        warn_on_err("translate", self.ctx.translate(offset.x, offset.y));
    }

    fn rotate(&mut self, angle: f64) {
        warn_on_err("rotate", self.ctx.rotate(angle));
    }

    fn set_fill_style(&mut self, style: &str) {
        self.ctx.set_fill_style_str(style);
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.ctx.set_stroke_style_str(style);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2) {
        self.ctx.fill_rect(origin.x, origin.y, size.x, size.y);
    }

    fn stroke_rect(&mut self, origin: Vec2, size: Vec2) {
        self.ctx.stroke_rect(origin.x, origin.y, size.x, size.y);
    }

    fn fill_path(&mut self, path: &Path) {
        if let Some(p) = Self::build_path(path) {
            self.ctx.fill_with_path_2d(&p);
        }
    }

    fn stroke_path(&mut self, path: &Path) {
        if let Some(p) = Self::build_path(path) {
            self.ctx.stroke_with_path(&p);
        }
    }

    fn draw_image(&mut self, image: &ImageSource, origin: Vec2, size: Vec2) {
        let Some(img) = self.images.ready(image) else {
            return;
        };
        warn_on_err(
            "draw image",
            self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img, origin.x, origin.y, size.x, size.y,
            ),
        );
    }

    fn fill_text(&mut self, text: &str, at: Vec2) {
        warn_on_err("draw text", self.ctx.fill_text(text, at.x, at.y));
    }
}

/// Canvas2D backend: a [`DomSurface`] plus the canvas element it draws on.
pub struct DomCanvasBackend {
    canvas: HtmlCanvasElement,
    surface: DomSurface,
}

impl DomCanvasBackend {
    /// Create a backend for `canvas` drawing through `ctx`.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self {
            canvas,
            surface: DomSurface::new(ctx),
        }
    }
}

impl RenderBackend for DomCanvasBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Canvas2D
    }

    fn surface(&mut self) -> &mut dyn Surface {
        &mut self.surface
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::Surface(format!(
                "cannot resize canvas to {width}x{height}"
            )));
        }
        // Assigning the backing size resets the context state, including the
        // text baseline.
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.surface.ctx.set_text_baseline("top");
        Ok(())
    }
}
