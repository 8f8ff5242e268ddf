//! Abstract drawing surface.
//!
//! The core never rasterizes anything itself. It issues a small immediate-mode
//! vocabulary against a [`Surface`], which a host backend implements on top of
//! whatever it draws with (a browser `CanvasRenderingContext2d`, a recorder in
//! tests, ...).
//!
//! ```text
//! Editor::draw_frame ──► Surface ──┬─► DOM canvas (canvas-app)
//!                                  └─► RecordingSurface (headless / tests)
//! ```

use serde::{Deserialize, Serialize};

use crate::Vec2;

/// A 2D affine transform in canvas `setTransform(a, b, c, d, e, f)` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2 {
    /// Horizontal scaling.
    pub a: f64,
    /// Vertical skewing.
    pub b: f64,
    /// Horizontal skewing.
    pub c: f64,
    /// Vertical scaling.
    pub d: f64,
    /// Horizontal translation.
    pub e: f64,
    /// Vertical translation.
    pub f: f64,
}

impl Transform2 {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Uniform scale followed by a translation.
    #[must_use]
    pub const fn scale_translate(scale: f64, offset: Vec2) -> Self {
        Self {
            a: scale,
            b: 0.0,
            c: 0.0,
            d: scale,
            e: offset.x,
            f: offset.y,
        }
    }

    /// Map a point through this transform.
    #[must_use]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// `self * other`: apply `other` first, then `self`.
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// SVG vector image.
    Svg,
    /// WebP image.
    WebP,
    /// Anything else; the host decides whether it can draw it.
    Unknown,
}

impl ImageFormat {
    /// Detect format from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "svg" => Self::Svg,
            "webp" => Self::WebP,
            _ => Self::Unknown,
        }
    }
}

/// A raster or vector image supplied by the host, referenced by its source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSource {
    /// Image source URI.
    pub src: String,
    /// Image format.
    pub format: ImageFormat,
}

impl ImageSource {
    /// Create an image reference, guessing the format from the extension of `src`.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        let src = src.into();
        let format = src
            .rsplit_once('.')
            .map_or(ImageFormat::Unknown, |(_, ext)| ImageFormat::from_extension(ext));
        Self { src, format }
    }
}

/// One segment of a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    /// Start a new subpath at a point.
    MoveTo {
        /// Target point.
        to: Vec2,
    },
    /// Straight line to a point.
    LineTo {
        /// Target point.
        to: Vec2,
    },
    /// Circular arc, angles in radians, clockwise in a y-down frame.
    Arc {
        /// Arc center.
        center: Vec2,
        /// Arc radius.
        radius: f64,
        /// Start angle.
        start: f64,
        /// End angle.
        end: f64,
    },
    /// Close the current subpath.
    Close,
}

/// A vector outline in an item's local frame (origin at the item center).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// Create an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new subpath.
    #[must_use]
    pub fn move_to(mut self, to: Vec2) -> Self {
        self.commands.push(PathCommand::MoveTo { to });
        self
    }

    /// Add a straight segment.
    #[must_use]
    pub fn line_to(mut self, to: Vec2) -> Self {
        self.commands.push(PathCommand::LineTo { to });
        self
    }

    /// Add a circular arc.
    #[must_use]
    pub fn arc(mut self, center: Vec2, radius: f64, start: f64, end: f64) -> Self {
        self.commands.push(PathCommand::Arc {
            center,
            radius,
            start,
            end,
        });
        self
    }

    /// Close the current subpath.
    #[must_use]
    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Closed polygon through `points`.
    #[must_use]
    pub fn polygon(points: &[Vec2]) -> Self {
        let mut path = Self::new();
        let mut iter = points.iter();
        if let Some(&first) = iter.next() {
            path = path.move_to(first);
            for &p in iter {
                path = path.line_to(p);
            }
            path = path.close();
        }
        path
    }

    /// Rectangle of `size` centered on the origin.
    #[must_use]
    pub fn rect(size: Vec2) -> Self {
        let h = size.half();
        Self::polygon(&[
            Vec2::new(-h.x, -h.y),
            Vec2::new(h.x, -h.y),
            Vec2::new(h.x, h.y),
            Vec2::new(-h.x, h.y),
        ])
    }

    /// Full circle of `radius` centered on the origin.
    #[must_use]
    pub fn circle(radius: f64) -> Self {
        Self::new()
            .arc(Vec2::zero(), radius, 0.0, std::f64::consts::TAU)
            .close()
    }

    /// The recorded commands.
    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Whether the path has no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Immediate-mode drawing vocabulary used by the core.
///
/// Implementations keep a current transform that `translate` and `rotate`
/// compose onto, the same way a browser 2D context does.
pub trait Surface {
    /// Clear a rectangle to transparent, in current coordinates.
    fn clear_rect(&mut self, origin: Vec2, size: Vec2);

    /// Replace the current transform.
    fn set_transform(&mut self, transform: Transform2);

    /// Reset to the identity (device pixel) transform.
    fn reset_transform(&mut self) {
        self.set_transform(Transform2::IDENTITY);
    }

    /// Translate the current transform.
    fn translate(&mut self, offset: Vec2);

    /// Rotate the current transform by `angle` radians.
    fn rotate(&mut self, angle: f64);

    /// Set the fill style (CSS color string).
    fn set_fill_style(&mut self, style: &str);

    /// Set the stroke style (CSS color string).
    fn set_stroke_style(&mut self, style: &str);

    /// Set the stroke width.
    fn set_line_width(&mut self, width: f64);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2);

    /// Stroke an axis-aligned rectangle.
    fn stroke_rect(&mut self, origin: Vec2, size: Vec2);

    /// Fill a path.
    fn fill_path(&mut self, path: &Path);

    /// Stroke a path.
    fn stroke_path(&mut self, path: &Path);

    /// Draw an image into the rectangle at `origin` with `size`.
    fn draw_image(&mut self, image: &ImageSource, origin: Vec2, size: Vec2);

    /// Draw text with its top-left corner at `at`.
    fn fill_text(&mut self, text: &str, at: Vec2);
}

/// A single recorded surface call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
#[allow(missing_docs)] // Fields mirror the `Surface` method arguments
pub enum DrawCommand {
    ClearRect { origin: Vec2, size: Vec2 },
    SetTransform { transform: Transform2 },
    Translate { offset: Vec2 },
    Rotate { angle: f64 },
    FillStyle { style: String },
    StrokeStyle { style: String },
    LineWidth { width: f64 },
    FillRect { origin: Vec2, size: Vec2 },
    StrokeRect { origin: Vec2, size: Vec2 },
    FillPath { path: Path },
    StrokePath { path: Path },
    DrawImage { image: ImageSource, origin: Vec2, size: Vec2 },
    FillText { text: String, at: Vec2 },
}

/// A [`Surface`] that records every call and tracks the current transform.
///
/// Used for headless rendering and to assert on draw output in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    transform: Transform2,
}

impl RecordingSurface {
    /// Create an empty recorder with the identity transform.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded commands, in call order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// The current transform after every recorded call.
    #[must_use]
    pub fn transform(&self) -> Transform2 {
        self.transform
    }

    /// Drop recorded commands and reset the transform.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.transform = Transform2::IDENTITY;
    }

    /// Take the recorded commands, leaving the recorder empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of recorded commands matching `pred`.
    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Surface for RecordingSurface {
    fn clear_rect(&mut self, origin: Vec2, size: Vec2) {
        self.commands.push(DrawCommand::ClearRect { origin, size });
    }

    fn set_transform(&mut self, transform: Transform2) {
        self.transform = transform;
        self.commands.push(DrawCommand::SetTransform { transform });
    }

    fn translate(&mut self, offset: Vec2) {
        self.transform = self
            .transform
            .then(&Transform2::scale_translate(1.0, offset));
        self.commands.push(DrawCommand::Translate { offset });
    }

    fn rotate(&mut self, angle: f64) {
        let (sin, cos) = angle.sin_cos();
        let rotation = Transform2 {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        };
        self.transform = self.transform.then(&rotation);
        self.commands.push(DrawCommand::Rotate { angle });
    }

    fn set_fill_style(&mut self, style: &str) {
        self.commands.push(DrawCommand::FillStyle {
            style: style.to_string(),
        });
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.commands.push(DrawCommand::StrokeStyle {
            style: style.to_string(),
        });
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::LineWidth { width });
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2) {
        self.commands.push(DrawCommand::FillRect { origin, size });
    }

    fn stroke_rect(&mut self, origin: Vec2, size: Vec2) {
        self.commands.push(DrawCommand::StrokeRect { origin, size });
    }

    fn fill_path(&mut self, path: &Path) {
        self.commands.push(DrawCommand::FillPath { path: path.clone() });
    }

    fn stroke_path(&mut self, path: &Path) {
        self.commands
            .push(DrawCommand::StrokePath { path: path.clone() });
    }

    fn draw_image(&mut self, image: &ImageSource, origin: Vec2, size: Vec2) {
        self.commands.push(DrawCommand::DrawImage {
            image: image.clone(),
            origin,
            size,
        });
    }

    fn fill_text(&mut self, text: &str, at: Vec2) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            at,
        });
    }
}
