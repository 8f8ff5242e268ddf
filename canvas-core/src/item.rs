//! Items - the drawable entities placed on the canvas.

use std::cell::{Ref, RefCell, RefMut};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Palette;
use crate::surface::{ImageSource, Path, Surface};
use crate::{Box2, Vec2};

/// Line width of the placeholder outline, in world units.
const PLACEHOLDER_LINE_WIDTH: f64 = 5.0;

/// Line width of path payload outlines, in world units.
const PATH_LINE_WIDTH: f64 = 1.0;

/// Unique identifier for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Create a new unique item ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an item will draw, after payload resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload<'a> {
    /// A raster or vector image.
    Image(&'a ImageSource),
    /// A vector outline.
    Path(&'a Path),
    /// No payload yet: a circle as wide as the item.
    Placeholder,
}

/// A positioned, rotatable, optionally collidable drawable.
///
/// `pos` is the item center in its collection's frame. `size` is the
/// unrotated width and height; the rotated extent is derived on every call to
/// [`Item::bounds`] and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: ItemId,
    pos: Vec2,
    size: Vec2,
    rotation: f64,
    collides: bool,
    path: Option<Path>,
    image: Option<ImageSource>,
}

impl Item {
    /// Create an unrotated, collidable item with no payload.
    #[must_use]
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            id: ItemId::new(),
            pos,
            size,
            rotation: 0.0,
            collides: true,
            path: None,
            image: None,
        }
    }

    /// Use a specific ID.
    #[must_use]
    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }

    /// Set rotation in radians.
    #[must_use]
    pub fn with_rotation(mut self, radians: f64) -> Self {
        self.rotation = radians;
        self
    }

    /// Set rotation in degrees.
    #[must_use]
    pub fn with_rotation_degrees(self, degrees: f64) -> Self {
        self.with_rotation(degrees.to_radians())
    }

    /// Set whether the item takes part in collision detection.
    #[must_use]
    pub fn with_collides(mut self, collides: bool) -> Self {
        self.collides = collides;
        self
    }

    /// Set the vector outline payload.
    #[must_use]
    pub fn with_path(mut self, path: Path) -> Self {
        self.path = Some(path);
        self
    }

    /// Set the image payload.
    #[must_use]
    pub fn with_image(mut self, image: ImageSource) -> Self {
        self.image = Some(image);
        self
    }

    /// Item ID.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// Center position.
    #[must_use]
    pub const fn pos(&self) -> Vec2 {
        self.pos
    }

    /// Move the center to `pos`.
    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Shift the center by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        self.pos = self.pos + offset;
    }

    /// Unrotated width and height.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Replace the unrotated size.
    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Rotation in radians.
    #[must_use]
    pub const fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Rotation in degrees.
    #[must_use]
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation.to_degrees()
    }

    /// Set rotation in radians.
    pub fn set_rotation(&mut self, radians: f64) {
        self.rotation = radians;
    }

    /// Set rotation in degrees.
    pub fn set_rotation_degrees(&mut self, degrees: f64) {
        self.rotation = degrees.to_radians();
    }

    /// Whether the item takes part in collision detection.
    #[must_use]
    pub const fn collides(&self) -> bool {
        self.collides
    }

    /// Set whether the item takes part in collision detection.
    pub fn set_collides(&mut self, collides: bool) {
        self.collides = collides;
    }

    /// Vector outline payload, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Set or clear the vector outline payload.
    pub fn set_path(&mut self, path: Option<Path>) {
        self.path = path;
    }

    /// Image payload, if any.
    #[must_use]
    pub fn image(&self) -> Option<&ImageSource> {
        self.image.as_ref()
    }

    /// Set or clear the image payload.
    pub fn set_image(&mut self, image: Option<ImageSource>) {
        self.image = image;
    }

    /// Resolve the payload to draw: image, then path, then placeholder.
    #[must_use]
    pub fn payload(&self) -> Payload<'_> {
        match (&self.image, &self.path) {
            (Some(image), _) => Payload::Image(image),
            (None, Some(path)) => Payload::Path(path),
            (None, None) => Payload::Placeholder,
        }
    }

    /// Axis-aligned size of the rotated item.
    #[must_use]
    pub fn bounds(&self) -> Vec2 {
        Box2::from_center_and_size(Vec2::zero(), self.size)
            .rotated_about(Vec2::zero(), self.rotation)
            .size()
    }

    /// Axis-aligned box of the rotated item around its center.
    #[must_use]
    pub fn bounding_box(&self) -> Box2 {
        Box2::from_center_and_size(self.pos, self.bounds())
    }

    /// Draw the payload centered on the local origin.
    ///
    /// The caller has already translated to the item position. Rotation is
    /// applied here and undone before returning, so the surface transform is
    /// the same on exit as on entry.
    pub fn draw(&self, surface: &mut dyn Surface, palette: &Palette) {
        let rotated = self.rotation != 0.0;
        if rotated {
            surface.rotate(self.rotation);
        }

        match self.payload() {
            Payload::Image(image) => {
                surface.draw_image(image, -self.size.half(), self.size);
            }
            Payload::Path(path) => {
                surface.set_fill_style(&palette.item_fill);
                surface.fill_path(path);
                surface.set_stroke_style(&palette.item_stroke);
                surface.set_line_width(PATH_LINE_WIDTH);
                surface.stroke_path(path);
            }
            Payload::Placeholder => {
                let circle = Path::circle(self.size.x / 2.0);
                surface.set_fill_style(&palette.item_fill);
                surface.fill_path(&circle);
                surface.set_stroke_style(&palette.item_stroke);
                surface.set_line_width(PLACEHOLDER_LINE_WIDTH);
                surface.stroke_path(&circle);
            }
        }

        if rotated {
            surface.rotate(-self.rotation);
        }
    }
}

/// Shared handle to an [`Item`].
///
/// Collections hold handles rather than items, so a selection and the
/// candidate set it was picked from see the same item. Equality and hashing
/// are by identity: two handles are equal only if they point at the same
/// allocation, even when the items themselves compare equal.
#[derive(Debug, Clone)]
pub struct ItemRef(Rc<RefCell<Item>>);

impl ItemRef {
    /// Wrap an item in a new handle.
    #[must_use]
    pub fn new(item: Item) -> Self {
        Self(Rc::new(RefCell::new(item)))
    }

    /// Borrow the item.
    ///
    /// # Panics
    ///
    /// Panics if the item is currently mutably borrowed.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, Item> {
        self.0.borrow()
    }

    /// Mutably borrow the item.
    ///
    /// # Panics
    ///
    /// Panics if the item is currently borrowed.
    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, Item> {
        self.0.borrow_mut()
    }

    /// ID of the referenced item.
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.0.borrow().id()
    }

    /// Whether both handles point at the same item.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Item> for ItemRef {
    fn from(item: Item) -> Self {
        Self::new(item)
    }
}

impl PartialEq for ItemRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ItemRef {}

impl Hash for ItemRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface, Transform2};
    use std::f64::consts::FRAC_PI_2;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_item_id_unique() {
        assert_ne!(ItemId::new(), ItemId::new());
        let uuid = Uuid::new_v4();
        assert_eq!(ItemId::from_uuid(uuid).to_string(), uuid.to_string());
    }

    #[test]
    fn test_bounds_follow_rotation() {
        let mut item = Item::new(Vec2::new(5.0, 5.0), Vec2::new(20.0, 10.0));
        assert_eq!(item.bounds(), Vec2::new(20.0, 10.0));

        item.set_rotation(FRAC_PI_2);
        let b = item.bounds();
        assert!((b.x - 10.0).abs() < EPSILON);
        assert!((b.y - 20.0).abs() < EPSILON);

        item.set_rotation_degrees(45.0);
        let diag = (20.0_f64 + 10.0) / 2.0_f64.sqrt();
        assert!((item.bounds().x - diag).abs() < EPSILON);
        assert!((item.rotation_degrees() - 45.0).abs() < EPSILON);
    }

    #[test]
    fn test_bounding_box_is_centered() {
        let item = Item::new(Vec2::new(100.0, 50.0), Vec2::new(10.0, 4.0));
        let b = item.bounding_box();
        assert_eq!(b.center(), Vec2::new(100.0, 50.0));
        assert_eq!(b.min(), Vec2::new(95.0, 48.0));
    }

    #[test]
    fn test_payload_precedence() {
        let item = Item::new(Vec2::zero(), Vec2::uniform(10.0));
        assert_eq!(item.payload(), Payload::Placeholder);

        let item = item.with_path(Path::rect(Vec2::uniform(10.0)));
        assert!(matches!(item.payload(), Payload::Path(_)));

        let item = item.with_image(ImageSource::new("chip.png"));
        assert!(matches!(item.payload(), Payload::Image(img) if img.src == "chip.png"));
    }

    #[test]
    fn test_draw_is_transform_neutral() {
        let item = Item::new(Vec2::zero(), Vec2::new(8.0, 4.0)).with_rotation(0.3);
        let mut surface = RecordingSurface::new();
        surface.set_transform(Transform2::scale_translate(2.0, Vec2::new(3.0, 4.0)));
        let before = surface.transform();
        item.draw(&mut surface, &Palette::default());
        let after = surface.transform();
        for (x, y) in [
            (before.a, after.a),
            (before.b, after.b),
            (before.c, after.c),
            (before.d, after.d),
            (before.e, after.e),
            (before.f, after.f),
        ] {
            assert!((x - y).abs() < EPSILON);
        }
    }

    #[test]
    fn test_placeholder_circle_diameter_is_width() {
        let item = Item::new(Vec2::zero(), Vec2::new(12.0, 30.0));
        let mut surface = RecordingSurface::new();
        item.draw(&mut surface, &Palette::default());
        assert_eq!(
            surface.commands().iter().find_map(|c| match c {
                DrawCommand::FillPath { path } => Some(path.clone()),
                _ => None,
            }),
            Some(Path::circle(6.0))
        );
        // Unrotated items never touch the transform.
        assert_eq!(
            surface.count(|c| matches!(c, DrawCommand::Rotate { .. })),
            0
        );
    }

    #[test]
    fn test_image_drawn_centered() {
        let item = Item::new(Vec2::zero(), Vec2::new(40.0, 20.0))
            .with_image(ImageSource::new("r0603.svg"));
        let mut surface = RecordingSurface::new();
        item.draw(&mut surface, &Palette::default());
        assert_eq!(
            surface.commands(),
            &[DrawCommand::DrawImage {
                image: ImageSource::new("r0603.svg"),
                origin: Vec2::new(-20.0, -10.0),
                size: Vec2::new(40.0, 20.0),
            }]
        );
    }

    #[test]
    fn test_item_ref_identity() {
        let item = Item::new(Vec2::zero(), Vec2::uniform(1.0));
        let a = ItemRef::new(item.clone());
        let b = ItemRef::new(item);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());

        let alias = a.clone();
        alias.borrow_mut().translate(Vec2::new(2.0, 0.0));
        assert_eq!(a.borrow().pos(), Vec2::new(2.0, 0.0));
        assert_eq!(b.borrow().pos(), Vec2::zero());
    }
}
