//! Ordered item container with a group offset.
//!
//! Insertion order is paint order: later items are drawn on top and win
//! single-point picks. The group `pos` is added to every member position when
//! drawing and hit testing.

use std::slice;

use crate::camera::Camera;
use crate::config::{CullMode, Palette};
use crate::item::{Item, ItemId, ItemRef};
use crate::surface::Surface;
use crate::{Box2, CanvasError, CanvasResult, Vec2};

/// An ordered, duplicate-free list of item handles.
#[derive(Debug, Clone, Default)]
pub struct ItemCollection {
    items: Vec<ItemRef>,
    pos: Vec2,
}

impl ItemCollection {
    /// Create an empty collection at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collection with a group offset.
    #[must_use]
    pub fn with_pos(pos: Vec2) -> Self {
        Self {
            items: Vec::new(),
            pos,
        }
    }

    /// Group offset.
    #[must_use]
    pub const fn pos(&self) -> Vec2 {
        self.pos
    }

    /// Replace the group offset.
    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Append an item on top. Returns `false` if this handle is already present.
    pub fn add(&mut self, item: ItemRef) -> bool {
        if self.contains(&item) {
            tracing::trace!(id = %item.id(), "ignoring duplicate add");
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove an item by handle. Returns `false` if it was not present.
    pub fn remove(&mut self, item: &ItemRef) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i != item);
        self.items.len() != before
    }

    /// Remove an item by ID and return its handle.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ItemNotFound`] if no member has this ID.
    pub fn remove_by_id(&mut self, id: ItemId) -> CanvasResult<ItemRef> {
        let index = self
            .items
            .iter()
            .position(|i| i.id() == id)
            .ok_or(CanvasError::ItemNotFound(id))?;
        Ok(self.items.remove(index))
    }

    /// Find a member by ID.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&ItemRef> {
        self.items.iter().find(|i| i.id() == id)
    }

    /// Whether this handle is a member.
    #[must_use]
    pub fn contains(&self, item: &ItemRef) -> bool {
        self.items.iter().any(|i| i == item)
    }

    /// Remove every member. The group offset is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Members in paint order.
    pub fn iter(&self) -> slice::Iter<'_, ItemRef> {
        self.items.iter()
    }

    /// The topmost member.
    #[must_use]
    pub fn last(&self) -> Option<&ItemRef> {
        self.items.last()
    }

    /// Position of `item` with the group offset applied.
    #[must_use]
    pub fn world_pos(&self, item: &Item) -> Vec2 {
        self.pos + item.pos()
    }

    /// Bounding box of `item` with the group offset applied.
    #[must_use]
    pub fn world_box(&self, item: &Item) -> Box2 {
        item.bounding_box().translate(self.pos)
    }

    /// Members whose offset box contains `point` (inclusive), in paint order.
    ///
    /// The result shares handles with this collection and keeps its offset.
    #[must_use]
    pub fn items_under_point(&self, point: Vec2) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|i| self.world_box(&i.borrow()).contains_point(point))
                .cloned()
                .collect(),
            pos: self.pos,
        }
    }

    /// Translate every member by `offset`.
    pub fn move_items(&mut self, offset: Vec2) {
        for item in &self.items {
            item.borrow_mut().translate(offset);
        }
    }

    /// Draw visible members in paint order and return how many were drawn.
    ///
    /// Each item is drawn in its own frame: the surface is translated to the
    /// item's offset position and translated back afterwards, so the call has
    /// no net effect on the surface transform.
    pub fn draw(
        &self,
        surface: &mut dyn Surface,
        camera: &Camera,
        cull_mode: CullMode,
        palette: &Palette,
    ) -> usize {
        let mut drawn = 0;
        for item_ref in &self.items {
            let item = item_ref.borrow();
            let at = self.world_pos(&item);
            if !camera.is_visible(at, item.bounds(), cull_mode) {
                continue;
            }
            surface.translate(at);
            item.draw(surface, palette);
            surface.translate(-at);
            drawn += 1;
        }
        tracing::trace!(drawn, culled = self.items.len() - drawn, "items drawn");
        drawn
    }

    /// Lazily enumerate intersecting pairs of collidable members.
    ///
    /// Boxes are taken when this is called. Each unordered pair is reported
    /// once with `a` earlier than `b` in paint order. This is a plain
    /// O(k²) scan over the k collidable items.
    #[must_use]
    pub fn find_collisions(&self) -> Collisions {
        let candidates = self
            .items
            .iter()
            .filter(|i| i.borrow().collides())
            .map(|i| (i.clone(), self.world_box(&i.borrow())))
            .collect();
        Collisions {
            candidates,
            i: 0,
            j: 1,
        }
    }
}

impl<'a> IntoIterator for &'a ItemCollection {
    type Item = &'a ItemRef;
    type IntoIter = slice::Iter<'a, ItemRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<ItemRef> for ItemCollection {
    fn from_iter<T: IntoIterator<Item = ItemRef>>(iter: T) -> Self {
        let mut collection = Self::new();
        for item in iter {
            collection.add(item);
        }
        collection
    }
}

/// Two collidable items whose boxes intersect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// The earlier item in paint order.
    pub a: ItemRef,
    /// The later item in paint order.
    pub b: ItemRef,
}

impl Collision {
    /// Whether `item` is one side of this pair.
    #[must_use]
    pub fn involves(&self, item: &ItemRef) -> bool {
        &self.a == item || &self.b == item
    }
}

/// Iterator returned by [`ItemCollection::find_collisions`].
#[derive(Debug)]
pub struct Collisions {
    candidates: Vec<(ItemRef, Box2)>,
    i: usize,
    j: usize,
}

impl Iterator for Collisions {
    type Item = Collision;

    fn next(&mut self) -> Option<Collision> {
        let n = self.candidates.len();
        while self.i < n {
            while self.j < n {
                let (a, a_box) = &self.candidates[self.i];
                let (b, b_box) = &self.candidates[self.j];
                self.j += 1;
                if a_box.intersects(b_box) {
                    return Some(Collision {
                        a: a.clone(),
                        b: b.clone(),
                    });
                }
            }
            self.i += 1;
            self.j = self.i + 1;
        }
        None
    }
}
