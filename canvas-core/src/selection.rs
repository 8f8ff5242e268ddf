//! Selection model: candidates, current selection and the live marquee.

use crate::camera::Camera;
use crate::collection::ItemCollection;
use crate::config::RenderConfig;
use crate::item::ItemRef;
use crate::surface::Surface;
use crate::{Box2, Vec2};

/// Highlight outline width in screen pixels.
const HIGHLIGHT_LINE_WIDTH: f64 = 2.0;

/// Marquee outline width in screen pixels.
const MARQUEE_LINE_WIDTH: f64 = 3.0;

/// Selectable items, the selected subset and the in-progress marquee box.
///
/// Every selected handle is also a member of the selectable set. Both sets
/// share the same group offset, so hit testing agrees between them.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selectable: ItemCollection,
    selected: ItemCollection,
    selection_box: Box2,
}

impl Selection {
    /// Create a selection over `selectable`, with nothing selected.
    #[must_use]
    pub fn new(selectable: ItemCollection) -> Self {
        Self {
            selected: ItemCollection::with_pos(selectable.pos()),
            selectable,
            selection_box: Box2::default(),
        }
    }

    /// The candidate items.
    #[must_use]
    pub const fn selectable(&self) -> &ItemCollection {
        &self.selectable
    }

    /// The current selection.
    #[must_use]
    pub const fn selected(&self) -> &ItemCollection {
        &self.selected
    }

    /// The in-progress marquee, in world space.
    #[must_use]
    pub const fn selection_box(&self) -> Box2 {
        self.selection_box
    }

    /// Add a candidate. Returns `false` if it is already one.
    pub fn add_selectable(&mut self, item: ItemRef) -> bool {
        self.selectable.add(item)
    }

    /// Drop an item from both sets. Returns `false` if it was not a candidate.
    pub fn remove_item(&mut self, item: &ItemRef) -> bool {
        self.selected.remove(item);
        self.selectable.remove(item)
    }

    /// Add a candidate to the selection.
    ///
    /// Returns `false` if the item is not a candidate or is already selected.
    pub fn select(&mut self, item: &ItemRef) -> bool {
        if !self.selectable.contains(item) {
            tracing::trace!(id = %item.id(), "not selectable");
            return false;
        }
        self.selected.add(item.clone())
    }

    /// Replace the marquee box.
    pub fn set_selection_box(&mut self, selection_box: Box2) {
        self.selection_box = selection_box;
    }

    /// Collapse the marquee to the zero box.
    pub fn clear_selection_box(&mut self) {
        self.selection_box = Box2::default();
    }

    /// Add every candidate fully inside the marquee to the selection.
    ///
    /// Partial overlap does not select. The existing selection is kept.
    /// Returns the number of newly selected items.
    pub fn select_from_box(&mut self) -> usize {
        let marquee = self.selection_box;
        let inside: Vec<ItemRef> = self
            .selectable
            .iter()
            .filter(|i| marquee.contains_box(&self.selectable.world_box(&i.borrow())))
            .cloned()
            .collect();
        let mut added = 0;
        for item in inside {
            if self.selected.add(item) {
                added += 1;
            }
        }
        tracing::debug!(%marquee, added, total = self.selected.len(), "marquee committed");
        added
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        if !self.selected.is_empty() {
            tracing::debug!(count = self.selected.len(), "selection cleared");
        }
        self.selected.clear();
    }

    /// Select the topmost candidate under `point` and return it.
    pub fn select_item_under_point(&mut self, point: Vec2) -> Option<ItemRef> {
        let topmost = self.selectable.items_under_point(point).last().cloned()?;
        self.selected.add(topmost.clone());
        tracing::debug!(id = %topmost.id(), "picked");
        Some(topmost)
    }

    /// Whether a selected item (not merely a candidate) lies under `point`.
    #[must_use]
    pub fn is_selected_item_under_point(&self, point: Vec2) -> bool {
        self.selected
            .iter()
            .any(|i| self.selected.world_box(&i.borrow()).contains_point(point))
    }

    /// Translate every selected item.
    pub fn move_selected(&mut self, offset: Vec2) {
        self.selected.move_items(offset);
    }

    /// Draw selection highlights and, if `show_marquee`, the marquee box.
    ///
    /// Must be called in world space. Line widths stay constant on screen.
    pub fn draw(
        &self,
        surface: &mut dyn Surface,
        camera: &Camera,
        show_marquee: bool,
        config: &RenderConfig,
    ) {
        let palette = &config.palette;
        let px = 1.0 / camera.scale();

        if !self.selected.is_empty() {
            surface.set_fill_style(&palette.selection_fill);
            surface.set_stroke_style(&palette.selection_stroke);
            surface.set_line_width(HIGHLIGHT_LINE_WIDTH * px);
            let padding = Vec2::uniform(config.selection_padding);
            for item in &self.selected {
                let highlight = self.selected.world_box(&item.borrow()).inflate(padding);
                surface.fill_rect(highlight.min(), highlight.size());
                surface.stroke_rect(highlight.min(), highlight.size());
            }
        }

        if show_marquee && !self.selection_box.is_degenerate() {
            let marquee = self.selection_box;
            surface.set_fill_style(&palette.marquee_fill);
            surface.fill_rect(marquee.min(), marquee.size());
            surface.set_stroke_style(&palette.marquee_stroke);
            surface.set_line_width(MARQUEE_LINE_WIDTH * px);
            surface.stroke_rect(marquee.min(), marquee.size());
        }
    }
}
