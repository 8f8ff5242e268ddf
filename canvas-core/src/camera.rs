//! Pan/zoom camera and screen ↔ world conversion.
//!
//! Screen space is device pixels of the drawing surface, origin top-left.
//! World space is where items live. The camera maps one onto the other with a
//! uniform scale followed by a translation:
//!
//! ```text
//! screen = world * scale + pos
//! world  = (screen - pos) / scale
//! ```

use crate::config::{CameraConfig, CullMode};
use crate::surface::{Surface, Transform2};
use crate::{Box2, Vec2};

/// Camera state for one editing session.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pos: Vec2,
    scale: f64,
    viewport: Vec2,
    limits: CameraConfig,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl Camera {
    /// Create an identity camera with the given zoom limits and an empty viewport.
    #[must_use]
    pub fn new(limits: CameraConfig) -> Self {
        Self {
            pos: Vec2::zero(),
            scale: 1.0,
            viewport: Vec2::zero(),
            limits,
        }
    }

    /// Pan offset in screen pixels.
    #[must_use]
    pub const fn pos(&self) -> Vec2 {
        self.pos
    }

    /// Current zoom factor.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Configured zoom limits.
    #[must_use]
    pub const fn limits(&self) -> &CameraConfig {
        &self.limits
    }

    /// Convert a screen-space point to world space.
    #[must_use]
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.pos).scale(1.0 / self.scale)
    }

    /// Convert a world-space point to screen space.
    #[must_use]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world.scale(self.scale) + self.pos
    }

    /// Convert a world-space box to screen space.
    #[must_use]
    pub fn box_to_screen(&self, world: &Box2) -> Box2 {
        world.apply(|v| self.to_screen(v))
    }

    /// Multiply the scale by `multiplier`, keeping `anchor` (screen space) fixed.
    ///
    /// The world point under `anchor` is the same before and after the call.
    /// Returns `false` and leaves the camera untouched when the resulting
    /// scale would leave the configured limits.
    pub fn zoom_at(&mut self, anchor: Vec2, multiplier: f64) -> bool {
        let next = self.scale * multiplier;
        if !(multiplier.is_finite() && multiplier > 0.0)
            || next < self.limits.min_scale
            || next > self.limits.max_scale
        {
            tracing::trace!(
                scale = self.scale,
                multiplier,
                "zoom rejected: outside [{}, {}]",
                self.limits.min_scale,
                self.limits.max_scale
            );
            return false;
        }
        self.pos = anchor - (anchor - self.pos).scale(multiplier);
        self.scale = next;
        true
    }

    /// Move the view by a screen-space delta. Never clamped.
    pub fn pan(&mut self, delta: Vec2) {
        self.pos = self.pos + delta;
    }

    /// Back to zero pan and unit scale.
    pub fn reset(&mut self) {
        self.pos = Vec2::zero();
        self.scale = 1.0;
        tracing::debug!("camera reset");
    }

    /// Pan so that `world` appears at the center of the viewport.
    pub fn center_on(&mut self, world: Vec2) {
        self.pos = self.viewport_half() - world.scale(self.scale);
    }

    /// Update the surface size in device pixels.
    pub fn set_viewport(&mut self, size: Vec2) {
        self.viewport = size;
    }

    /// Surface size in device pixels.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Half the surface size.
    #[must_use]
    pub fn viewport_half(&self) -> Vec2 {
        self.viewport.half()
    }

    /// Viewport rectangle in screen space.
    #[must_use]
    pub fn viewport_box(&self) -> Box2 {
        Box2::from_origin_and_size(Vec2::zero(), self.viewport)
    }

    /// Whether an item centered at `world_pos` with `world_bounds` lies fully on screen.
    ///
    /// This is a conservative culling test: items partly off screen report
    /// `false` and are skipped by [`CullMode::Contained`] drawing.
    #[must_use]
    pub fn in_viewport(&self, world_pos: Vec2, world_bounds: Vec2) -> bool {
        let screen = self.box_to_screen(&Box2::from_center_and_size(world_pos, world_bounds));
        self.viewport_box().contains_box(&screen)
    }

    /// Whether an item centered at `world_pos` with `world_bounds` is at least partly on screen.
    #[must_use]
    pub fn overlaps_viewport(&self, world_pos: Vec2, world_bounds: Vec2) -> bool {
        let screen = self.box_to_screen(&Box2::from_center_and_size(world_pos, world_bounds));
        self.viewport_box().intersects(&screen)
    }

    /// Visibility test according to `mode`.
    #[must_use]
    pub fn is_visible(&self, world_pos: Vec2, world_bounds: Vec2, mode: CullMode) -> bool {
        match mode {
            CullMode::Contained => self.in_viewport(world_pos, world_bounds),
            CullMode::Overlap => self.overlaps_viewport(world_pos, world_bounds),
        }
    }

    /// The world → screen transform.
    #[must_use]
    pub fn transform(&self) -> Transform2 {
        Transform2::scale_translate(self.scale, self.pos)
    }

    /// Make subsequent drawing on `surface` interpreted in world space.
    pub fn apply_transform(&self, surface: &mut dyn Surface) {
        surface.set_transform(self.transform());
    }

    /// Return `surface` to screen space.
    pub fn clear_transform(&self, surface: &mut dyn Surface) {
        surface.reset_transform();
    }

    /// Run `draw` in world space, restoring screen space afterwards.
    ///
    /// The transform is cleared on every return path of `draw`, including
    /// early returns through `?`.
    pub fn in_world_space<T>(
        &self,
        surface: &mut dyn Surface,
        draw: impl FnOnce(&mut dyn Surface) -> T,
    ) -> T {
        self.apply_transform(surface);
        let out = draw(&mut *surface);
        self.clear_transform(surface);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    const EPSILON: f64 = 1e-9;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPSILON * a.x.abs().max(1.0)
            && (a.y - b.y).abs() < EPSILON * a.y.abs().max(1.0)
    }

    fn camera(pos: Vec2, scale: f64) -> Camera {
        let mut cam = Camera::default();
        cam.pan(pos);
        cam.scale = scale;
        cam.set_viewport(Vec2::new(800.0, 600.0));
        cam
    }

    #[test]
    fn test_identity_conversion() {
        let cam = Camera::default();
        assert_eq!(cam.to_world(Vec2::new(50.0, 75.0)), Vec2::new(50.0, 75.0));
        assert_eq!(cam.to_screen(Vec2::new(50.0, 75.0)), Vec2::new(50.0, 75.0));
    }

    #[test]
    fn test_to_world_with_pan_and_zoom() {
        let cam = camera(Vec2::new(20.0, 10.0), 2.0);
        assert!(approx(cam.to_world(Vec2::new(20.0, 10.0)), Vec2::zero()));
        assert!(approx(cam.to_world(Vec2::new(40.0, 30.0)), Vec2::new(10.0, 10.0)));
        assert!(approx(cam.to_screen(Vec2::new(5.0, 5.0)), Vec2::new(30.0, 20.0)));
    }

    #[test]
    fn test_round_trips() {
        let cams = [
            camera(Vec2::zero(), 1.0),
            camera(Vec2::new(50.0, -30.0), 2.0),
            camera(Vec2::new(13.7, -42.3), 0.75),
            camera(Vec2::new(-900.0, 4000.0), 0.02),
            camera(Vec2::new(1.0, 1.0), 1999.0),
        ];
        let points = [
            Vec2::zero(),
            Vec2::new(400.0, 300.0),
            Vec2::new(-333.3, 999.9),
            Vec2::new(1e5, -1e5),
        ];
        for cam in &cams {
            for &p in &points {
                assert!(approx(cam.to_screen(cam.to_world(p)), p));
                assert!(approx(cam.to_world(cam.to_screen(p)), p));
            }
        }
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut cam = camera(Vec2::new(35.0, -12.0), 1.3);
        let anchor = Vec2::new(412.0, 187.0);
        for k in [1.1, 1.0 / 1.1, 3.0, 0.5] {
            let before = cam.to_world(anchor);
            assert!(cam.zoom_at(anchor, k));
            assert!(approx(cam.to_world(anchor), before));
        }
    }

    #[test]
    fn test_zoom_outside_limits_is_noop() {
        let mut cam = camera(Vec2::new(5.0, 5.0), 0.021);
        let snapshot = cam.clone();
        assert!(!cam.zoom_at(Vec2::new(100.0, 100.0), 0.5));
        assert_eq!(cam, snapshot);

        let mut cam = camera(Vec2::zero(), 1900.0);
        assert!(!cam.zoom_at(Vec2::zero(), 1.1));
        assert!((cam.scale() - 1900.0).abs() < EPSILON);
    }

    #[test]
    fn test_zoom_rejects_non_positive_multiplier() {
        let mut cam = Camera::default();
        assert!(!cam.zoom_at(Vec2::zero(), 0.0));
        assert!(!cam.zoom_at(Vec2::zero(), -2.0));
        assert!(!cam.zoom_at(Vec2::zero(), f64::NAN));
        assert!((cam.scale() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_pan_and_reset() {
        let mut cam = Camera::default();
        cam.pan(Vec2::new(123.0, -45.0));
        assert!(cam.zoom_at(Vec2::new(10.0, 10.0), 2.0));
        cam.reset();
        assert_eq!(cam.pos(), Vec2::zero());
        assert!((cam.scale() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_center_on() {
        let mut cam = camera(Vec2::zero(), 2.0);
        cam.center_on(Vec2::new(10.0, 10.0));
        assert!(approx(cam.to_screen(Vec2::new(10.0, 10.0)), Vec2::new(400.0, 300.0)));
        assert_eq!(cam.viewport_half(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_in_viewport_is_fully_inside() {
        let cam = camera(Vec2::zero(), 1.0);
        assert!(cam.in_viewport(Vec2::new(100.0, 100.0), Vec2::new(20.0, 20.0)));
        // Straddles the left edge.
        assert!(!cam.in_viewport(Vec2::new(5.0, 100.0), Vec2::new(20.0, 20.0)));
        assert!(cam.overlaps_viewport(Vec2::new(5.0, 100.0), Vec2::new(20.0, 20.0)));
        // Entirely off screen.
        assert!(!cam.overlaps_viewport(Vec2::new(-50.0, 100.0), Vec2::new(20.0, 20.0)));
        assert!(!cam.is_visible(Vec2::new(5.0, 100.0), Vec2::new(20.0, 20.0), CullMode::Contained));
        assert!(cam.is_visible(Vec2::new(5.0, 100.0), Vec2::new(20.0, 20.0), CullMode::Overlap));
    }

    #[test]
    fn test_world_space_bracket_is_symmetric() {
        let cam = camera(Vec2::new(7.0, 9.0), 3.0);
        let mut surface = RecordingSurface::new();
        let drawn = cam.in_world_space(&mut surface, |s| {
            s.fill_rect(Vec2::zero(), Vec2::uniform(1.0));
            42
        });
        assert_eq!(drawn, 42);
        assert_eq!(surface.transform(), Transform2::IDENTITY);
        assert_eq!(
            surface.commands().first(),
            Some(&DrawCommand::SetTransform {
                transform: Transform2::scale_translate(3.0, Vec2::new(7.0, 9.0))
            })
        );
    }
}
