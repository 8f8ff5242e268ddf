//! Rendering backend implementations.

pub mod headless;

use canvas_core::{DrawCommand, Surface};

use crate::{BackendType, RenderResult};

/// Trait for rendering backends.
///
/// A backend owns the drawing surface the editor draws into. Frames are
/// bracketed by [`RenderBackend::begin_frame`] and [`RenderBackend::end_frame`].
pub trait RenderBackend {
    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// The surface to draw the current frame into.
    fn surface(&mut self) -> &mut dyn Surface;

    /// Prepare for a new frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface is unusable.
    fn begin_frame(&mut self) -> RenderResult<()> {
        Ok(())
    }

    /// Finish the current frame.
    ///
    /// # Errors
    ///
    /// Returns an error if presenting the frame fails.
    fn end_frame(&mut self) -> RenderResult<()> {
        Ok(())
    }

    /// Resize the rendering surface, in device pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if resizing fails.
    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()>;

    /// Draw calls of the last finished frame, for backends that record them.
    fn last_frame(&self) -> Option<&[DrawCommand]> {
        None
    }
}
