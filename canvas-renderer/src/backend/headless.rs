//! Headless backend for hosts without a display.
//!
//! Records every draw call instead of rasterizing, so frames can be
//! inspected, diffed or dumped as JSON.

use canvas_core::{DrawCommand, RecordingSurface, Surface};

use crate::{BackendType, RenderError, RenderResult};

use super::RenderBackend;

/// Recording renderer.
#[derive(Debug)]
pub struct HeadlessBackend {
    width: u32,
    height: u32,
    recorder: RecordingSurface,
    last_frame: Vec<DrawCommand>,
}

impl HeadlessBackend {
    /// Create a new headless backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: 800,
            height: 600,
            recorder: RecordingSurface::new(),
            last_frame: Vec::new(),
        }
    }

    /// Surface size in device pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Serialize the last finished frame as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn frame_json(&self) -> RenderResult<String> {
        Ok(serde_json::to_string_pretty(&self.last_frame)?)
    }

    /// Log a single draw call for debugging purposes.
    fn trace_command(command: &DrawCommand) {
        match command {
            DrawCommand::FillPath { path } | DrawCommand::StrokePath { path } => {
                tracing::trace!("Path with {} segments", path.commands().len());
            }
            DrawCommand::DrawImage { image, origin, size } => {
                tracing::trace!("Image src={} at {origin} size {size}", image.src);
            }
            DrawCommand::FillText { text, at } => {
                tracing::trace!("Text '{text}' at {at}");
            }
            other => tracing::trace!("{other:?}"),
        }
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for HeadlessBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Headless
    }

    fn surface(&mut self) -> &mut dyn Surface {
        &mut self.recorder
    }

    fn begin_frame(&mut self) -> RenderResult<()> {
        self.recorder.clear();
        Ok(())
    }

    fn end_frame(&mut self) -> RenderResult<()> {
        self.last_frame = self.recorder.take_commands();
        tracing::trace!(
            "Headless frame {}x{} with {} commands",
            self.width,
            self.height,
            self.last_frame.len()
        );
        for command in &self.last_frame {
            Self::trace_command(command);
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::Surface(format!(
                "cannot resize to {width}x{height}"
            )));
        }
        self.width = width;
        self.height = height;
        tracing::debug!("Headless surface resized to {}x{}", width, height);
        Ok(())
    }

    fn last_frame(&self) -> Option<&[DrawCommand]> {
        Some(&self.last_frame)
    }
}
