//! # Canvas Renderer
//!
//! Frame driver for the editor: owns a drawing backend, brackets each frame
//! and counts them.
//!
//! ## Rendering Backends
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            RenderBackend Trait              │
//! ├──────────────────────┬──────────────────────┤
//! │ Canvas2D             │ Headless             │
//! │ (DOM, supplied by    │ (records draw calls, │
//! │  the wasm host)      │  any platform)       │
//! └──────────────────────┴──────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod error;

pub use backend::headless::HeadlessBackend;
pub use backend::RenderBackend;
pub use error::{RenderError, RenderResult};

use canvas_core::{Editor, FrameStats};
use serde::{Deserialize, Serialize};

/// Configuration for the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Preferred backend.
    pub preferred_backend: BackendType,
    /// Use the headless backend when the preferred one is unavailable.
    pub allow_fallback: bool,
    /// Initial surface width in device pixels.
    pub width: u32,
    /// Initial surface height in device pixels.
    pub height: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            preferred_backend: BackendType::Canvas2D,
            allow_fallback: true,
            width: 800,
            height: 600,
        }
    }
}

/// Available rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// Browser 2D canvas context.
    Canvas2D,
    /// Recording backend with no display.
    Headless,
}

/// The main renderer interface.
pub struct Renderer {
    config: RendererConfig,
    backend: Box<dyn RenderBackend>,
    frame_count: u64,
    last_stats: FrameStats,
}

impl Renderer {
    /// Create a new renderer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NoBackend`] if the preferred backend is
    /// unavailable and fallback is disabled.
    pub fn new(config: RendererConfig) -> RenderResult<Self> {
        let backend = Self::create_backend(&config)?;
        Self::with_backend(config, backend)
    }

    /// Create a renderer around a backend supplied by the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot take the configured size.
    pub fn with_backend(
        config: RendererConfig,
        mut backend: Box<dyn RenderBackend>,
    ) -> RenderResult<Self> {
        backend.resize(config.width, config.height)?;
        Ok(Self {
            config,
            backend,
            frame_count: 0,
            last_stats: FrameStats::default(),
        })
    }

    /// Create the appropriate backend based on config and availability.
    fn create_backend(config: &RendererConfig) -> RenderResult<Box<dyn RenderBackend>> {
        match config.preferred_backend {
            BackendType::Canvas2D => {
                // A DOM context only exists inside the wasm host, which passes
                // its backend to `with_backend`.
                if !config.allow_fallback {
                    return Err(RenderError::NoBackend(
                        "Canvas2D needs a DOM canvas supplied by the host".to_string(),
                    ));
                }
                tracing::warn!("Canvas2D needs a DOM canvas, falling back to headless");
                Self::create_backend(&RendererConfig {
                    preferred_backend: BackendType::Headless,
                    ..config.clone()
                })
            }
            BackendType::Headless => Ok(Box::new(HeadlessBackend::new())),
        }
    }

    /// Render a frame of `editor`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend or the editor fails to draw.
    pub fn render(&mut self, editor: &Editor) -> RenderResult<FrameStats> {
        self.backend.begin_frame()?;
        let stats = editor.draw_frame(self.backend.surface())?;
        self.backend.end_frame()?;
        self.frame_count += 1;
        self.last_stats = stats;
        Ok(stats)
    }

    /// Get the current frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Counters of the last rendered frame.
    #[must_use]
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Get the active backend type.
    #[must_use]
    pub fn active_backend(&self) -> BackendType {
        self.backend.backend_type()
    }

    /// The active backend.
    #[must_use]
    pub fn backend(&self) -> &dyn RenderBackend {
        self.backend.as_ref()
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resize fails.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.backend.resize(width, height)?;
        self.config.width = width;
        self.config.height = height;
        Ok(())
    }
}
