//! # Canvas Core
//!
//! Headless core of a pannable, zoomable 2D editing surface.
//! Compiles natively and to WASM; hosts supply drawing and input.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   Editor                    │
//! ├──────────────────────┬──────────────────────┤
//! │  Interaction         │  Selection           │
//! │  - Pan / zoom        │  - Candidates        │
//! │  - Marquee           │  - Selected set      │
//! │  - Move / pick       │  - Marquee box       │
//! ├──────────────────────┼──────────────────────┤
//! │  Camera              │  ItemCollection      │
//! │  - Screen ↔ world    │  - Paint order       │
//! │  - Culling           │  - Collisions        │
//! ├──────────────────────┴──────────────────────┤
//! │  Vec2 / Box2 geometry    Surface vocabulary │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! All angles are radians. World units relate to millimeters through
//! [`vec2::UNITS_PER_MM`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod box2;
pub mod camera;
pub mod collection;
pub mod config;
pub mod editor;
pub mod error;
pub mod event;
pub mod interaction;
pub mod item;
pub mod selection;
pub mod surface;
pub mod vec2;

pub use box2::Box2;
pub use camera::Camera;
pub use collection::{Collision, Collisions, ItemCollection};
pub use config::{CameraConfig, CullMode, EditorConfig, InteractionConfig, Palette, RenderConfig};
pub use editor::{Editor, FrameStats};
pub use error::{CanvasError, CanvasResult};
pub use event::{CanvasMetrics, InputSource, MouseButton, PointerEvent, ScriptedInput};
pub use interaction::{Effect, Interaction, InteractionMode};
pub use item::{Item, ItemId, ItemRef, Payload};
pub use selection::Selection;
pub use surface::{
    DrawCommand, ImageFormat, ImageSource, Path, PathCommand, RecordingSurface, Surface,
    Transform2,
};
pub use vec2::Vec2;

/// Canvas core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
