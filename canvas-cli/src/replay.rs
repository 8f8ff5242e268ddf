//! Replay of pointer input against a headless editor.

use std::fs;

use anyhow::{bail, Context};
use canvas_core::{
    Effect, Editor, EditorConfig, FrameStats, InputSource, InteractionMode, Item, ItemId, ItemRef,
    MouseButton, Path, PointerEvent, ScriptedInput, Vec2,
};
use canvas_renderer::{BackendType, Renderer, RendererConfig};
use serde::Serialize;

use crate::ReplayConfig;

/// Distance between demo grid cells, in world units.
const GRID_STEP: f64 = 80.0;

/// Side of a demo item, in world units.
const ITEM_SIDE: f64 = 40.0;

/// Offset of the extra item that overlaps the first grid cell.
const OVERLAP_OFFSET: Vec2 = Vec2::new(15.0, 0.0);

/// Camera state at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraReport {
    /// Pan offset in device pixels.
    pub pos: Vec2,
    /// Zoom factor.
    pub scale: f64,
}

/// Editor state after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Items on the canvas.
    pub items: usize,
    /// Events replayed.
    pub events: usize,
    /// Effect of each event, in order.
    pub effects: Vec<Effect>,
    /// Interaction mode after the last event.
    pub mode: InteractionMode,
    /// Selected item IDs, in paint order.
    pub selected: Vec<ItemId>,
    /// Intersecting item pairs.
    pub collisions: Vec<(ItemId, ItemId)>,
    /// Final camera.
    pub camera: CameraReport,
    /// Frames rendered, including the one before the first event.
    pub frames: u64,
    /// Counters of the final frame.
    pub last_frame: FrameStats,
}

impl Report {
    /// Serialize the report.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self, pretty: bool) -> anyhow::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// Centers of an `n` by `n` grid around the world origin, row by row.
fn grid_centers(n: usize) -> impl Iterator<Item = Vec2> {
    #[allow(clippy::cast_precision_loss)]
    let half = (n.saturating_sub(1)) as f64 / 2.0;
    (0..n).flat_map(move |row| {
        (0..n).map(move |col| {
            #[allow(clippy::cast_precision_loss)]
            let cell = Vec2::new(col as f64 - half, row as f64 - half);
            cell.scale(GRID_STEP)
        })
    })
}

/// Populate `editor` with an `n` by `n` grid of items plus one item
/// overlapping the first cell.
///
/// Cells cycle through placeholder, square and triangle payloads and turn
/// by 15 degrees each; every fourth cell does not collide. Returns the
/// number of items added.
pub fn demo_layout(editor: &mut Editor, n: usize) -> usize {
    let size = Vec2::uniform(ITEM_SIDE);
    let h = size.half();
    let mut first = None;
    let mut added = 0;
    for (i, center) in grid_centers(n).enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let mut item = Item::new(center, size)
            .with_rotation_degrees(15.0 * i as f64)
            .with_collides(i % 4 != 3);
        item = match i % 3 {
            1 => item.with_path(Path::rect(size)),
            2 => item.with_path(Path::polygon(&[
                Vec2::new(0.0, -h.y),
                Vec2::new(h.x, h.y),
                Vec2::new(-h.x, h.y),
            ])),
            _ => item,
        };
        first.get_or_insert(center);
        editor.add_item(item);
        added += 1;
    }
    if let Some(first) = first {
        editor.add_item(Item::new(first + OVERLAP_OFFSET, size));
        added += 1;
    }
    tracing::debug!("Demo layout with {} items", added);
    added
}

/// A session over [`demo_layout`]: pick the first cell, drag it, marquee the
/// whole grid, then zoom in at the viewport center.
///
/// Client positions are derived from the editor's current camera and canvas
/// metrics, so the script matches any viewport size and pixel ratio.
#[must_use]
pub fn demo_script(editor: &Editor, n: usize) -> ScriptedInput {
    let mut script = ScriptedInput::default();
    let Some(first) = grid_centers(n).next() else {
        return script;
    };
    let metrics = editor.interaction().metrics();
    let to_client = |world: Vec2| metrics.to_client(editor.camera().to_screen(world));
    let primary = MouseButton::Primary;

    // Clear of the overlapping item, which covers the first cell's right side.
    let pick = to_client(first - Vec2::uniform(12.0));
    script.push(PointerEvent::Down {
        client: pick,
        button: primary,
    });
    script.push(PointerEvent::Up {
        client: pick,
        button: primary,
    });

    script.push(PointerEvent::Down {
        client: pick,
        button: primary,
    });
    let mut last = pick;
    for dx in [10.0, 30.0] {
        let client = to_client(first - Vec2::uniform(12.0) + Vec2::new(dx, 0.0));
        script.push(PointerEvent::Move {
            client,
            movement: client - last,
        });
        last = client;
    }
    script.push(PointerEvent::Up {
        client: last,
        button: primary,
    });

    #[allow(clippy::cast_precision_loss)]
    let reach = (n.saturating_sub(1)) as f64 / 2.0 * GRID_STEP + ITEM_SIDE + 60.0;
    let from = to_client(Vec2::uniform(-reach));
    let to = to_client(Vec2::uniform(reach));
    script.push(PointerEvent::Down {
        client: from,
        button: primary,
    });
    script.push(PointerEvent::Move {
        client: to,
        movement: to - from,
    });
    script.push(PointerEvent::Up {
        client: to,
        button: primary,
    });

    script.push(PointerEvent::Wheel {
        client: to_client(Vec2::zero()),
        delta_y: -100.0,
    });
    script
}

fn load_config(config: &ReplayConfig) -> anyhow::Result<EditorConfig> {
    match &config.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EditorConfig::from_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))
        }
        None => Ok(EditorConfig::default()),
    }
}

fn load_script(config: &ReplayConfig, editor: &Editor) -> anyhow::Result<ScriptedInput> {
    match &config.script {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading script {}", path.display()))?;
            ScriptedInput::from_json(&json)
                .with_context(|| format!("parsing script {}", path.display()))
        }
        None => Ok(demo_script(editor, config.layout)),
    }
}

/// Build an editor, replay the input and report the outcome.
///
/// One frame is rendered before the first event and one after each event.
///
/// # Errors
///
/// Returns an error if the viewport is unusable, a file cannot be read or
/// parsed, a frame fails, or the frame dump cannot be written.
pub fn run(config: &ReplayConfig) -> anyhow::Result<Report> {
    if !(config.width > 0.0 && config.height > 0.0 && config.dpr > 0.0) {
        bail!(
            "viewport must be positive, got {}x{} at dpr {}",
            config.width,
            config.height,
            config.dpr
        );
    }

    let mut editor = Editor::new(load_config(config)?)?;
    editor.set_viewport(config.width, config.height, config.dpr, Vec2::zero());
    editor.center_origin();
    let items = demo_layout(&mut editor, config.layout);

    let size = editor.camera().viewport();
    // Backing store sizes are whole device pixels.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (width, height) = (size.x.round().max(1.0) as u32, size.y.round().max(1.0) as u32);
    let mut renderer = Renderer::new(RendererConfig {
        preferred_backend: BackendType::Headless,
        width,
        height,
        ..RendererConfig::default()
    })?;
    renderer.render(&editor)?;

    let mut script = load_script(config, &editor)?;
    let mut effects = Vec::with_capacity(script.len());
    while let Some(event) = script.next_event() {
        effects.push(editor.handle_event(event));
        renderer.render(&editor)?;
    }
    tracing::info!(
        "Replayed {} events over {} items in {} frames",
        effects.len(),
        items,
        renderer.frame_count()
    );

    if let Some(path) = &config.frame_dump {
        let frame = renderer.backend().last_frame().unwrap_or_default();
        fs::write(path, serde_json::to_string_pretty(frame)?)
            .with_context(|| format!("writing frame dump {}", path.display()))?;
        tracing::debug!("Wrote {} draw calls to {}", frame.len(), path.display());
    }

    Ok(Report {
        items: editor.items().len(),
        events: effects.len(),
        effects,
        mode: editor.mode(),
        selected: editor.selection().selected().iter().map(ItemRef::id).collect(),
        collisions: editor.collisions().map(|c| (c.a.id(), c.b.id())).collect(),
        camera: CameraReport {
            pos: editor.camera().pos(),
            scale: editor.camera().scale(),
        },
        frames: renderer.frame_count(),
        last_frame: renderer.last_stats(),
    })
}
