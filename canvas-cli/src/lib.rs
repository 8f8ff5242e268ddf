//! # Canvas CLI
//!
//! Headless driver for the canvas editor. Builds a demo layout, replays a
//! pointer-event script through the editor, renders every step with the
//! recording backend and prints a JSON report of the resulting state.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p canvas-cli -- --layout 4 --dpr 2
//! cargo run -p canvas-cli -- --script drag.json --frame-dump frame.json
//! ```
//!
//! A script is a JSON array of pointer events:
//!
//! ```json
//! [
//!   { "type": "down", "client": { "x": 300, "y": 200 }, "button": "primary" },
//!   { "type": "move", "client": { "x": 340, "y": 200 }, "movement": { "x": 40, "y": 0 } },
//!   { "type": "up", "client": { "x": 340, "y": 200 }, "button": "primary" }
//! ]
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `ReplayConfig` - Viewport, layout and file locations for one run
//! - `replay::run` - Builds the editor, replays input and collects a `Report`

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

pub mod replay;

pub use replay::{demo_layout, demo_script, run, CameraReport, Report};

use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments for canvas-cli.
#[derive(Debug, Clone, Parser)]
#[command(name = "canvas-cli")]
#[command(about = "Replay pointer input through the canvas editor and report the result")]
#[command(version)]
pub struct CliArgs {
    /// Viewport width in CSS pixels
    #[arg(long, env = "CANVAS_VIEWPORT_WIDTH", default_value = "800")]
    pub width: f64,

    /// Viewport height in CSS pixels
    #[arg(long, env = "CANVAS_VIEWPORT_HEIGHT", default_value = "600")]
    pub height: f64,

    /// Device pixel ratio of the simulated display
    #[arg(long, env = "CANVAS_DPR", default_value = "1.0")]
    pub dpr: f64,

    /// Items per side of the demo grid
    #[arg(long, env = "CANVAS_LAYOUT", default_value = "3")]
    pub layout: usize,

    /// Editor configuration file (JSON)
    #[arg(long, env = "CANVAS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pointer event script (JSON); a built-in demo session is used if absent
    #[arg(long, env = "CANVAS_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Write the draw calls of the final frame to this file
    #[arg(long)]
    pub frame_dump: Option<PathBuf>,

    /// Pretty-print the report
    #[arg(long)]
    pub pretty: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "CANVAS_LOG_JSON")]
    pub log_json: bool,
}

/// Settings for one replay run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayConfig {
    /// Viewport width in CSS pixels.
    pub width: f64,
    /// Viewport height in CSS pixels.
    pub height: f64,
    /// Device pixel ratio.
    pub dpr: f64,
    /// Items per side of the demo grid.
    pub layout: usize,
    /// Editor configuration file.
    pub config: Option<PathBuf>,
    /// Pointer event script.
    pub script: Option<PathBuf>,
    /// Destination for the final frame's draw calls.
    pub frame_dump: Option<PathBuf>,
    /// Pretty-print the report.
    pub pretty: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplayConfig {
    /// Create a replay configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            dpr: 1.0,
            layout: 3,
            config: None,
            script: None,
            frame_dump: None,
            pretty: false,
        }
    }
}

impl From<CliArgs> for ReplayConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            width: args.width,
            height: args.height,
            dpr: args.dpr,
            layout: args.layout,
            config: args.config,
            script: args.script,
            frame_dump: args.frame_dump,
            pretty: args.pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::parse_from(["canvas-cli"]);
        let config = ReplayConfig::from(args);
        assert_eq!(config, ReplayConfig::new());
    }

    #[test]
    fn test_cli_overrides() {
        let args = CliArgs::parse_from([
            "canvas-cli",
            "--width",
            "1024",
            "--dpr",
            "2",
            "--layout",
            "5",
            "--script",
            "session.json",
            "--pretty",
        ]);
        let config = ReplayConfig::from(args);
        assert!((config.width - 1024.0).abs() < f64::EPSILON);
        assert!((config.dpr - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.layout, 5);
        assert_eq!(config.script, Some(PathBuf::from("session.json")));
        assert!(config.pretty);
    }
}
