//! # Canvas CLI
//!
//! Replays pointer input through the canvas editor and prints a JSON report.

use canvas_cli::{CliArgs, ReplayConfig};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Logs go to stderr so stdout carries only the report.
    let json_logs = args.log_json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "canvas_cli=info,canvas_core=info,canvas_renderer=info".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    let config = ReplayConfig::from(args);
    tracing::info!(
        "Viewport {}x{} at dpr {}, layout {}",
        config.width,
        config.height,
        config.dpr,
        config.layout
    );

    let report = canvas_cli::run(&config)?;
    println!("{}", report.to_json(config.pretty)?);
    Ok(())
}
