//! render-snapshot: capture a PNG of a map document with headless Chrome

use clap::Parser;
use std::path::PathBuf;
use stationmap::cdp::CdpEngine;
use stationmap::snapshot::{render_snapshot, settle_from_secs, SnapshotOptions};
use stationmap::{Viewport, DEFAULT_HTML, DEFAULT_PNG};

#[derive(Parser)]
#[command(
    name = "render-snapshot",
    version,
    about = "Render an HTML map document to a PNG"
)]
struct Cli {
    /// HTML document to render
    #[arg(long, short, default_value = DEFAULT_HTML)]
    input: PathBuf,

    /// PNG file to write
    #[arg(long, short, default_value = DEFAULT_PNG)]
    output: PathBuf,

    /// Logical width in CSS pixels
    #[arg(long, default_value_t = 1600)]
    width: u32,

    /// Logical height in CSS pixels
    #[arg(long, default_value_t = 900)]
    height: u32,

    /// Device pixel ratio
    #[arg(long, default_value_t = 2)]
    scale: u32,

    /// Seconds to wait for tiles after the page loads
    #[arg(long, default_value_t = 2.0)]
    wait: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let options = SnapshotOptions {
        input: cli.input,
        output: cli.output,
        viewport: Viewport {
            width: cli.width,
            height: cli.height,
        },
        scale: cli.scale,
        settle: settle_from_secs(cli.wait)?,
        ..Default::default()
    };

    let written = render_snapshot::<CdpEngine>(&options)?;
    println!("Wrote PNG: {}", written.display());
    Ok(())
}
