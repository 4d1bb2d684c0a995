//! station-map: build the interactive station map from the metrics CSV

use clap::Parser;
use std::path::PathBuf;
use stationmap::builder::{build_map, MapOptions};
use stationmap::document::TileProvider;
use stationmap::{Error, DEFAULT_CSV, DEFAULT_HTML};

#[derive(Parser)]
#[command(
    name = "station-map",
    version,
    about = "Render bike-share station metrics as an interactive map"
)]
struct Cli {
    /// Tile provider or a `{z}/{x}/{y}` URL template.
    ///
    /// Known providers: OpenStreetMap, "CartoDB positron", "CartoDB dark_matter",
    /// "CartoDB Voyager", OpenTopoMap, Esri.WorldImagery, Esri.WorldStreetMap
    #[arg(long, default_value = "OpenStreetMap")]
    tiles: String,

    /// Station metrics CSV, relative to the working directory
    #[arg(long, short, default_value = DEFAULT_CSV)]
    input: PathBuf,

    /// HTML document to write, relative to the working directory
    #[arg(long, short, default_value = DEFAULT_HTML)]
    output: PathBuf,

    /// Skip the diagnostic image and directory listing
    #[arg(long)]
    no_diagnostics: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let tiles: TileProvider = cli.tiles.parse()?;
    let cwd = std::env::current_dir()?;
    let options = MapOptions {
        input: cwd.join(&cli.input),
        output: cwd.join(&cli.output),
        tiles,
        diagnostics: !cli.no_diagnostics,
        ..Default::default()
    };

    match build_map(&options) {
        Ok(summary) => {
            println!("Loaded rows: {} ({} dropped)", summary.rows, summary.dropped);
            println!("Saved presentation map to {}", summary.output.display());
        }
        Err(Error::NotFound(path)) => println!("CSV not found: {}", path.display()),
        Err(Error::EmptyDataset) => println!("No data after cleaning, aborting"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
