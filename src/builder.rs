//! Map builder pipeline: load, encode, compose, save

use crate::chart::{render_sparkline, SparklineStyle};
use crate::dataset::Dataset;
use crate::document::{
    compose_marker, FeatureLayer, LayerControl, MapDocument, Overlay, StepLegend, TileProvider,
};
use crate::encoding::Encoding;
use crate::{Error, Result, DEFAULT_CSV, DEFAULT_HTML};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub const TITLE_HEADING: &str = "타슈 자전거 스테이션 — Target Stock & 24h Trend";
pub const TITLE_HINT: &str = "각 마커를 클릭하면 24시간 스파크라인이 표시됩니다.";
pub const LEGEND_CAPTION: &str = "Target stock (discrete bins)";
pub const TICK_CAPTION: &str = "Target stock";
pub const STATION_LAYER: &str = "Stations (target_stock)";
/// Throwaway image written to check that chart rendering works
pub const DIAGNOSTIC_IMAGE: &str = "diag_test_plot.png";
const DIAGNOSTIC_LISTING_LIMIT: usize = 20;

/// Options for a map build
#[derive(Debug, Clone)]
pub struct MapOptions {
    /// Station CSV
    pub input: PathBuf,
    /// Destination HTML document
    pub output: PathBuf,
    pub tiles: TileProvider,
    pub zoom_start: u8,
    pub chart: SparklineStyle,
    /// Write the diagnostic image and directory listing next to the output
    pub diagnostics: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_CSV),
            output: PathBuf::from(DEFAULT_HTML),
            tiles: TileProvider::default(),
            zoom_start: 12,
            chart: SparklineStyle::default(),
            diagnostics: true,
        }
    }
}

/// What a successful build produced
#[derive(Debug, Clone)]
pub struct BuildSummary {
    /// Stations retained after cleaning
    pub rows: usize,
    /// Rows dropped during cleaning
    pub dropped: usize,
    pub markers: usize,
    pub output: PathBuf,
}

/// Load the CSV, assemble the document and write it.
///
/// Returns `Error::NotFound` when the CSV is missing and
/// `Error::EmptyDataset` when cleaning leaves nothing to plot; no output is
/// written in either case.
pub fn build_map(options: &MapOptions) -> Result<BuildSummary> {
    info!("Loading CSV from {}", options.input.display());
    let dataset = Dataset::load(&options.input)?;
    if dataset.is_empty() {
        return Err(Error::EmptyDataset);
    }

    if options.diagnostics {
        let dir = options
            .output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        run_diagnostics(dir);
    }

    let document = assemble_document(&dataset, options)?;
    document.save(&options.output)?;

    Ok(BuildSummary {
        rows: dataset.len(),
        dropped: dataset.dropped,
        markers: document.marker_count(),
        output: options.output.clone(),
    })
}

/// Compose the full map for a cleaned, non-empty dataset.
///
/// The encoding is computed once here and shared by the legend, every
/// marker and the tick legend.
pub fn assemble_document(dataset: &Dataset, options: &MapOptions) -> Result<MapDocument> {
    let center = dataset.mean_location().ok_or(Error::EmptyDataset)?;
    let encoding = Encoding::for_target_stock(&dataset.stations).ok_or(Error::EmptyDataset)?;

    let mut document = MapDocument::new(center, options.zoom_start, options.tiles.clone());
    document.title = TITLE_HEADING.to_string();
    document.legend = Some(StepLegend::from_encoding(LEGEND_CAPTION, &encoding));

    let mut layer = FeatureLayer::new(STATION_LAYER);
    for station in &dataset.stations {
        layer.add_marker(compose_marker(station, &encoding, &options.chart));
    }
    document.layers.push(layer);

    document.overlays.push(Overlay::title_panel(TITLE_HEADING, TITLE_HINT));
    match Overlay::tick_legend(TICK_CAPTION, &encoding.tick_ranges()) {
        Ok(overlay) => document.overlays.push(overlay),
        Err(e) => warn!("Tick legend skipped: {}", e),
    }

    document.layer_control = Some(LayerControl { collapsed: false });
    Ok(document)
}

/// Write the throwaway chart image and log part of the directory listing.
/// Failures are reported and otherwise ignored.
pub fn run_diagnostics(dir: &Path) {
    let image = dir.join(DIAGNOSTIC_IMAGE);
    let style = SparklineStyle {
        width: 100,
        height: 100,
        ..Default::default()
    };
    match render_sparkline(&[0.0, 1.0], &style).and_then(|png| fs::write(&image, png).map_err(Error::from)) {
        Ok(()) => info!("Wrote diagnostic image {}", image.display()),
        Err(e) => warn!("Diagnostic image failed: {}", e),
    }

    match list_dir(dir, DIAGNOSTIC_LISTING_LIMIT) {
        Ok(names) => info!("Directory listing of {}: {:?}", dir.display(), names),
        Err(e) => warn!("Listing failed: {}", e),
    }
}

fn list_dir(dir: &Path, limit: usize) -> Result<Vec<String>> {
    let mut names = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();
    names.truncate(limit);
    Ok(names)
}
