//! Interactive map document model and its HTML serialization
//!
//! A [`MapDocument`] is an ordered composition of a tiled base map, an
//! optional discrete legend, feature layers of circle markers, fixed HTML
//! overlays and an optional layer-visibility control. [`MapDocument::render`]
//! turns it into a single Leaflet page; marker data is embedded through
//! `serde_json` so every string lands in the script correctly escaped.

pub mod marker;
pub mod overlay;
pub mod tiles;

pub use marker::{compose_marker, Marker};
pub use overlay::{Overlay, StepLegend};
pub use tiles::TileProvider;

use crate::{Error, Result, MAP_CONTAINER_CLASS};
use log::info;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

const PAGE_STYLE: &str = r#"
    html, body { width: 100%; height: 100%; margin: 0; padding: 0; }
    .station-map { position: absolute; top: 0; bottom: 0; left: 0; right: 0; width: 100%; height: 100%; }
    .step-legend { background: rgba(255,255,255,0.9); padding: 6px 8px; border-radius: 6px; font: 12px Arial, sans-serif; }
    .step-legend-caption { font-weight: 700; margin-bottom: 4px; }
    .step-legend-bar { display: flex; }
    .step-legend-swatch { display: inline-block; width: 40px; height: 12px; }
    .step-legend-labels { display: flex; justify-content: space-between; margin-top: 2px; }
"#;

/// A named, toggleable group of markers
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLayer {
    pub name: String,
    pub markers: Vec<Marker>,
}

impl FeatureLayer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            markers: Vec::new(),
        }
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }
}

/// Layer-visibility widget settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerControl {
    pub collapsed: bool,
}

/// The interactive map page
#[derive(Debug, Clone)]
pub struct MapDocument {
    /// Page `<title>`
    pub title: String,
    /// Initial view center as `(lat, lon)`
    pub center: (f64, f64),
    pub zoom: u8,
    pub tiles: TileProvider,
    pub legend: Option<StepLegend>,
    pub layers: Vec<FeatureLayer>,
    pub overlays: Vec<Overlay>,
    pub layer_control: Option<LayerControl>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileOptions<'a> {
    attribution: &'a str,
    max_zoom: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PopupOptions {
    max_width: u32,
}

impl MapDocument {
    pub fn new(center: (f64, f64), zoom: u8, tiles: TileProvider) -> Self {
        Self {
            title: "Station map".to_string(),
            center,
            zoom,
            tiles,
            legend: None,
            layers: Vec::new(),
            overlays: Vec::new(),
            layer_control: None,
        }
    }

    pub fn marker_count(&self) -> usize {
        self.layers.iter().map(|l| l.markers.len()).sum()
    }

    /// Serialize the document to a standalone HTML page
    pub fn render(&self) -> Result<String> {
        let mut html = String::new();
        let _ = write!(
            html,
            concat!(
                "<!DOCTYPE html>\n<html>\n<head>\n",
                "<meta charset=\"utf-8\" />\n",
                "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n",
                "<title>{title}</title>\n",
                "<link rel=\"stylesheet\" href=\"{css}\" />\n",
                "<script src=\"{js}\"></script>\n",
                "<style>{style}</style>\n",
                "</head>\n<body>\n",
                "<div class=\"{class}\" id=\"map\"></div>\n"
            ),
            title = marker::escape_html(&self.title),
            css = LEAFLET_CSS,
            js = LEAFLET_JS,
            style = PAGE_STYLE,
            class = MAP_CONTAINER_CLASS,
        );

        for overlay in &self.overlays {
            html.push_str(overlay.html());
            html.push('\n');
        }

        html.push_str("<script>\n");
        html.push_str(&self.script()?);
        html.push_str("</script>\n</body>\n</html>\n");
        Ok(html)
    }

    fn script(&self) -> Result<String> {
        let mut js = String::new();
        let (lat, lon) = self.center;
        let _ = writeln!(
            js,
            "var map = L.map(\"map\", {{center: [{}, {}], zoom: {}}});",
            lat, lon, self.zoom
        );
        let _ = writeln!(
            js,
            "var baseLayer = L.tileLayer({}, {}).addTo(map);",
            js_value(&self.tiles.url)?,
            js_value(&TileOptions {
                attribution: &self.tiles.attribution,
                max_zoom: self.tiles.max_zoom,
            })?
        );

        if let Some(legend) = &self.legend {
            let _ = writeln!(js, "var legend = L.control({{position: \"topright\"}});");
            let _ = writeln!(
                js,
                "legend.onAdd = function () {{ var div = L.DomUtil.create(\"div\", \"step-legend\"); div.innerHTML = {}; return div; }};",
                js_value(&legend.html())?
            );
            let _ = writeln!(js, "legend.addTo(map);");
        }

        let popup_options = js_value(&PopupOptions { max_width: marker::POPUP_MAX_WIDTH })?;
        let mut overlay_entries = Vec::new();
        for (i, layer) in self.layers.iter().enumerate() {
            let var = format!("layer_{}", i);
            let _ = writeln!(js, "var {} = L.featureGroup();", var);
            for m in &layer.markers {
                let _ = writeln!(
                    js,
                    "L.circleMarker([{}, {}], {}).bindPopup({}, {}).bindTooltip({}).addTo({});",
                    m.lat,
                    m.lon,
                    js_value(&m.options())?,
                    js_value(&m.popup_html)?,
                    popup_options,
                    js_value(&m.tooltip)?,
                    var
                );
            }
            let _ = writeln!(js, "{}.addTo(map);", var);
            overlay_entries.push(format!("{}: {}", js_value(&layer.name)?, var));
        }

        if let Some(control) = &self.layer_control {
            let _ = writeln!(
                js,
                "L.control.layers({{{}: baseLayer}}, {{{}}}, {{collapsed: {}}}).addTo(map);",
                js_value(&self.tiles.name)?,
                overlay_entries.join(", "),
                control.collapsed
            );
        }
        Ok(js)
    }

    /// Render and write the page to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let html = self.render()?;
        fs::write(path, html)?;
        info!("Saved map document with {} markers to {}", self.marker_count(), path.display());
        Ok(())
    }
}

/// JSON-encode `value` for embedding in an inline script. `</` is escaped so
/// embedded text can never terminate the surrounding `<script>` element.
fn js_value<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map(|s| s.replace("</", "<\\/"))
        .map_err(|e| Error::RenderError(format!("failed to serialize script value: {}", e)))
}
