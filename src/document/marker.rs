//! Station markers and their popup/tooltip content

use crate::chart::{sparkline_data_uri, SparklineStyle};
use crate::dataset::StationRecord;
use crate::encoding::Encoding;
use log::warn;
use serde::Serialize;

/// Outline color shared by all station markers
pub const MARKER_STROKE: &str = "#222222";
pub const MARKER_WEIGHT: f64 = 0.9;
pub const MARKER_FILL_OPACITY: f64 = 0.9;
/// Maximum popup width in CSS pixels
pub const POPUP_MAX_WIDTH: u32 = 320;

const BADGE_POSITIVE: &str = "#1a9850";
const BADGE_NEGATIVE: &str = "#d73027";

/// A circle marker for one station
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub radius: f64,
    /// `#rrggbb`
    pub fill_color: String,
    pub popup_html: String,
    pub tooltip: String,
}

/// Leaflet `circleMarker` options, serialized straight into the page script
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CircleMarkerOptions<'a> {
    radius: f64,
    color: &'a str,
    weight: f64,
    fill: bool,
    fill_color: &'a str,
    fill_opacity: f64,
}

impl Marker {
    pub(crate) fn options(&self) -> CircleMarkerOptions<'_> {
        CircleMarkerOptions {
            radius: self.radius,
            color: MARKER_STROKE,
            weight: MARKER_WEIGHT,
            fill: true,
            fill_color: &self.fill_color,
            fill_opacity: MARKER_FILL_OPACITY,
        }
    }
}

/// Compose the marker for `station`. A sparkline that fails to render is
/// logged and left out of the popup.
pub fn compose_marker(station: &StationRecord, encoding: &Encoding, chart: &SparklineStyle) -> Marker {
    let target = station.target_or_zero();
    let sparkline = match sparkline_data_uri(&station.hourly_net, chart) {
        Ok(uri) => Some(uri),
        Err(e) => {
            warn!("Sparkline for station '{}' skipped: {}", station.station_key, e);
            None
        }
    };

    Marker {
        lat: station.lat,
        lon: station.lon,
        radius: encoding.radius(target),
        fill_color: encoding.color(target).to_hex(),
        popup_html: popup_html(station, sparkline.as_deref()),
        tooltip: tooltip(station),
    }
}

/// Rich popup: name, mean-net badge, inventory fields, std and the sparkline
pub fn popup_html(station: &StationRecord, sparkline: Option<&str>) -> String {
    let mean_net = station.mean_net.unwrap_or(0.0);
    let std_net = station.std_net.unwrap_or(0.0);
    let badge = if mean_net >= 0.0 { BADGE_POSITIVE } else { BADGE_NEGATIVE };

    let img = sparkline
        .map(|src| {
            format!(
                r#"<img src="{}" style="width:240px;height:66px;display:block;margin-top:6px;border-radius:4px;"/>"#,
                src
            )
        })
        .unwrap_or_default();

    format!(
        concat!(
            r#"<div style="width:360px;font-family: Arial, sans-serif;">"#,
            r#"<div style="display:flex;align-items:center;justify-content:space-between;">"#,
            r#"<div style="font-weight:700;font-size:15px">{name}</div>"#,
            r#"<div style="background:{badge};color:#fff;padding:4px 8px;border-radius:6px;font-weight:700;font-size:13px">{mean:.2}</div>"#,
            r#"</div>"#,
            r#"<div style="margin-top:6px;font-size:13px;color:#333;display:flex;justify-content:space-between;">"#,
            r#"<div style="min-width:160px;">"#,
            r#"<div>Station: <b>{key}</b></div>"#,
            r#"<div>Target: <b>{target}</b></div>"#,
            r#"<div>Initial: <b>{initial}</b></div>"#,
            r#"<div>Rebal: <b>{rebal}</b></div>"#,
            r#"</div>"#,
            r#"<div style="text-align:right;min-width:120px;">"#,
            r#"<div style="font-size:12px;color:#666">Std: {std:.2}</div>"#,
            r#"</div>"#,
            r#"</div>"#,
            "{img}",
            r#"</div>"#
        ),
        name = escape_html(&station.name),
        badge = badge,
        mean = mean_net,
        key = escape_html(&station.station_key),
        target = station.target_or_zero().trunc() as i64,
        initial = format_quantity(station.initial_stock),
        rebal = format_quantity(station.rebal_qty),
        std = std_net,
        img = img,
    )
}

/// Hover label: name, target and mean net flow
pub fn tooltip(station: &StationRecord) -> String {
    let mean = station
        .mean_net
        .map(|m| format!("{:.2}", m))
        .unwrap_or_default();
    format!(
        "{} — target {}, mean {}",
        escape_html(&station.name),
        format_quantity(Some(station.target_or_zero())),
        mean
    )
}

/// Whole numbers without a fractional part, others as-is, missing as empty
pub fn format_quantity(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => format!("{}", v),
        None => String::new(),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
