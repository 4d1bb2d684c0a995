//! Fixed-position HTML panels and the discrete color legend

use super::marker::escape_html;
use crate::encoding::{Encoding, Rgb, TickRange};
use crate::{Error, Result};
use std::fmt::Write;

/// A raw HTML panel placed over the map, outside of Leaflet's control layout
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    html: String,
}

impl Overlay {
    pub fn from_html(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Title card pinned to the top-left corner
    pub fn title_panel(heading: &str, hint: &str) -> Self {
        Self::from_html(format!(
            concat!(
                r#"<div class="map-title" style="position: fixed; top: 10px; left: 50px; width: 380px; z-index:9999; font-size:18px; "#,
                r#"background-color: rgba(255,255,255,0.85); padding:8px; border-radius:6px;">"#,
                r#"<b>{}</b><br><span style="font-size:12px">{}</span></div>"#
            ),
            escape_html(heading),
            escape_html(hint)
        ))
    }

    /// Numeric legend pinned to the bottom-left corner, one row per range
    pub fn tick_legend(caption: &str, ticks: &[TickRange]) -> Result<Self> {
        if ticks.is_empty() {
            return Err(Error::RenderError("tick legend needs at least one range".into()));
        }
        if let Some(bad) = ticks.iter().find(|t| !(t.lower.is_finite() && t.upper.is_finite())) {
            return Err(Error::RenderError(format!(
                "non-finite tick range {} .. {}",
                bad.lower, bad.upper
            )));
        }

        let mut html = String::from(
            r#"<div class="tick-legend" style="position: fixed; bottom: 60px; left: 50px; z-index:9999; background: rgba(255,255,255,0.9); padding:8px; border-radius:6px; font-size:12px;">"#,
        );
        // Writing into a String cannot fail
        let _ = write!(html, "<b>{}</b><br>", escape_html(caption));
        for tick in ticks {
            let _ = write!(
                html,
                concat!(
                    r#"<div class="tick-row" style="display:flex;align-items:center;margin:3px 0;">"#,
                    r#"<span style="width:18px;height:12px;background:{};border:1px solid #333;margin-right:8px;"></span> {}</div>"#
                ),
                tick.color,
                tick.label()
            );
        }
        html.push_str("</div>");
        Ok(Self { html })
    }
}

/// Discrete color-scale legend rendered as a Leaflet control
#[derive(Debug, Clone, PartialEq)]
pub struct StepLegend {
    pub caption: String,
    pub colors: Vec<Rgb>,
    pub min: f64,
    pub max: f64,
}

impl StepLegend {
    pub fn from_encoding(caption: &str, encoding: &Encoding) -> Self {
        let domain = encoding.domain();
        Self {
            caption: caption.to_string(),
            colors: encoding.colormap().colors().to_vec(),
            min: domain.min(),
            max: domain.max(),
        }
    }

    /// Inner HTML of the legend control
    pub fn html(&self) -> String {
        let mut html = String::new();
        let _ = write!(html, r#"<div class="step-legend-caption">{}</div>"#, escape_html(&self.caption));
        html.push_str(r#"<div class="step-legend-bar">"#);
        for color in &self.colors {
            let _ = write!(html, r#"<span class="step-legend-swatch" style="background:{};"></span>"#, color);
        }
        html.push_str("</div>");
        let _ = write!(
            html,
            r#"<div class="step-legend-labels"><span>{}</span><span>{}</span></div>"#,
            trim_number(self.min),
            trim_number(self.max)
        );
        html
    }
}

fn trim_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Domain;

    #[test]
    fn tick_legend_lists_every_range() {
        let enc = Encoding::new(Domain::new(0.0, 10.0));
        let overlay = Overlay::tick_legend("Target stock", &enc.tick_ranges()).unwrap();
        assert_eq!(overlay.html().matches("tick-row").count(), 5);
        assert!(overlay.html().contains("<b>Target stock</b>"));
        assert!(overlay.html().contains("8 — 10"));
    }

    #[test]
    fn tick_legend_rejects_bad_input() {
        assert!(Overlay::tick_legend("x", &[]).is_err());
        let bad = TickRange { lower: f64::NAN, upper: 1.0, color: Rgb(0, 0, 0) };
        assert!(Overlay::tick_legend("x", &[bad]).is_err());
    }

    #[test]
    fn step_legend_has_one_swatch_per_bin() {
        let enc = Encoding::new(Domain::new(2.0, 8.5));
        let legend = StepLegend::from_encoding("Target stock (discrete bins)", &enc);
        let html = legend.html();
        assert_eq!(html.matches("step-legend-swatch").count(), 6);
        assert!(html.contains("<span>2</span>"));
        assert!(html.contains("<span>8.50</span>"));
    }

    #[test]
    fn title_panel_escapes_text() {
        let overlay = Overlay::title_panel("A & B", "hint");
        assert!(overlay.html().contains("<b>A &amp; B</b>"));
    }
}
