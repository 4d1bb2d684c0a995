//! Per-station 24h sparkline rendering
//!
//! Each call rasterizes one series into a small transparent PNG with a
//! stroked line and the area between the line and zero shaded. There are no
//! axes or ticks. Calls share nothing, so charts cannot leak state between
//! stations.

use crate::encoding::Rgb;
use crate::{Error, Result};
use base64::Engine as Base64Engine;
use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

/// Fractional padding added around the data range on each axis
const DATA_MARGIN: f32 = 0.05;

/// Visual parameters of a sparkline
#[derive(Debug, Clone)]
pub struct SparklineStyle {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    pub line_color: Rgb,
    /// Stroke width in pixels
    pub line_width: f32,
    pub fill_color: Rgb,
    /// Fill opacity in `[0, 1]`
    pub fill_alpha: f32,
}

impl Default for SparklineStyle {
    // 2.4in x 0.7in at 120 dpi with a 1.4pt line
    fn default() -> Self {
        Self {
            width: 288,
            height: 84,
            line_color: Rgb(0x2b, 0x8c, 0xbe),
            line_width: 1.4 * 120.0 / 72.0,
            fill_color: Rgb(0xa6, 0xbd, 0xdb),
            fill_alpha: 0.4,
        }
    }
}

/// Axis-aligned mapping from data space to pixel space
struct Frame {
    x_min: f32,
    x_span: f32,
    y_min: f32,
    y_span: f32,
    width: f32,
    height: f32,
}

impl Frame {
    fn fit(values: &[f64], width: u32, height: u32) -> Self {
        let (x_min, x_max) = padded(0.0, values.len().saturating_sub(1) as f32);
        // The shaded area reaches zero, so zero is always in view.
        let (lo, hi) = values
            .iter()
            .map(|v| *v as f32)
            .fold((0.0f32, 0.0f32), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let (y_min, y_max) = padded(lo, hi);
        Self {
            x_min,
            x_span: x_max - x_min,
            y_min,
            y_span: y_max - y_min,
            width: width as f32,
            height: height as f32,
        }
    }

    fn x(&self, i: usize) -> f32 {
        (i as f32 - self.x_min) / self.x_span * self.width
    }

    fn y(&self, v: f32) -> f32 {
        self.height - (v - self.y_min) / self.y_span * self.height
    }
}

fn padded(lo: f32, hi: f32) -> (f32, f32) {
    if hi - lo <= f32::EPSILON {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * DATA_MARGIN;
    (lo - pad, hi + pad)
}

fn color(rgb: Rgb, alpha: f32) -> Color {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::from_rgba8(rgb.0, rgb.1, rgb.2, a)
}

/// Render `values` as a PNG sparkline
pub fn render_sparkline(values: &[f64], style: &SparklineStyle) -> Result<Vec<u8>> {
    let mut pixmap = Pixmap::new(style.width, style.height).ok_or_else(|| {
        Error::ChartError(format!("invalid canvas size {}x{}", style.width, style.height))
    })?;
    pixmap.fill(Color::TRANSPARENT);

    let series: Vec<f32> = values
        .iter()
        .map(|v| if v.is_finite() { *v as f32 } else { 0.0 })
        .collect();

    if !series.is_empty() {
        let frame = Frame::fit(values, style.width, style.height);
        let baseline = frame.y(0.0);

        let mut area = PathBuilder::new();
        area.move_to(frame.x(0), baseline);
        for (i, v) in series.iter().enumerate() {
            area.line_to(frame.x(i), frame.y(*v));
        }
        area.line_to(frame.x(series.len() - 1), baseline);
        area.close();

        let mut fill = Paint::default();
        fill.set_color(color(style.fill_color, style.fill_alpha));
        fill.anti_alias = true;
        if let Some(path) = area.finish() {
            pixmap.fill_path(&path, &fill, FillRule::Winding, Transform::identity(), None);
        }

        let mut line = PathBuilder::new();
        line.move_to(frame.x(0), frame.y(series[0]));
        if series.len() == 1 {
            // A single sample still gets a visible tick
            line.line_to(frame.x(0) + style.line_width, frame.y(series[0]));
        }
        for (i, v) in series.iter().enumerate().skip(1) {
            line.line_to(frame.x(i), frame.y(*v));
        }

        let mut paint = Paint::default();
        paint.set_color(color(style.line_color, 1.0));
        paint.anti_alias = true;

        let stroke = Stroke {
            width: style.line_width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        if let Some(path) = line.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    pixmap
        .encode_png()
        .map_err(|e| Error::ChartError(format!("PNG encoding failed: {}", e)))
}

/// Render `values` and wrap the PNG in a `data:` URI suitable for an `<img src>`
pub fn sparkline_data_uri(values: &[f64], style: &SparklineStyle) -> Result<String> {
    let png = render_sparkline(values, style)?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    ))
}
