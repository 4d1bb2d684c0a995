//! Color and size encoding of the target-stock field
//!
//! A single [`Domain`] is computed once from the dataset and shared by value
//! with everything that draws a color or a size: the markers, the discrete
//! legend and the tick legend. They therefore always agree on bin
//! boundaries.

use crate::dataset::StationRecord;
use std::fmt;

/// Smallest marker radius in pixels
pub const RADIUS_MIN: f64 = 6.0;
/// Largest marker radius in pixels
pub const RADIUS_MAX: f64 = 24.0;
/// Number of discrete color bins
pub const COLOR_STEPS: usize = 6;
/// Number of ranges listed in the tick legend
pub const TICK_RANGES: usize = 5;

/// Diverging palette: blue, light blue, pale yellow, orange, red
pub const DIVERGING_PALETTE: [Rgb; 5] = [
    Rgb(0x2b, 0x83, 0xba),
    Rgb(0x91, 0xbf, 0xdb),
    Rgb(0xff, 0xff, 0xbf),
    Rgb(0xfc, 0x8d, 0x59),
    Rgb(0xd7, 0x19, 0x1c),
];

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear blend towards `other`; `t` is clamped to `[0, 1]`
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Shared numeric range for color and size scaling. Never degenerate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    min: f64,
    max: f64,
}

impl Domain {
    /// Build a domain, widening it by one on each side when `min == max`
    pub fn new(min: f64, max: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        if min == max {
            Self { min: min - 1.0, max: max + 1.0 }
        } else {
            Self { min, max }
        }
    }

    /// Domain spanning the finite values of `values`, `None` when there are none
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        Some(Self::new(min, max))
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` within the domain, unclamped
    pub fn fraction(&self, value: f64) -> f64 {
        (value - self.min) / self.width()
    }

    /// `n` evenly spaced points from `min` to `max` inclusive
    pub fn linspace(&self, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![self.min],
            _ => {
                let step = self.width() / (n - 1) as f64;
                (0..n)
                    .map(|i| if i == n - 1 { self.max } else { self.min + step * i as f64 })
                    .collect()
            }
        }
    }
}

/// Continuous colormap interpolating across evenly spaced stops
#[derive(Debug, Clone)]
pub struct LinearColormap {
    stops: Vec<Rgb>,
    domain: Domain,
}

impl LinearColormap {
    pub fn new(stops: &[Rgb], domain: Domain) -> Self {
        Self { stops: stops.to_vec(), domain }
    }

    pub fn color(&self, value: f64) -> Rgb {
        match self.stops.len() {
            0 => Rgb(0, 0, 0),
            1 => self.stops[0],
            n => {
                let pos = self.domain.fraction(value).clamp(0.0, 1.0) * (n - 1) as f64;
                let lower = (pos.floor() as usize).min(n - 2);
                self.stops[lower].lerp(self.stops[lower + 1], pos - lower as f64)
            }
        }
    }

    /// Snap into `steps` equal-width bins. Bin `i` takes the continuous color
    /// at a point sliding from the left edge of the first bin to the right
    /// edge of the last, so the extreme palette stops are both kept.
    pub fn to_step(&self, steps: usize) -> StepColormap {
        let steps = steps.max(1);
        let index = self.domain.linspace(steps + 1);
        let colors = (0..steps)
            .map(|i| {
                let t = if steps == 1 { 0.0 } else { i as f64 / (steps - 1) as f64 };
                self.color(index[i] * (1.0 - t) + index[i + 1] * t)
            })
            .collect();
        StepColormap { colors, index }
    }
}

/// Piecewise-constant colormap over equal-width bins
#[derive(Debug, Clone)]
pub struct StepColormap {
    colors: Vec<Rgb>,
    /// Bin boundaries; one more entry than `colors`
    index: Vec<f64>,
}

impl StepColormap {
    pub fn color(&self, value: f64) -> Rgb {
        let first = self.index[0];
        let last = self.index[self.index.len() - 1];
        // NaN falls into the first bin
        if !(value > first) {
            return self.colors[0];
        }
        if value >= last {
            return self.colors[self.colors.len() - 1];
        }
        let i = self.index.iter().filter(|b| **b <= value).count();
        self.colors[i - 1]
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.index
    }
}

/// One row of the tick legend: a value range and its swatch color
#[derive(Debug, Clone, PartialEq)]
pub struct TickRange {
    pub lower: f64,
    pub upper: f64,
    pub color: Rgb,
}

impl TickRange {
    /// Bounds rounded half-to-even
    pub fn label(&self) -> String {
        format!(
            "{} — {}",
            self.lower.round_ties_even() as i64,
            self.upper.round_ties_even() as i64
        )
    }
}

/// Color and radius scales computed once for the whole dataset
#[derive(Debug, Clone)]
pub struct Encoding {
    domain: Domain,
    colormap: StepColormap,
}

impl Encoding {
    pub fn new(domain: Domain) -> Self {
        let colormap = LinearColormap::new(&DIVERGING_PALETTE, domain).to_step(COLOR_STEPS);
        Self { domain, colormap }
    }

    /// Encoding over the target stock of `stations` (missing values count as zero)
    pub fn for_target_stock(stations: &[StationRecord]) -> Option<Self> {
        Domain::from_values(stations.iter().map(StationRecord::target_or_zero)).map(Self::new)
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn colormap(&self) -> &StepColormap {
        &self.colormap
    }

    /// Fill color of the bin containing `value`
    pub fn color(&self, value: f64) -> Rgb {
        self.colormap.color(value)
    }

    /// Marker radius in `[RADIUS_MIN, RADIUS_MAX]`, clamped outside the domain
    pub fn radius(&self, value: f64) -> f64 {
        let frac = self.domain.fraction(value);
        let frac = if frac.is_nan() { 0.0 } else { frac.clamp(0.0, 1.0) };
        RADIUS_MIN + frac * (RADIUS_MAX - RADIUS_MIN)
    }

    /// Ranges for the tick legend, each colored at its midpoint
    pub fn tick_ranges(&self) -> Vec<TickRange> {
        self.domain
            .linspace(TICK_RANGES + 1)
            .windows(2)
            .map(|w| TickRange {
                lower: w[0],
                upper: w[1],
                color: self.color((w[0] + w[1]) / 2.0),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_formats_as_lowercase_hex() {
        assert_eq!(DIVERGING_PALETTE[0].to_hex(), "#2b83ba");
        assert_eq!(Rgb(0, 10, 255).to_string(), "#000aff");
    }

    #[test]
    fn degenerate_domain_is_widened() {
        let d = Domain::from_values([4.0, 4.0, 4.0]).unwrap();
        assert_eq!((d.min(), d.max()), (3.0, 5.0));
    }

    #[test]
    fn empty_domain_is_none() {
        assert!(Domain::from_values(Vec::<f64>::new()).is_none());
        assert!(Domain::from_values([f64::NAN]).is_none());
    }

    #[test]
    fn linspace_hits_both_ends() {
        let d = Domain::new(0.0, 10.0);
        assert_eq!(d.linspace(6), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn linear_colormap_hits_stops() {
        let cm = LinearColormap::new(&DIVERGING_PALETTE, Domain::new(0.0, 4.0));
        assert_eq!(cm.color(0.0), DIVERGING_PALETTE[0]);
        assert_eq!(cm.color(2.0), DIVERGING_PALETTE[2]);
        assert_eq!(cm.color(4.0), DIVERGING_PALETTE[4]);
        assert_eq!(cm.color(99.0), DIVERGING_PALETTE[4]);
    }

    #[test]
    fn step_colormap_keeps_palette_ends() {
        let enc = Encoding::new(Domain::new(0.0, 12.0));
        let colors = enc.colormap().colors();
        assert_eq!(colors.len(), COLOR_STEPS);
        assert_eq!(colors[0], DIVERGING_PALETTE[0]);
        assert_eq!(colors[COLOR_STEPS - 1], DIVERGING_PALETTE[4]);
    }

    #[test]
    fn step_colormap_bins_on_boundaries() {
        let enc = Encoding::new(Domain::new(0.0, 12.0));
        let colors = enc.colormap().colors().to_vec();
        assert_eq!(enc.color(-5.0), colors[0]);
        assert_eq!(enc.color(1.9), colors[0]);
        assert_eq!(enc.color(2.0), colors[1]);
        assert_eq!(enc.color(11.9), colors[5]);
        assert_eq!(enc.color(12.0), colors[5]);
        assert_eq!(enc.color(f64::NAN), colors[0]);
    }

    #[test]
    fn radius_is_clamped() {
        let enc = Encoding::new(Domain::new(0.0, 10.0));
        assert_eq!(enc.radius(-100.0), RADIUS_MIN);
        assert_eq!(enc.radius(0.0), RADIUS_MIN);
        assert_eq!(enc.radius(5.0), 15.0);
        assert_eq!(enc.radius(10.0), RADIUS_MAX);
        assert_eq!(enc.radius(1e9), RADIUS_MAX);
    }

    #[test]
    fn tick_ranges_cover_domain_with_midpoint_colors() {
        let enc = Encoding::new(Domain::new(0.0, 10.0));
        let ticks = enc.tick_ranges();
        assert_eq!(ticks.len(), TICK_RANGES);
        assert_eq!(ticks[0].lower, 0.0);
        assert_eq!(ticks[4].upper, 10.0);
        assert_eq!(ticks[0].color, enc.color(1.0));
        assert_eq!(ticks[0].label(), "0 — 2");
    }

    #[test]
    fn tick_labels_round_halves_to_even() {
        let enc = Encoding::new(Domain::new(0.0, 2.5));
        let labels: Vec<String> = enc.tick_ranges().iter().map(TickRange::label).collect();
        assert_eq!(labels, vec!["0 — 0", "0 — 1", "1 — 2", "2 — 2", "2 — 2"]);
    }
}
