//! Stationmap
//!
//! Builds a self-contained interactive map of bike-share stations and,
//! optionally, rasterizes that map to a PNG with a headless browser.
//!
//! The crate ships two programs that only meet on disk:
//!
//! - `station-map` loads the station CSV, scales marker color and size by
//!   target stock, draws a 24h sparkline per station and writes a Leaflet
//!   HTML document.
//! - `render-snapshot` loads that document in headless Chrome (CDP backend)
//!   and captures a fixed-size screenshot.
//!
//! # Example
//!
//! ```no_run
//! use stationmap::builder::{build_map, MapOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let summary = build_map(&MapOptions::default())?;
//! println!("{} markers written to {}", summary.markers, summary.output.display());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod builder;
pub mod chart;
pub mod dataset;
pub mod document;
pub mod encoding;
pub mod snapshot;

#[cfg(feature = "cdp")]
pub mod cdp;

/// Station CSV read by the map builder
pub const DEFAULT_CSV: &str = "tashu_station_net_metrics.csv";
/// Map document written by the map builder and read by the snapshot renderer
pub const DEFAULT_HTML: &str = "tashu_presentation_map.html";
/// Screenshot written by the snapshot renderer
pub const DEFAULT_PNG: &str = "tashu_presentation_map.png";
/// CSS class of the element hosting the Leaflet map
pub const MAP_CONTAINER_CLASS: &str = "station-map";

/// Configuration for launching a rendering engine
///
/// Defaults are headless, GPU-less and quiet. The sandbox is disabled because
/// snapshots commonly run inside containers where Chrome's sandbox cannot
/// start.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Browser window size in physical pixels
    pub viewport: Viewport,
    pub headless: bool,
    pub sandbox: bool,
    pub disable_gpu: bool,
    /// Whether to let the browser write its own verbose logs
    pub enable_logging: bool,
    /// Timeout for individual engine operations in milliseconds
    pub timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            headless: true,
            sandbox: false,
            disable_gpu: true,
            enable_logging: false,
            timeout_ms: 30000,
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Dimensions multiplied by a device pixel ratio
    pub fn scaled(self, scale: u32) -> Viewport {
        Viewport {
            width: self.width.saturating_mul(scale),
            height: self.height.saturating_mul(scale),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
        }
    }
}

/// Result of JavaScript execution
///
/// `value` is the serialized result of the evaluation (usually a JSON-like
/// string). `is_error` indicates whether the script threw an exception.
#[derive(Debug, Clone)]
pub struct ScriptResult {
    /// Serialized result value
    pub value: String,
    /// Whether the script threw an error
    pub is_error: bool,
}

/// Core trait for headless rendering engines used by the snapshot renderer
pub trait Engine {
    /// Launch a new engine instance with the given configuration
    fn new(config: EngineConfig) -> Result<Self>
    where
        Self: Sized;

    /// Override the emulated viewport and device pixel ratio
    fn set_device_metrics(&mut self, viewport: Viewport, device_scale: f64) -> Result<()>;

    /// Load a URL and wait for navigation to finish
    fn load_url(&mut self, url: &str) -> Result<()>;

    /// Evaluate JavaScript in the page context
    fn evaluate_script(&mut self, script: &str) -> Result<ScriptResult>;

    /// Capture the current frame as a PNG image
    fn render_png(&self) -> Result<Vec<u8>>;

    /// Shut the engine down and release its resources
    fn close(self) -> Result<()>;
}

/// Create a new engine instance with the default backend
#[cfg(feature = "cdp")]
pub fn new_engine(config: EngineConfig) -> Result<impl Engine> {
    cdp::CdpEngine::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.viewport.width, 1600);
        assert_eq!(config.viewport.height, 900);
        assert!(config.headless);
        assert!(!config.sandbox);
        assert!(config.disable_gpu);
        assert!(!config.enable_logging);
    }

    #[test]
    fn test_viewport_scaled() {
        let viewport = Viewport { width: 1600, height: 900 };
        assert_eq!(viewport.scaled(2), Viewport { width: 3200, height: 1800 });
        assert_eq!(viewport.scaled(1), viewport);
    }
}
