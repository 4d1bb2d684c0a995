//! Render a map document to a PNG with a headless engine
//!
//! The sequence is fixed: emulate the device metrics, load the page, sleep
//! while tiles arrive, try to resize the map container, sleep briefly, then
//! capture. Device metrics and the resize are cosmetic and only logged on
//! failure. The engine is closed whether or not the capture succeeded.

use crate::{Engine, EngineConfig, Error, Result, Viewport, DEFAULT_HTML, DEFAULT_PNG, MAP_CONTAINER_CLASS};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use url::Url;

/// Options for a single snapshot
#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    /// Map document to load
    pub input: PathBuf,
    /// PNG destination
    pub output: PathBuf,
    /// Logical page size in CSS pixels
    pub viewport: Viewport,
    /// Device pixel ratio
    pub scale: u32,
    /// Wait after loading, for tiles to arrive
    pub settle: Duration,
    /// Wait after the container resize
    pub resize_settle: Duration,
    /// Class of the element resized to `viewport`
    pub container_class: String,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_HTML),
            output: PathBuf::from(DEFAULT_PNG),
            viewport: Viewport::default(),
            scale: 2,
            settle: Duration::from_secs(2),
            resize_settle: Duration::from_millis(800),
            container_class: MAP_CONTAINER_CLASS.to_string(),
        }
    }
}

impl SnapshotOptions {
    /// Engine configuration: a window of `viewport * scale` physical pixels
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            viewport: self.viewport.scaled(self.scale),
            ..Default::default()
        }
    }
}

/// Convert a wait given in (possibly fractional) seconds
pub fn settle_from_secs(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| Error::ConfigError(format!("invalid wait of {} seconds: {}", secs, e)))
}

/// Absolute path and `file://` URL of an existing document
pub fn resolve_input(path: &Path) -> Result<(PathBuf, Url)> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    if !absolute.exists() {
        return Err(Error::NotFound(absolute));
    }
    let url = Url::from_file_path(&absolute)
        .map_err(|_| Error::ConfigError(format!("cannot build file URL for {}", absolute.display())))?;
    Ok((absolute, url))
}

/// Script that sizes the first element of `class` to `width` x `height` CSS pixels
pub fn resize_script(class: &str, viewport: Viewport) -> String {
    format!(
        concat!(
            "(function() {{ ",
            "var el = document.getElementsByClassName({class})[0]; ",
            "el.style.width = '{w}px'; ",
            "el.style.height = '{h}px'; ",
            "return true; ",
            "}})()"
        ),
        class = serde_json::Value::String(class.to_string()),
        w = viewport.width,
        h = viewport.height
    )
}

/// Render `options.input` to `options.output` with engine `E`.
///
/// The input is checked before the engine is launched. Returns the output
/// path once the PNG is written.
pub fn render_snapshot<E: Engine>(options: &SnapshotOptions) -> Result<PathBuf> {
    let (input, url) = resolve_input(&options.input)?;
    debug!("Rendering {} as {}", input.display(), url);

    let mut engine = E::new(options.engine_config())?;
    let captured = capture(&mut engine, url.as_str(), options);
    if let Err(e) = engine.close() {
        warn!("Failed to close engine: {}", e);
    }

    let png = captured?;
    fs::write(&options.output, &png)?;
    info!("Wrote {} bytes to {}", png.len(), options.output.display());
    Ok(options.output.clone())
}

fn capture<E: Engine>(engine: &mut E, url: &str, options: &SnapshotOptions) -> Result<Vec<u8>> {
    if let Err(e) = engine.set_device_metrics(options.viewport, options.scale as f64) {
        warn!("Device metrics override not applied: {}", e);
    }

    engine.load_url(url)?;
    thread::sleep(options.settle);

    match engine.evaluate_script(&resize_script(&options.container_class, options.viewport)) {
        Ok(res) if res.is_error => warn!("Map container resize threw: {}", res.value),
        Ok(_) => debug!("Resized map container to {}x{}", options.viewport.width, options.viewport.height),
        Err(e) => warn!("Map container resize failed: {}", e),
    }
    thread::sleep(options.resize_settle);

    engine.render_png()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_contract() {
        let opts = SnapshotOptions::default();
        assert_eq!(opts.viewport, Viewport { width: 1600, height: 900 });
        assert_eq!(opts.scale, 2);
        assert_eq!(opts.settle, Duration::from_secs(2));
        assert_eq!(opts.resize_settle, Duration::from_millis(800));
        assert_eq!(opts.engine_config().viewport, Viewport { width: 3200, height: 1800 });
    }

    #[test]
    fn settle_rejects_negative_waits() {
        assert_eq!(settle_from_secs(0.5).unwrap(), Duration::from_millis(500));
        assert!(settle_from_secs(-1.0).is_err());
        assert!(settle_from_secs(f64::NAN).is_err());
    }

    #[test]
    fn resize_script_targets_container() {
        let js = resize_script("station-map", Viewport { width: 800, height: 600 });
        assert!(js.contains(r#"getElementsByClassName("station-map")[0]"#));
        assert!(js.contains("'800px'"));
        assert!(js.contains("'600px'"));
    }

    #[test]
    fn resolve_input_reports_missing_file() {
        let err = resolve_input(Path::new("definitely/not/here.html")).unwrap_err();
        match err {
            Error::NotFound(p) => assert!(p.is_absolute()),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn resolve_input_builds_file_url() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let (path, url) = resolve_input(file.path()).unwrap();
        assert_eq!(path, file.path());
        assert_eq!(url.scheme(), "file");
    }
}
