//! Chrome DevTools Protocol adapter implementation

use crate::{Engine, EngineConfig, Error, Result, ScriptResult, Viewport};
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Runtime::RemoteObjectSubtype;
use headless_chrome::protocol::cdp::{Emulation, Page};
use headless_chrome::{Browser, LaunchOptions};
use log::debug;
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

/// CDP-based engine implementation (uses the `headless_chrome` crate)
///
/// This adapter launches a headless Chrome instance, manages a single tab,
/// and provides the `Engine` trait implementation over it. Dropping the
/// engine also terminates the browser process.
pub struct CdpEngine {
    browser: Browser,
    tab: Arc<Tab>,
}

impl Engine for CdpEngine {
    fn new(config: EngineConfig) -> Result<Self>
    where
        Self: Sized,
    {
        let mut args: Vec<&OsStr> = Vec::new();
        if config.disable_gpu {
            args.push(OsStr::new("--disable-gpu"));
        }
        if !config.enable_logging {
            args.push(OsStr::new("--log-level=3"));
        }

        // Configure headless Chrome launch options
        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(config.sandbox)
            .enable_logging(config.enable_logging)
            .window_size(Some((config.viewport.width, config.viewport.height)))
            .args(args)
            .build()
            .map_err(|e| Error::InitializationError(format!("Failed to build launch options: {}", e)))?;

        // Launch the browser
        let browser = Browser::new(launch_options)
            .map_err(|e| Error::InitializationError(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::InitializationError(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(Duration::from_millis(config.timeout_ms));

        debug!(
            "Launched headless Chrome with a {}x{} window",
            config.viewport.width, config.viewport.height
        );
        Ok(Self { browser, tab })
    }

    fn set_device_metrics(&mut self, viewport: Viewport, device_scale: f64) -> Result<()> {
        self.tab
            .call_method(device_metrics_override(viewport, device_scale))
            .map_err(|e| Error::CdpError(format!("Device metrics override failed: {}", e)))?;
        Ok(())
    }

    fn load_url(&mut self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| Error::LoadError(format!("Navigation failed: {}", e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::LoadError(format!("Wait for navigation failed: {}", e)))?;

        Ok(())
    }

    fn evaluate_script(&mut self, script: &str) -> Result<ScriptResult> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| Error::ScriptError(format!("Evaluation failed: {}", e)))?;

        // Thrown exceptions come back as an `Error` remote object, not an Err
        let is_error = matches!(result.subtype, Some(RemoteObjectSubtype::Error));
        let value = if is_error {
            result.description.unwrap_or_else(|| "unknown script error".to_string())
        } else {
            result
                .value
                .map(|v| v.to_string())
                .unwrap_or_else(|| "null".to_string())
        };

        Ok(ScriptResult { value, is_error })
    }

    fn render_png(&self) -> Result<Vec<u8>> {
        let screenshot_data = self
            .tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| Error::RenderError(format!("Screenshot failed: {}", e)))?;

        Ok(screenshot_data)
    }

    fn close(self) -> Result<()> {
        // Drop the tab before the browser so the child process goes away promptly
        drop(self.tab);
        drop(self.browser);
        Ok(())
    }
}

/// Desktop metrics override; everything beyond size and scale is left to Chrome
fn device_metrics_override(viewport: Viewport, device_scale: f64) -> Emulation::SetDeviceMetricsOverride {
    Emulation::SetDeviceMetricsOverride {
        width: viewport.width,
        height: viewport.height,
        device_scale_factor: device_scale,
        mobile: false,
        scale: None,
        screen_width: None,
        screen_height: None,
        position_x: None,
        position_y: None,
        dont_set_visible_size: None,
        screen_orientation: None,
        viewport: None,
        display_feature: None,
        device_posture: None,
    }
}
