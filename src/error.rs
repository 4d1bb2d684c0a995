//! Error types for the map builder and snapshot renderer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for stationmap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a map or rendering a snapshot
#[derive(Error, Debug)]
pub enum Error {
    /// An input file does not exist
    #[error("Input not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A required column is absent from the dataset header
    #[error("Required column missing from dataset: {0}")]
    MissingColumn(String),

    /// No records survived cleaning
    #[error("No data after cleaning")]
    EmptyDataset,

    /// Malformed CSV input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to rasterize a trend chart
    #[error("Chart rendering failed: {0}")]
    ChartError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Failed to initialize the rendering engine
    #[error("Engine initialization failed: {0}")]
    InitializationError(String),

    /// Failed to load a URL
    #[error("Failed to load URL: {0}")]
    LoadError(String),

    /// Failed to render content
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to execute JavaScript
    #[error("Script execution failed: {0}")]
    ScriptError(String),

    /// CDP-specific error
    #[cfg(feature = "cdp")]
    #[error("CDP error: {0}")]
    CdpError(String),
}

#[cfg(feature = "cdp")]
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::CdpError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_path() {
        let err = Error::NotFound(PathBuf::from("/tmp/missing.html"));
        assert_eq!(err.to_string(), "Input not found: /tmp/missing.html");
    }
}
