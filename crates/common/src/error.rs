//! Error types shared across Shotframe crates.

use std::path::PathBuf;

/// Top-level error type for Shotframe operations.
#[derive(Debug, thiserror::Error)]
pub enum ShotframeError {
    /// Non-positive or unallocatable surface, crop, or export dimensions.
    #[error("Invalid geometry: {message}")]
    Geometry { message: String },

    /// Bytes that could not be decoded into a raster image.
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// The remote screenshot-capture request failed.
    #[error("Capture request failed: {message}")]
    Fetch { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ShotframeError.
pub type ShotframeResult<T> = Result<T, ShotframeError>;

impl ShotframeError {
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry {
            message: msg.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the caller can reasonably offer a retry (network-bound failures).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}
