//! Error types
//!
//! None of these are fatal to the app: callers log them and carry on.

use thiserror::Error;

/// A single asset failed to load
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// The request failed (missing file, network error)
    #[error("failed to load asset {path}: {reason}")]
    Load { path: String, reason: String },
}

impl AssetError {
    /// Path of the asset that failed
    pub fn path(&self) -> &str {
        match self {
            AssetError::Load { path, .. } => path,
        }
    }
}

/// Page configuration could not be read
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid simulator config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Image set manifest could not be read
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid image set manifest: {0}")]
    Parse(#[from] serde_json::Error),
}
