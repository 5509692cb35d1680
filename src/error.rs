//! Error types for the flock simulation

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for simulation setup operations
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Everything that can go wrong before the first tick.
///
/// Ticking itself never fails: degenerate geometry is handled by policy
/// inside the vector helpers and the neighbor rule.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// A configuration value is outside its usable range
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Dotted path of the offending field
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// World dimensions must be positive and finite
    #[error("Invalid world bounds: {width} x {height}")]
    InvalidBounds { width: f32, height: f32 },

    /// A palette entry is not `#rrggbb`
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    /// Config file could not be read
    #[error("Failed to read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the parameter schema
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl SimulationError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
