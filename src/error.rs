//! Error types for Anveshak

use thiserror::Error;

/// Anveshak error type
///
/// Only construction-time operations fail. Runtime conditions such as a
/// frontier without a path or an obstacle mid-segment are handled inside
/// the exploration loop and never surface as errors.
#[derive(Error, Debug)]
pub enum AnveshakError {
    /// Reading a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Grid bounds or cell size describe an empty grid
    #[error("Invalid world bounds: {0}")]
    InvalidBounds(String),

    /// Simulation world could not be parsed
    #[error("World map error: {0}")]
    WorldMap(String),
}

impl From<toml::de::Error> for AnveshakError {
    fn from(e: toml::de::Error) -> Self {
        AnveshakError::Config(e.to_string())
    }
}

/// Result alias using [`AnveshakError`]
pub type Result<T> = std::result::Result<T, AnveshakError>;
