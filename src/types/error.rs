use thiserror::Error;

/// tripstats error types
///
/// Only the edges (snapshot loading, settings, CLI) produce these.
/// The aggregation core degrades toward zero instead of failing.
#[derive(Error, Debug)]
pub enum TripstatsError {
    /// Failed to parse a trip snapshot or settings file
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for tripstats
pub type Result<T> = std::result::Result<T, TripstatsError>;
