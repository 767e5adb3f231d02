//! Error types for the huekit core.

use thiserror::Error;

/// Errors produced by color conversion and palette extraction.
#[derive(Debug, Error)]
pub enum ColorError {
    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A component list had the wrong shape or held a non-finite value.
    #[error("invalid color components: {0}")]
    InvalidComponents(String),

    /// A color-space mode name was not recognized.
    #[error("unknown color mode: {0}")]
    UnknownMode(String),

    /// A palette could not be constructed from the given colors.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// No pixel survived the saturation/lightness filter.
    #[error("no pixels left to cluster after filtering")]
    EmptyPixelSet,

    /// The requested cluster count was zero.
    #[error("invalid cluster count {0}: at least one cluster is required")]
    InvalidClusterCount(usize),

    /// An image buffer or locator request was malformed.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}
