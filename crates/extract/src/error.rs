use huekit_core::ColorError;
use thiserror::Error;

/// Errors from the extraction worker and image input.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Extract(#[from] ColorError),

    /// A newer request was submitted before this one finished.
    #[error("extraction {generation} was superseded by a newer request")]
    Superseded { generation: u64 },

    #[error("extraction task failed: {0}")]
    TaskFailed(String),

    #[error("image error: {0}")]
    Image(String),
}
