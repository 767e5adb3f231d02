#![deny(unsafe_code)]
//! Palette extraction off the caller's thread.
//!
//! [`ExtractionWorker`] runs k-means on tokio's blocking pool so a long
//! extraction never stalls color conversions running alongside it. Requests
//! are numbered; only the newest one's result is delivered; older tickets
//! resolve to [`WorkerError::Superseded`] once they finish.

mod error;
pub mod pixels;

#[cfg(feature = "image")]
pub mod load;

pub use error::WorkerError;
pub use pixels::{opaque_pixels, request_for_image};

#[cfg(feature = "image")]
pub use load::{decode_image, load_image, LoadedImage};

use huekit_core::{ExtractRequest, ExtractResponse};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// The most recent result delivered by a worker.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub generation: u64,
    pub response: ExtractResponse,
}

#[derive(Debug)]
struct Shared {
    generation: AtomicU64,
    latest: watch::Sender<Option<Extraction>>,
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Publishes `response` unless something newer got there first.
    fn publish(&self, generation: u64, response: &ExtractResponse) {
        self.latest.send_if_modified(|slot| {
            let newer = slot.as_ref().map_or(true, |e| e.generation < generation);
            if newer && self.is_current(generation) {
                *slot = Some(Extraction {
                    generation,
                    response: response.clone(),
                });
                true
            } else {
                false
            }
        });
    }
}

/// Runs extraction requests in the background; newest request wins.
///
/// Cloning yields a handle to the same worker.
#[derive(Debug, Clone)]
pub struct ExtractionWorker {
    shared: Arc<Shared>,
}

impl Default for ExtractionWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionWorker {
    pub fn new() -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            shared: Arc::new(Shared {
                generation: AtomicU64::new(0),
                latest,
            }),
        }
    }

    /// Starts `request` on the blocking pool and marks every earlier request
    /// stale. Must be called from within a tokio runtime.
    pub fn submit(&self, request: ExtractRequest) -> ExtractionTicket {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(
            generation,
            pixels = request.pixels.len(),
            k = request.k,
            "submit extraction"
        );

        let shared = Arc::clone(&self.shared);
        let handle = tokio::task::spawn_blocking(move || {
            if !shared.is_current(generation) {
                return None;
            }
            let result = request.run();
            if let Ok(response) = &result {
                shared.publish(generation, response);
            }
            Some(result)
        });

        ExtractionTicket {
            generation,
            shared: Arc::clone(&self.shared),
            handle,
        }
    }

    /// Submits `request` and waits for it.
    pub async fn extract(&self, request: ExtractRequest) -> Result<ExtractResponse, WorkerError> {
        self.submit(request).wait().await
    }

    /// Generation number of the most recent submission (0 before any).
    pub fn current_generation(&self) -> u64 {
        self.shared.generation.load(Ordering::SeqCst)
    }

    /// Watches the newest delivered result.
    pub fn subscribe(&self) -> watch::Receiver<Option<Extraction>> {
        self.shared.latest.subscribe()
    }

    /// The newest delivered result, if any.
    pub fn latest(&self) -> Option<Extraction> {
        self.shared.latest.borrow().clone()
    }
}

/// Handle to one submitted request.
///
/// Dropping a ticket does not stop the work; its result is still published
/// if no newer request arrived.
#[derive(Debug)]
pub struct ExtractionTicket {
    generation: u64,
    shared: Arc<Shared>,
    handle: JoinHandle<Option<Result<ExtractResponse, huekit_core::ColorError>>>,
}

impl ExtractionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Waits for the request to finish.
    ///
    /// Returns [`WorkerError::Superseded`] if a newer request was submitted
    /// in the meantime, whatever this request's own outcome.
    pub async fn wait(self) -> Result<ExtractResponse, WorkerError> {
        let outcome = self
            .handle
            .await
            .map_err(|e| WorkerError::TaskFailed(e.to_string()))?;

        let generation = self.generation;
        match outcome {
            Some(result) if self.shared.is_current(generation) => Ok(result?),
            _ => {
                tracing::debug!(generation, "discarding stale extraction");
                Err(WorkerError::Superseded { generation })
            }
        }
    }
}
