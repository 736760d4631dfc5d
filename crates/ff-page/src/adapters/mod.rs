//! Processing adapter contract and host.
//!
//! Adapters run in page scope and only ever see requests through the
//! window channel. Each accepted request is answered with exactly one
//! `fileProcessed` or `fileProcessingError` message; a request nothing
//! accepts gets no reply and runs into the bridge timeout instead.

mod image;
mod pdf;
mod video;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use ff_core::ports::{BridgePort, ClockPort};
use ff_core::{
    Envelope, OperationKind, PageMessage, ProcessingMetrics, ProcessingRequest, StoredFile,
};

pub use image::ImageAdapter;
pub use pdf::PdfAdapter;
pub use video::VideoAdapter;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdapterError {
    /// The payload does not match what the adapter handles.
    #[error("unsupported payload: {0}")]
    Unsupported(String),

    /// The payload could not be decoded.
    #[error("corrupt payload: {0}")]
    Corrupt(String),

    /// The transformation itself failed.
    #[error("{0}")]
    Failed(String),
}

/// One operation family's processing backend.
///
/// The stand-in implementations in this module transform payloads
/// deterministically; a real encoder backend implements the same trait.
#[async_trait]
pub trait ProcessingAdapter: Send + Sync {
    fn accepts(&self, op: OperationKind) -> bool;

    async fn process(&self, request: &ProcessingRequest) -> Result<StoredFile, AdapterError>;
}

/// Routes inbound requests to the first adapter accepting their kind and
/// posts the single result back.
pub struct AdapterHost {
    bridge: Arc<dyn BridgePort>,
    clock: Arc<dyn ClockPort>,
    adapters: Vec<Arc<dyn ProcessingAdapter>>,
}

impl AdapterHost {
    pub fn new(bridge: Arc<dyn BridgePort>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            bridge,
            clock,
            adapters: Vec::new(),
        }
    }

    pub fn with(mut self, adapter: Arc<dyn ProcessingAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    /// Every stand-in codec this crate ships.
    pub fn with_default_adapters(self) -> Self {
        self.with(Arc::new(ImageAdapter))
            .with(Arc::new(PdfAdapter))
            .with(Arc::new(VideoAdapter))
    }

    /// Subscribe now, process forever. Subscribing before the task is
    /// spawned means no request posted after this call can be missed.
    pub fn spawn(self) -> JoinHandle<()> {
        let rx = self.bridge.subscribe();
        tokio::spawn(async move { self.run(rx).await })
    }

    async fn run(self, mut rx: tokio::sync::broadcast::Receiver<Envelope>) {
        let window = self.bridge.window();
        loop {
            let envelope = match rx.recv().await {
                Ok(envelope) => envelope,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "adapter host lagged behind the window channel");
                    continue;
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            };
            if !envelope.is_from(&window) {
                continue;
            }
            let request = match envelope.message {
                PageMessage::Request(request) => request,
                // Results and unknown traffic are not for adapters.
                _ => continue,
            };
            // Reset never reaches an adapter; the isolated scope handles
            // it against the stored original.
            if request.op == OperationKind::Reset {
                continue;
            }
            self.handle(&window, request).await;
        }
    }

    async fn handle(&self, window: &ff_core::WindowToken, request: ProcessingRequest) {
        let Some(adapter) = self.adapters.iter().find(|a| a.accepts(request.op)) else {
            debug!(op = %request.op, "no adapter registered for request");
            return;
        };

        let started = self.clock.now_ms();
        let outcome = adapter.process(&request).await;
        let elapsed_ms = (self.clock.now_ms() - started).max(0) as u64;

        let message = match outcome {
            Ok(file) => {
                let metrics = ProcessingMetrics {
                    original_size: request.file.size_bytes(),
                    processed_size: file.size_bytes(),
                    original_mime: request.file.mime.clone(),
                    processed_mime: file.mime.clone(),
                    elapsed_ms,
                };
                debug!(
                    op = %request.op,
                    binding = %request.binding_id,
                    ratio = metrics.compression_ratio(),
                    "processing completed"
                );
                PageMessage::Processed {
                    binding_id: request.binding_id.clone(),
                    correlation: request.correlation.clone(),
                    file,
                    original_operation: request.op,
                    metrics,
                }
            }
            Err(error) => {
                debug!(op = %request.op, binding = %request.binding_id, %error, "processing failed");
                PageMessage::ProcessingError {
                    binding_id: request.binding_id.clone(),
                    correlation: request.correlation.clone(),
                    operation: request.op,
                    error: error.to_string(),
                }
            }
        };

        if self
            .bridge
            .post(Envelope::new(window.clone(), message))
            .await
            .is_err()
        {
            warn!("window channel closed while posting a result");
        }
    }
}

/// Test adapter: accepts one operation kind and always fails with the
/// given message.
pub struct FailingAdapter {
    op: OperationKind,
    message: String,
}

impl FailingAdapter {
    pub fn new(op: OperationKind, message: impl Into<String>) -> Self {
        Self {
            op,
            message: message.into(),
        }
    }
}

#[async_trait]
impl ProcessingAdapter for FailingAdapter {
    fn accepts(&self, op: OperationKind) -> bool {
        op == self.op
    }

    async fn process(&self, _request: &ProcessingRequest) -> Result<StoredFile, AdapterError> {
        Err(AdapterError::Failed(self.message.clone()))
    }
}

/// Scale a payload to `factor` of its size, never below one byte and
/// never above the original.
pub(crate) fn scaled_payload(file: &StoredFile, factor: f64) -> bytes::Bytes {
    let len = file.bytes.len();
    if len == 0 {
        return file.bytes.clone();
    }
    let target = ((len as f64) * factor).round() as usize;
    file.bytes.slice(0..target.clamp(1, len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff_core::MimeType;

    #[test]
    fn test_scaled_payload_bounds() {
        let file = StoredFile::new("a.bin", MimeType::image_png(), vec![1u8; 100], 0);
        assert_eq!(scaled_payload(&file, 0.5).len(), 50);
        assert_eq!(scaled_payload(&file, 0.0).len(), 1);
        assert_eq!(scaled_payload(&file, 2.0).len(), 100);
    }
}
