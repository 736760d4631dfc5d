//! Typed wire shapes for the window message channel.
//!
//! The transport is an in-process broadcast, but every message still
//! carries a `type` discriminator and a source token: anything a receiver
//! does not recognize falls into the explicit `Unknown` arm and is
//! ignored, and anything from a foreign window is dropped before it is
//! looked at.

use serde::{Deserialize, Serialize};

use crate::file::{MimeType, StoredFile};
use crate::ids::{BindingId, CorrelationId, WindowToken};
use crate::ops::{OperationKind, OperationOptions};

/// One processing request. Created at dispatch time, consumed by exactly
/// one adapter, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingRequest {
    pub op: OperationKind,
    pub binding_id: BindingId,
    pub file: StoredFile,
    pub options: OperationOptions,
    pub correlation: CorrelationId,
}

/// Size and format deltas reported alongside a successful result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingMetrics {
    pub original_size: u64,
    pub processed_size: u64,
    pub original_mime: MimeType,
    pub processed_mime: MimeType,
    pub elapsed_ms: u64,
}

impl ProcessingMetrics {
    /// Percent size reduction, one decimal. Negative when the output grew.
    pub fn compression_ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        let saved = self.original_size as f64 - self.processed_size as f64;
        (saved / self.original_size as f64 * 1000.0).round() / 10.0
    }

    pub fn format_changed(&self) -> bool {
        self.original_mime != self.processed_mime
    }
}

/// Every message that can travel over the window channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PageMessage {
    #[serde(rename = "processFile")]
    Request(ProcessingRequest),

    #[serde(rename = "fileProcessed", rename_all = "camelCase")]
    Processed {
        binding_id: BindingId,
        correlation: CorrelationId,
        file: StoredFile,
        original_operation: OperationKind,
        metrics: ProcessingMetrics,
    },

    #[serde(rename = "fileProcessingError", rename_all = "camelCase")]
    ProcessingError {
        binding_id: BindingId,
        correlation: CorrelationId,
        operation: OperationKind,
        error: String,
    },

    /// Anything else on the channel. Receivers ignore it.
    #[serde(other)]
    Unknown,
}

/// A message plus the window it was posted from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub source: WindowToken,
    pub message: PageMessage,
}

impl Envelope {
    pub fn new(source: WindowToken, message: PageMessage) -> Self {
        Self { source, message }
    }

    /// The same-window guard: an envelope is only for us when its source
    /// token matches ours.
    pub fn is_from(&self, window: &WindowToken) -> bool {
        &self.source == window
    }
}
