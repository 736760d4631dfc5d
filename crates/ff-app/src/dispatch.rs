//! Dispatch client: correlation-keyed request/response over the window
//! channel, with the bounded wait that turns silence into a timeout.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::AbortHandle;
use tracing::debug;

use ff_core::ports::BridgePort;
use ff_core::{
    BindingId, CorrelationId, DispatchError, Envelope, OperationKind, PageMessage,
    ProcessingRequest,
};

/// A dispatch whose wait expired with no result. The state transition
/// and the user-facing feedback happen in the result handler, keeping
/// one code path for real and synthesized failures.
#[derive(Debug, Clone)]
pub struct ExpiredDispatch {
    pub binding_id: BindingId,
    pub correlation: CorrelationId,
    pub op: OperationKind,
}

struct Pending {
    binding_id: BindingId,
    op: OperationKind,
    timer: Option<AbortHandle>,
}

pub struct DispatchClient {
    bridge: Arc<dyn BridgePort>,
    timeout: Duration,
    pending: Arc<Mutex<HashMap<CorrelationId, Pending>>>,
    expired_tx: mpsc::Sender<ExpiredDispatch>,
    expired_rx: Mutex<Option<mpsc::Receiver<ExpiredDispatch>>>,
}

impl DispatchClient {
    pub fn new(bridge: Arc<dyn BridgePort>, timeout: Duration) -> Self {
        let (expired_tx, expired_rx) = mpsc::channel(16);
        Self {
            bridge,
            timeout,
            pending: Arc::new(Mutex::new(HashMap::new())),
            expired_tx,
            expired_rx: Mutex::new(Some(expired_rx)),
        }
    }

    /// The stream of synthesized timeouts. Taken once by the event loop.
    pub async fn take_expired(&self) -> Option<mpsc::Receiver<ExpiredDispatch>> {
        self.expired_rx.lock().await.take()
    }

    /// Post a request and arm its timeout. Fire and forget from the
    /// caller's perspective; the result, or its absence, comes back
    /// through the event loop.
    pub async fn send(&self, request: ProcessingRequest) -> Result<(), DispatchError> {
        let correlation = request.correlation.clone();
        let binding_id = request.binding_id.clone();
        let op = request.op;

        self.pending.lock().await.insert(
            correlation.clone(),
            Pending {
                binding_id: binding_id.clone(),
                op,
                timer: None,
            },
        );

        let envelope = Envelope::new(self.bridge.window(), PageMessage::Request(request));
        if let Err(e) = self.bridge.post(envelope).await {
            self.pending.lock().await.remove(&correlation);
            return Err(e);
        }

        let pending = Arc::clone(&self.pending);
        let expired_tx = self.expired_tx.clone();
        let timeout = self.timeout;
        let timer_correlation = correlation.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let expired = pending.lock().await.remove(&timer_correlation);
            if let Some(entry) = expired {
                debug!(binding = %entry.binding_id, op = %entry.op, "dispatch timed out");
                let _ = expired_tx
                    .send(ExpiredDispatch {
                        binding_id: entry.binding_id,
                        correlation: timer_correlation,
                        op: entry.op,
                    })
                    .await;
            }
        });

        // The request may already have resolved by the time the timer
        // task is registered; abort it right away in that case.
        let mut table = self.pending.lock().await;
        match table.get_mut(&correlation) {
            Some(entry) => entry.timer = Some(handle.abort_handle()),
            None => handle.abort(),
        }
        Ok(())
    }

    /// Resolve a pending dispatch. `None` means the correlation is
    /// stale: it already timed out, or was never ours. Late replies land
    /// here and are dropped without side effects.
    pub async fn resolve(&self, correlation: &CorrelationId) -> Option<ExpiredDispatch> {
        let entry = self.pending.lock().await.remove(correlation)?;
        if let Some(timer) = entry.timer {
            timer.abort();
        }
        Some(ExpiredDispatch {
            binding_id: entry.binding_id,
            correlation: correlation.clone(),
            op: entry.op,
        })
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff_core::{MimeType, OperationOptions, StoredFile};
    use ff_page::WindowChannel;

    fn request() -> ProcessingRequest {
        ProcessingRequest {
            op: OperationKind::Compress,
            binding_id: BindingId::new(),
            file: StoredFile::new("a.png", MimeType::image_png(), vec![1u8; 8], 0),
            options: OperationOptions::Compress { quality: 0.5 },
            correlation: CorrelationId::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_synthesizes_expiry() {
        let bridge = Arc::new(WindowChannel::new());
        // Keep a receiver alive so posts do not fail.
        let _rx = bridge.subscribe();
        let client = DispatchClient::new(bridge, Duration::from_millis(30_000));
        let mut expired = client.take_expired().await.unwrap();

        let req = request();
        let correlation = req.correlation.clone();
        client.send(req).await.unwrap();
        assert_eq!(client.pending_count().await, 1);

        tokio::time::advance(Duration::from_millis(30_001)).await;
        let fired = expired.recv().await.unwrap();
        assert_eq!(fired.correlation, correlation);
        assert_eq!(client.pending_count().await, 0);

        // A late genuine reply now resolves to nothing.
        assert!(client.resolve(&correlation).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_disarms_the_timer() {
        let bridge = Arc::new(WindowChannel::new());
        let _rx = bridge.subscribe();
        let client = DispatchClient::new(bridge, Duration::from_millis(30_000));
        let mut expired = client.take_expired().await.unwrap();

        let req = request();
        let correlation = req.correlation.clone();
        client.send(req).await.unwrap();

        let resolved = client.resolve(&correlation).await.unwrap();
        assert_eq!(resolved.op, OperationKind::Compress);

        tokio::time::advance(Duration::from_millis(60_000)).await;
        assert!(expired.try_recv().is_err());
    }
}
