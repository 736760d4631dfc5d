//! Input discovery: a bounded-retry initial scan plus the mutation loop
//! for everything that renders later.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use ff_core::ports::{InputSurfacePort, MutationBatch};
use ff_core::AppConfig;

use crate::registry::InputRegistry;

pub struct InputScanner {
    surface: Arc<dyn InputSurfacePort>,
    registry: Arc<InputRegistry>,
    config: AppConfig,
}

impl InputScanner {
    pub fn new(
        surface: Arc<dyn InputSurfacePort>,
        registry: Arc<InputRegistry>,
        config: AppConfig,
    ) -> Self {
        Self {
            surface,
            registry,
            config,
        }
    }

    /// Scan the whole document a bounded number of times, with a pause
    /// between attempts, to catch inputs that render shortly after
    /// load. Re-registration is a no-op, so overlapping attempts are
    /// harmless; anything later than the last attempt is the mutation
    /// loop's job.
    pub async fn initial_scan(&self) {
        let attempts = self.config.scan_max_attempts.max(1);
        for attempt in 1..=attempts {
            let root = self.surface.document_root().await;
            self.scan_subtree(&root).await;
            debug!(attempt, "initial input scan pass complete");
            if attempt < attempts {
                tokio::time::sleep(std::time::Duration::from_millis(self.config.scan_backoff_ms))
                    .await;
            }
        }
    }

    /// Consume mutation batches until the document goes away. Every
    /// added subtree root is deep-scanned, shadow roots included.
    pub async fn run_mutation_loop(&self, mut mutations: mpsc::Receiver<MutationBatch>) {
        while let Some(batch) = mutations.recv().await {
            for root in &batch.added_roots {
                self.scan_subtree(root).await;
            }
        }
        debug!("mutation stream ended");
    }

    async fn scan_subtree(&self, root: &ff_core::ElementId) {
        match self.surface.query_file_inputs(root).await {
            Ok(inputs) => {
                for input in inputs {
                    if let Err(e) = self.registry.register(&input).await {
                        warn!("failed to register discovered input: {}", e);
                    }
                }
            }
            Err(e) => warn!("input scan failed: {}", e),
        }
    }
}
