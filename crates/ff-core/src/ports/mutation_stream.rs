use async_trait::async_trait;

use crate::ids::ElementId;

/// One batch of subtree roots added to the document since the last batch.
#[derive(Debug, Clone)]
pub struct MutationBatch {
    pub added_roots: Vec<ElementId>,
}

/// Port for observing dynamically added DOM subtrees.
///
/// # Behavior
/// - `subscribe()` starts the observation and yields batches until the
///   document is torn down.
/// - Registration driven by these batches must be idempotent; the same
///   input may appear under several overlapping roots.
#[async_trait]
pub trait MutationStreamPort: Send + Sync {
    /// Start observing. Returns a receiver yielding one batch per burst
    /// of additions.
    async fn subscribe(&self) -> anyhow::Result<tokio::sync::mpsc::Receiver<MutationBatch>>;
}
