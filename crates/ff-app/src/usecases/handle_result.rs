use std::sync::Arc;

use log::debug;

use ff_core::{
    OperationError, PageMessage, ProcessingMetrics, ReplaceError, StoredFile,
};

use crate::dispatch::{DispatchClient, ExpiredDispatch};
use crate::registry::{InputRegistry, OperationOutcome};
use crate::replace::FileReplacer;
use crate::toolbox::ToolboxController;

/// Use case consuming processing results, real or synthesized.
///
/// Every path starts with the same two staleness gates: the correlation
/// must still be pending at the dispatch client, and it must still be
/// the binding's in-flight request. Anything failing either gate is a
/// late or foreign message and is dropped without side effects, which is
/// what makes post-timeout replies harmless.
pub struct HandleProcessingResult {
    registry: Arc<InputRegistry>,
    replacer: Arc<FileReplacer>,
    toolbox: Arc<ToolboxController>,
    dispatch: Arc<DispatchClient>,
}

impl HandleProcessingResult {
    pub fn new(
        registry: Arc<InputRegistry>,
        replacer: Arc<FileReplacer>,
        toolbox: Arc<ToolboxController>,
        dispatch: Arc<DispatchClient>,
    ) -> Self {
        Self {
            registry,
            replacer,
            toolbox,
            dispatch,
        }
    }

    pub async fn on_message(&self, message: PageMessage) {
        match message {
            PageMessage::Processed {
                binding_id,
                correlation,
                file,
                original_operation,
                metrics,
            } => {
                if self.dispatch.resolve(&correlation).await.is_none() {
                    debug!("late result for {} dropped", binding_id);
                    return;
                }
                self.install_result(
                    &binding_id,
                    &correlation,
                    original_operation,
                    file,
                    metrics,
                )
                .await;
            }
            PageMessage::ProcessingError {
                binding_id,
                correlation,
                operation,
                error,
            } => {
                if self.dispatch.resolve(&correlation).await.is_none() {
                    debug!("late error for {} dropped", binding_id);
                    return;
                }
                let applied = self
                    .registry
                    .finish_operation(&binding_id, &correlation, OperationOutcome::Failure)
                    .await;
                if !applied {
                    return;
                }
                debug!("{} failed on {}: {}", operation, binding_id, error);
                self.toolbox
                    .show_outcome(&binding_id, Err(&OperationError::Adapter(error)))
                    .await;
            }
            // Requests are adapter traffic; unknown shapes are ignored
            // by design.
            PageMessage::Request(_) | PageMessage::Unknown => {}
        }
    }

    /// A dispatch expired with no reply: same visible effect as an
    /// adapter failure, but the state returns to `Idle` and the current
    /// file is untouched.
    pub async fn on_expired(&self, expired: ExpiredDispatch) {
        let applied = self
            .registry
            .finish_operation(
                &expired.binding_id,
                &expired.correlation,
                OperationOutcome::Timeout,
            )
            .await;
        if !applied {
            return;
        }
        self.toolbox
            .show_outcome(&expired.binding_id, Err(&OperationError::Timeout))
            .await;
    }

    async fn install_result(
        &self,
        binding_id: &ff_core::BindingId,
        correlation: &ff_core::CorrelationId,
        op: ff_core::OperationKind,
        file: StoredFile,
        metrics: ProcessingMetrics,
    ) {
        let Ok(binding) = self.registry.lookup(binding_id).await else {
            debug!("result for unknown binding {} dropped", binding_id);
            return;
        };
        if !binding.is_current(correlation) {
            debug!("superseded result for {} dropped", binding_id);
            return;
        }

        match self.replacer.install(binding_id, op, file, metrics.clone()).await {
            Ok(()) => {
                self.registry
                    .finish_operation(binding_id, correlation, OperationOutcome::Success)
                    .await;
                self.toolbox.show_outcome(binding_id, Ok(&metrics)).await;
            }
            Err(ReplaceError::VerificationFailed) => {
                self.registry
                    .finish_operation(binding_id, correlation, OperationOutcome::Failure)
                    .await;
                self.toolbox
                    .show_outcome(
                        binding_id,
                        Err(&OperationError::ReplacementVerificationFailed),
                    )
                    .await;
            }
            Err(ReplaceError::Detached) => {
                // The element is gone; the binding goes with it, quietly.
                self.registry
                    .finish_operation(binding_id, correlation, OperationOutcome::Failure)
                    .await;
                self.registry.unregister(binding_id).await;
            }
        }
    }
}
