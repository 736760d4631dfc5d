use std::sync::Arc;

use anyhow::Result;
use log::debug;

use ff_core::ops::validate;
use ff_core::{
    BindingId, CorrelationId, OperationError, OperationKind, OperationOptions, ProcessingRequest,
};

use crate::dispatch::DispatchClient;
use crate::registry::InputRegistry;
use crate::toolbox::ToolboxController;
use crate::usecases::ResetInput;

/// Use case behind every operation trigger in the toolbox.
///
/// The order matters: the precondition and option validation run before
/// anything is dispatched, so an invalid trigger leaves the binding
/// `Idle` and nothing crosses the bridge. The mutual-exclusion guard
/// sits at the trigger, refusing a second dispatch while one is in
/// flight, instead of sorting out overlapping results later.
pub struct RequestOperation {
    registry: Arc<InputRegistry>,
    dispatch: Arc<DispatchClient>,
    toolbox: Arc<ToolboxController>,
    reset: Arc<ResetInput>,
}

impl RequestOperation {
    pub fn new(
        registry: Arc<InputRegistry>,
        dispatch: Arc<DispatchClient>,
        toolbox: Arc<ToolboxController>,
        reset: Arc<ResetInput>,
    ) -> Self {
        Self {
            registry,
            dispatch,
            toolbox,
            reset,
        }
    }

    pub async fn execute(
        &self,
        binding_id: &BindingId,
        op: OperationKind,
        options: OperationOptions,
    ) -> Result<()> {
        // Reset is wire-expressible but never routed to an adapter.
        if op == OperationKind::Reset {
            return self.reset.execute(binding_id).await;
        }

        let binding = match self.registry.lookup(binding_id).await {
            Ok(binding) => binding,
            Err(_) => {
                debug!("request for unknown binding {} dropped", binding_id);
                return Ok(());
            }
        };

        let Some(file) = binding.current_file.clone() else {
            self.toolbox.alert_no_file(op).await;
            return Ok(());
        };

        if let Err(error) = validate(op, &options, &file) {
            self.toolbox.show_outcome(binding_id, Err(&error)).await;
            return Ok(());
        }

        let correlation = CorrelationId::new();
        let payload = match self.registry.begin_operation(binding_id, &correlation).await {
            Ok(payload) => payload,
            Err(error) => {
                self.toolbox.show_outcome(binding_id, Err(&error)).await;
                return Ok(());
            }
        };

        self.toolbox.show_progress(binding_id, op).await;

        let request = ProcessingRequest {
            op,
            binding_id: binding_id.clone(),
            file: payload,
            options,
            correlation: correlation.clone(),
        };
        if self.dispatch.send(request).await.is_err() {
            self.registry.abort_operation(binding_id, &correlation).await;
            let error = OperationError::Adapter("window channel unavailable".into());
            self.toolbox.show_outcome(binding_id, Err(&error)).await;
        }
        Ok(())
    }
}
