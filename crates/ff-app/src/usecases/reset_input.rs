use std::sync::Arc;

use anyhow::Result;
use log::debug;

use ff_core::{BindingId, OperationError, OperationKind};

use crate::registry::InputRegistry;
use crate::replace::FileReplacer;
use crate::toolbox::ToolboxController;

/// Use case restoring the stored original on an input.
///
/// Reset rides the same replacement primitive as any processed result,
/// so it is idempotent and needs no adapter: installing the original a
/// second time installs the same bytes again.
pub struct ResetInput {
    registry: Arc<InputRegistry>,
    replacer: Arc<FileReplacer>,
    toolbox: Arc<ToolboxController>,
}

impl ResetInput {
    pub fn new(
        registry: Arc<InputRegistry>,
        replacer: Arc<FileReplacer>,
        toolbox: Arc<ToolboxController>,
    ) -> Self {
        Self {
            registry,
            replacer,
            toolbox,
        }
    }

    pub async fn execute(&self, binding_id: &BindingId) -> Result<()> {
        if self.registry.lookup(binding_id).await.is_err() {
            debug!("reset for unknown binding {} dropped", binding_id);
            return Ok(());
        }

        match self.replacer.reset(binding_id).await {
            Ok(metrics) => {
                let restored = format!(
                    "Original file restored ({:.2} kB)",
                    metrics.processed_size as f64 / 1024.0
                );
                self.toolbox.show_info(binding_id, restored).await;
            }
            Err(OperationError::InvalidInput(_)) => {
                self.toolbox.alert_no_file(OperationKind::Reset).await;
            }
            Err(error) => {
                self.toolbox.show_outcome(binding_id, Err(&error)).await;
            }
        }
        Ok(())
    }
}
