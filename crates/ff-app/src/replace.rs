//! The file-replacement engine: the single place allowed to overwrite a
//! binding's current file and the element's actual file list.

use std::sync::Arc;

use tracing::{debug, warn};

use ff_core::ports::{InputSurfacePort, ReplacementNotice, SyntheticEvent};
use ff_core::{
    BindingId, OperationError, OperationKind, ProcessingMetrics, ReplaceError, StoredFile,
};

use crate::registry::InputRegistry;

pub struct FileReplacer {
    surface: Arc<dyn InputSurfacePort>,
    registry: Arc<InputRegistry>,
}

impl FileReplacer {
    pub fn new(surface: Arc<dyn InputSurfacePort>, registry: Arc<InputRegistry>) -> Self {
        Self { surface, registry }
    }

    /// Install `file` on the binding's element.
    ///
    /// Steps, in order: swap the file list, dispatch the synthetic
    /// `change` and `input` events, verify the swap landed, re-run
    /// constraint validation, record the new current file, and fire the
    /// bubbling replacement notification. A failed verification surfaces
    /// an error and fires no notification; the previous file is presumed
    /// still installed.
    pub async fn install(
        &self,
        binding_id: &BindingId,
        op: OperationKind,
        file: StoredFile,
        metrics: ProcessingMetrics,
    ) -> Result<(), ReplaceError> {
        let binding = self
            .registry
            .lookup(binding_id)
            .await
            .map_err(|_| ReplaceError::Detached)?;
        let element = binding.element.clone();

        if !self.surface.is_attached(&element).await {
            return Err(ReplaceError::Detached);
        }

        // A single-file list: processing always yields one replacement.
        self.surface.install_files(&element, file.clone()).await?;

        self.surface
            .dispatch_synthetic(&element, SyntheticEvent::Change)
            .await
            .map_err(|_| ReplaceError::Detached)?;
        self.surface
            .dispatch_synthetic(&element, SyntheticEvent::Input)
            .await
            .map_err(|_| ReplaceError::Detached)?;

        let found = self.surface.first_file(&element).await;
        let verified = matches!(&found, Some(landed) if landed.same_content(&file));
        if !verified {
            warn!(
                binding = %binding_id,
                expected = %file.name,
                "post-install readback does not hold the installed file"
            );
            return Err(ReplaceError::VerificationFailed);
        }

        if !self.surface.report_validity(&element).await {
            debug!(binding = %binding_id, "element reports invalid after install");
        }

        self.registry.set_current_file(binding_id, file.clone()).await;

        let notice = ReplacementNotice {
            binding_id: binding_id.clone(),
            operation: op,
            original_file: binding.original_file.clone(),
            processed_file: file,
            metrics,
        };
        self.surface
            .emit_replacement_notice(&element, notice)
            .await
            .map_err(|_| ReplaceError::Detached)?;

        debug!(binding = %binding_id, op = %op, "replacement installed");
        Ok(())
    }

    /// Reset is not a separate code path: it is `install` with the
    /// stored original, which is exactly why the original must never be
    /// overwritten by a processing result.
    pub async fn reset(&self, binding_id: &BindingId) -> Result<ProcessingMetrics, OperationError> {
        let binding = self
            .registry
            .lookup(binding_id)
            .await
            .map_err(|_| OperationError::NotFound)?;
        let original = binding
            .original_file
            .clone()
            .ok_or_else(|| OperationError::InvalidInput("no file selected yet".into()))?;
        let current = binding.current_file.clone().unwrap_or_else(|| original.clone());

        let metrics = ProcessingMetrics {
            original_size: current.size_bytes(),
            processed_size: original.size_bytes(),
            original_mime: current.mime.clone(),
            processed_mime: original.mime.clone(),
            elapsed_ms: 0,
        };

        self.install(binding_id, OperationKind::Reset, original, metrics.clone())
            .await
            .map_err(|e| match e {
                ReplaceError::Detached => OperationError::NotFound,
                ReplaceError::VerificationFailed => OperationError::ReplacementVerificationFailed,
            })?;
        Ok(metrics)
    }
}
