//! Toolbox controller: one live instance per binding, explicit instance
//! tracking instead of marker attributes on DOM nodes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::Mutex;

use ff_core::ports::ToolboxPort;
use ff_core::{
    BindingId, Feedback, MediaKind, OperationError, OperationKind, ProcessingMetrics, StoredFile,
    ToolboxDescriptor, ToolboxId, ToolboxState,
};

use crate::registry::InputRegistry;

#[derive(Debug, Clone)]
pub struct ToolboxInstance {
    pub id: ToolboxId,
    pub state: ToolboxState,
    pub kind: MediaKind,
    pub visible_group: Option<OperationKind>,
}

pub struct ToolboxController {
    port: Arc<dyn ToolboxPort>,
    registry: Arc<InputRegistry>,
    feedback_hide: Duration,
    instances: Mutex<HashMap<BindingId, ToolboxInstance>>,
}

impl ToolboxController {
    pub fn new(
        port: Arc<dyn ToolboxPort>,
        registry: Arc<InputRegistry>,
        feedback_hide: Duration,
    ) -> Self {
        Self {
            port,
            registry,
            feedback_hide,
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// Open the toolbox for a binding and file.
    ///
    /// A live instance is reused (preview refreshed) rather than
    /// duplicated; a hidden one is gone and a fresh instance is built.
    /// Unsupported media kinds get no toolbox, and any existing instance
    /// is torn down rather than left stale.
    pub async fn open(&self, binding_id: &BindingId, file: &StoredFile) -> anyhow::Result<()> {
        let kind = file.mime.media_kind();
        if !kind.is_supported() {
            debug!("no toolbox for {} file on {}", kind.as_str(), binding_id);
            self.close(binding_id).await?;
            return Ok(());
        }

        let mut instances = self.instances.lock().await;
        if let Some(instance) = instances.get_mut(binding_id) {
            if instance.state.is_live() && instance.kind == kind {
                self.port.update_preview(&instance.id, file).await?;
                return Ok(());
            }
            // Media kind changed under the same binding: rebuild.
            let stale = instance.id.clone();
            instances.remove(binding_id);
            self.port.unmount(&stale).await?;
        }

        let mut state = ToolboxState::default();
        state = state
            .begin_loading()
            .ok_or_else(|| anyhow::anyhow!("toolbox lifecycle refused loading"))?;

        let descriptor = ToolboxDescriptor {
            binding_id: binding_id.clone(),
            kind,
            file_name: file.name.clone(),
            size_bytes: file.size_bytes(),
        };
        let id = self.port.mount(descriptor).await?;

        state = state
            .on_loaded()
            .ok_or_else(|| anyhow::anyhow!("toolbox lifecycle refused ready"))?;

        // One control group visible at a time; start on the first one
        // offered for this media family.
        let visible_group = OperationKind::offered_for(kind).first().copied();
        if let Some(op) = visible_group {
            self.port.show_controls(&id, op).await?;
        }

        instances.insert(
            binding_id.clone(),
            ToolboxInstance {
                id: id.clone(),
                state,
                kind,
                visible_group,
            },
        );
        drop(instances);

        self.registry.attach_toolbox(binding_id, id).await;
        Ok(())
    }

    /// Show one operation's control group, hiding the others.
    pub async fn select_group(
        &self,
        binding_id: &BindingId,
        op: OperationKind,
    ) -> anyhow::Result<()> {
        let mut instances = self.instances.lock().await;
        let instance = instances
            .get_mut(binding_id)
            .ok_or_else(|| anyhow::anyhow!("no toolbox for binding"))?;
        if instance.state != ToolboxState::Ready {
            anyhow::bail!("toolbox is not ready");
        }
        if !op.allowed_on(instance.kind) {
            anyhow::bail!("{} does not apply to {} files", op, instance.kind.as_str());
        }
        instance.visible_group = Some(op);
        self.port.show_controls(&instance.id, op).await
    }

    /// Tear the instance down. Hidden is terminal: reopening builds a
    /// fresh toolbox.
    pub async fn close(&self, binding_id: &BindingId) -> anyhow::Result<()> {
        let removed = self.instances.lock().await.remove(binding_id);
        if let Some(mut instance) = removed {
            instance.state = instance.state.hide();
            self.port.unmount(&instance.id).await?;
            self.registry.clear_toolbox(binding_id).await;
        }
        Ok(())
    }

    /// Render the outcome of one operation. Success feedback auto-hides
    /// after the configured delay; error feedback persists until the
    /// next operation writes over it.
    pub async fn show_outcome(
        &self,
        binding_id: &BindingId,
        outcome: Result<&ProcessingMetrics, &OperationError>,
    ) {
        let instance = self.instances.lock().await.get(binding_id).cloned();
        let Some(instance) = instance else {
            if let Err(error) = &outcome {
                warn!("outcome for {} without a toolbox: {}", binding_id, error);
            }
            return;
        };

        match outcome {
            Ok(metrics) => {
                let mut text = format!(
                    "Done: {} kB -> {} kB ({}% smaller)",
                    format_kb(metrics.original_size),
                    format_kb(metrics.processed_size),
                    metrics.compression_ratio()
                );
                if metrics.format_changed() {
                    text.push_str(&format!(
                        ", format {} -> {}",
                        metrics.original_mime, metrics.processed_mime
                    ));
                }
                if self
                    .port
                    .show_feedback(&instance.id, Feedback::success(text))
                    .await
                    .is_ok()
                {
                    self.auto_hide(instance.id.clone());
                }
            }
            Err(error) => {
                if !error.is_surfaced() {
                    return;
                }
                let _ = self
                    .port
                    .show_feedback(&instance.id, Feedback::error(error.to_string()))
                    .await;
            }
        }
    }

    /// Transient informational feedback, auto-hidden like success.
    pub async fn show_info(&self, binding_id: &BindingId, text: impl Into<String>) {
        let instance = self.instances.lock().await.get(binding_id).cloned();
        if let Some(instance) = instance {
            if self
                .port
                .show_feedback(&instance.id, Feedback::info(text))
                .await
                .is_ok()
            {
                self.auto_hide(instance.id);
            }
        }
    }

    /// Persistent progress note, overwritten by the outcome.
    pub async fn show_progress(&self, binding_id: &BindingId, op: OperationKind) {
        let instance = self.instances.lock().await.get(binding_id).cloned();
        if let Some(instance) = instance {
            let _ = self
                .port
                .show_feedback(&instance.id, Feedback::info(format!("Running {}...", op)))
                .await;
        }
    }

    /// The one blocking alert, reserved for "no file selected yet".
    pub async fn alert_no_file(&self, op: OperationKind) {
        let _ = self
            .port
            .alert(&format!("Please select a file before applying {}.", op))
            .await;
    }

    /// Same precondition, without an operation to name.
    pub async fn alert_select_first(&self) {
        let _ = self.port.alert("Please select a file first.").await;
    }

    pub async fn instance(&self, binding_id: &BindingId) -> Option<ToolboxInstance> {
        self.instances.lock().await.get(binding_id).cloned()
    }

    pub async fn close_all(&self) {
        let drained: Vec<_> = self.instances.lock().await.drain().collect();
        for (binding_id, instance) in drained {
            let _ = self.port.unmount(&instance.id).await;
            self.registry.clear_toolbox(&binding_id).await;
        }
    }

    fn auto_hide(&self, toolbox: ToolboxId) {
        let port = Arc::clone(&self.port);
        let delay = self.feedback_hide;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Unmounted panels make this a no-op by port contract.
            let _ = port.hide_feedback(&toolbox).await;
        });
    }
}

fn format_kb(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0)
}
