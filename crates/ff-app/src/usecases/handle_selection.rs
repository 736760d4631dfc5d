use std::sync::Arc;

use anyhow::Result;
use log::debug;

use ff_core::{ElementId, StoredFile};

use crate::registry::InputRegistry;
use crate::toolbox::ToolboxController;

/// Use case that reacts to a change event on a file input.
///
/// ## Responsibility
///
/// Triggered whenever a change event reaches the event loop. Its job is
/// to decide whether the event is a genuine user selection, and if so:
///
/// - capture the file as the binding's new original,
/// - open or refresh the toolbox for the file's media family,
/// - tear the toolbox down when the file's kind is unsupported.
///
/// ## What this use case does NOT do
///
/// - It never captures anything from an untrusted change event; those
///   are raised by the replacement engine (or arbitrary page scripts)
///   and must not rewrite the original.
/// - It does not decide which controls a toolbox shows; that is the
///   controller's job, keyed off the media kind.
pub struct HandleSelectionChanged {
    registry: Arc<InputRegistry>,
    toolbox: Arc<ToolboxController>,
}

impl HandleSelectionChanged {
    pub fn new(registry: Arc<InputRegistry>, toolbox: Arc<ToolboxController>) -> Self {
        Self { registry, toolbox }
    }

    pub async fn execute(
        &self,
        element: &ElementId,
        files: Vec<StoredFile>,
        trusted: bool,
    ) -> Result<()> {
        if trusted && self.registry.binding_for_element(element).await.is_none() {
            // First sighting can be the selection itself when the change
            // fires before discovery got to the element.
            self.registry.register(element).await?;
        }

        let Some(capture) = self.registry.record_selection(element, &files, trusted).await else {
            return Ok(());
        };

        debug!(
            "captured original {} ({}) for {}",
            capture.file.name,
            capture.kind.as_str(),
            capture.binding_id
        );

        if capture.kind.is_supported() {
            self.toolbox.open(&capture.binding_id, &capture.file).await?;
        } else {
            // No controls for this file; a stale toolbox would be worse
            // than none.
            self.toolbox.close(&capture.binding_id).await?;
        }
        Ok(())
    }
}
