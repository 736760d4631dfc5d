//! Input surface port - abstracts the page's DOM around file inputs.
//!
//! This is the only seam through which the core touches elements: deep
//! queries, binding annotations, file-list installs and their synthetic
//! events, and the custom replacement notification external page code
//! observes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ReplaceError;
use crate::file::StoredFile;
use crate::ids::{BindingId, ElementId};
use crate::message::ProcessingMetrics;
use crate::ops::OperationKind;

/// The two events synthesized after a programmatic install, dispatched in
/// this order, both bubbling and cancelable, so host-page frameworks
/// bound to either observe the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticEvent {
    Change,
    Input,
}

impl SyntheticEvent {
    pub fn name(self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::Input => "input",
        }
    }
}

/// Payload of the bubbling notification fired after every successful
/// installation. This is the integration point for external page code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementNotice {
    pub binding_id: BindingId,
    pub operation: OperationKind,
    pub original_file: Option<StoredFile>,
    pub processed_file: StoredFile,
    pub metrics: ProcessingMetrics,
}

#[async_trait]
pub trait InputSurfacePort: Send + Sync {
    /// Deep query for file inputs under `root`, descending into children
    /// and shadow roots. A flat selector query cannot see encapsulated
    /// subtrees, which is why discovery goes through this.
    async fn query_file_inputs(&self, root: &ElementId) -> anyhow::Result<Vec<ElementId>>;

    /// The document root, used by the initial scan.
    async fn document_root(&self) -> ElementId;

    /// Whether the element is still attached to the document.
    async fn is_attached(&self, element: &ElementId) -> bool;

    /// Record the binding id on the element so re-discovery is a no-op.
    async fn annotate_binding(
        &self,
        element: &ElementId,
        binding: &BindingId,
    ) -> anyhow::Result<()>;

    /// Read a previously recorded binding annotation.
    async fn binding_annotation(&self, element: &ElementId) -> Option<BindingId>;

    /// Attach the per-input edit affordance that reopens the toolbox.
    async fn attach_edit_control(
        &self,
        element: &ElementId,
        binding: &BindingId,
    ) -> anyhow::Result<()>;

    /// Replace the element's file list with exactly the one given file.
    /// Does not fire events; the replacement engine dispatches those
    /// explicitly so the install steps stay ordered.
    async fn install_files(
        &self,
        element: &ElementId,
        file: StoredFile,
    ) -> Result<(), ReplaceError>;

    /// First entry of the element's file list, for post-install readback.
    async fn first_file(&self, element: &ElementId) -> Option<StoredFile>;

    /// Dispatch one synthetic event on the element.
    async fn dispatch_synthetic(
        &self,
        element: &ElementId,
        event: SyntheticEvent,
    ) -> anyhow::Result<()>;

    /// Re-run the element's constraint validation so host forms relying
    /// on it re-evaluate.
    async fn report_validity(&self, element: &ElementId) -> bool;

    /// Fire the bubbling replacement notification on the element.
    async fn emit_replacement_notice(
        &self,
        element: &ElementId,
        notice: ReplacementNotice,
    ) -> anyhow::Result<()>;
}
