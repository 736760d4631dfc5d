use async_trait::async_trait;

use crate::file::StoredFile;
use crate::ids::ToolboxId;
use crate::ops::OperationKind;
use crate::toolbox::{Feedback, ToolboxDescriptor};

/// Render surface for the toolbox controller.
///
/// Which instance exists for which binding, which control group is
/// visible, and when feedback hides are all controller state; the port
/// only renders what it is told.
#[async_trait]
pub trait ToolboxPort: Send + Sync {
    /// Mount a panel for the descriptor next to its input. Awaiting this
    /// is the "template fetch" of the toolbox lifecycle.
    async fn mount(&self, descriptor: ToolboxDescriptor) -> anyhow::Result<ToolboxId>;

    /// Refresh the preview for the bound file.
    async fn update_preview(&self, toolbox: &ToolboxId, file: &StoredFile) -> anyhow::Result<()>;

    /// Show exactly one operation's control group, hiding the others.
    async fn show_controls(&self, toolbox: &ToolboxId, op: OperationKind) -> anyhow::Result<()>;

    /// Render one feedback line in the panel's feedback region.
    async fn show_feedback(&self, toolbox: &ToolboxId, feedback: Feedback) -> anyhow::Result<()>;

    /// Clear the feedback region. A no-op for an already unmounted panel.
    async fn hide_feedback(&self, toolbox: &ToolboxId) -> anyhow::Result<()>;

    /// Detach the panel from the document.
    async fn unmount(&self, toolbox: &ToolboxId) -> anyhow::Result<()>;

    /// The one blocking alert the design allows, reserved for the
    /// "no file selected yet" precondition.
    async fn alert(&self, message: &str) -> anyhow::Result<()>;
}
