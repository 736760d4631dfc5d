use async_trait::async_trait;

use crate::file::StoredFile;
use crate::ids::ElementId;

/// DOM-level facts the application reacts to.
///
/// Events describe what happened, never what should happen next. The
/// `trusted` bit mirrors the DOM's own distinction between user gestures
/// and script-dispatched events; it is what keeps a synthetic change
/// event raised by the replacement engine from being mistaken for a
/// genuine selection.
#[derive(Debug, Clone)]
pub enum PageEvent {
    /// A change event fired on a file input.
    SelectionChanged {
        element: ElementId,
        files: Vec<StoredFile>,
        trusted: bool,
    },

    /// The edit affordance next to an input was activated.
    EditRequested { element: ElementId },
}

/// Port for consuming page events.
#[async_trait]
pub trait PageEventStreamPort: Send + Sync {
    async fn subscribe(&self) -> anyhow::Result<tokio::sync::mpsc::Receiver<PageEvent>>;
}
