use crate::file::StoredFile;
use crate::ids::{BindingId, CorrelationId, ElementId, ToolboxId};

use super::ProcessingState;

/// The managed association between one file-input element and its tracked
/// state.
///
/// Field ownership is deliberately narrow:
/// - `original_file` is written only by the registry, and only for a
///   genuine user selection;
/// - `current_file` is written only by the replacement engine after a
///   verified install;
/// - `state` moves only through [`ProcessingState`] transitions.
///
/// The element itself stays owned by the page; the binding just annotates
/// it.
#[derive(Debug, Clone)]
pub struct InputBinding {
    pub id: BindingId,
    pub element: ElementId,

    /// The last file the user explicitly selected or dropped. Never a
    /// processing result.
    pub original_file: Option<StoredFile>,

    /// The file presently installed on the element. May equal the
    /// original or a processed derivative.
    pub current_file: Option<StoredFile>,

    pub state: ProcessingState,

    /// Weak association to at most one live toolbox instance.
    pub toolbox: Option<ToolboxId>,

    /// Correlation of the request currently awaiting its result, if any.
    pub in_flight: Option<CorrelationId>,
}

impl InputBinding {
    pub fn new(id: BindingId, element: ElementId) -> Self {
        Self {
            id,
            element,
            original_file: None,
            current_file: None,
            state: ProcessingState::default(),
            toolbox: None,
            in_flight: None,
        }
    }

    /// Whether a source file exists for processing to start from.
    pub fn has_file(&self) -> bool {
        self.current_file.is_some()
    }

    /// Whether `correlation` matches the request currently in flight.
    pub fn is_current(&self, correlation: &CorrelationId) -> bool {
        self.in_flight.as_ref() == Some(correlation)
    }
}
