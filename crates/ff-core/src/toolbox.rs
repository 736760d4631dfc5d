//! Toolbox lifecycle domain types.

use serde::{Deserialize, Serialize};

use crate::file::MediaKind;
use crate::ids::BindingId;

/// Lifecycle of one toolbox instance
///
/// ```text
/// Uninitialized ──→ Loading ──→ Ready ──→ Hidden
/// ```
///
/// `Hidden` is terminal for the instance: a later edit request builds a
/// fresh toolbox rather than reanimating a hidden one, so stale listeners
/// never accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolboxState {
    Uninitialized,
    /// Template fetch in progress
    Loading,
    /// Controls wired, preview rendered
    Ready,
    /// Closed by the user or removed after a completed operation
    Hidden,
}

impl ToolboxState {
    pub fn is_live(self) -> bool {
        matches!(self, Self::Loading | Self::Ready)
    }

    pub fn begin_loading(self) -> Option<Self> {
        match self {
            Self::Uninitialized => Some(Self::Loading),
            _ => None,
        }
    }

    pub fn on_loaded(self) -> Option<Self> {
        match self {
            Self::Loading => Some(Self::Ready),
            _ => None,
        }
    }

    pub fn hide(self) -> Self {
        Self::Hidden
    }
}

impl Default for ToolboxState {
    fn default() -> Self {
        Self::Uninitialized
    }
}

/// What the render surface needs to mount a panel next to an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolboxDescriptor {
    pub binding_id: BindingId,
    pub kind: MediaKind,
    pub file_name: String,
    pub size_bytes: u64,
}

/// Tone of one feedback line in the panel's feedback region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTone {
    Info,
    Success,
    Error,
}

/// One feedback line. Success feedback is transient (the controller
/// auto-hides it), error feedback persists until the next operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub tone: FeedbackTone,
    pub text: String,
}

impl Feedback {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            tone: FeedbackTone::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            tone: FeedbackTone::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            tone: FeedbackTone::Error,
            text: text.into(),
        }
    }
}
