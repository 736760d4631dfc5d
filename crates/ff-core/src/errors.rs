//! Failure taxonomy shared across the application layer.
//!
//! Every failure is recovered at the component boundary where it occurs
//! and converted into feedback scoped to the affected input's toolbox;
//! nothing propagates to the host page.

use thiserror::Error;

/// User-visible outcome taxonomy for one triggered operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OperationError {
    /// Detected before dispatch; the request is never sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A second trigger arrived while a request was in flight.
    #[error("an operation is already running for this input")]
    AlreadyProcessing,

    /// The adapter reported a failure.
    #[error("processing failed: {0}")]
    Adapter(String),

    /// No result arrived before the dispatch timeout; a late reply for
    /// the same request is dropped.
    #[error("processing timed out")]
    Timeout,

    /// The swapped file list did not hold the installed file afterwards.
    #[error("replacement verification failed")]
    ReplacementVerificationFailed,

    /// Stale binding id referenced by a late message. Never surfaced to
    /// the user.
    #[error("binding not found")]
    NotFound,
}

impl OperationError {
    /// Whether this failure is surfaced at all. Stale-binding drops stay
    /// quiet because the element may have been removed concurrently.
    pub fn is_surfaced(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Registry lookup failures. Non-fatal by contract: callers abort the
/// in-flight operation quietly.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no binding for the given id")]
    NotFound,
}

/// Failures of the file-replacement primitive.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReplaceError {
    /// The element left the document between result arrival and install.
    #[error("input element is no longer attached")]
    Detached,

    /// Post-install readback did not return the installed file. The
    /// previous file is presumed still installed.
    #[error("element file list does not hold the installed file")]
    VerificationFailed,
}

/// Failures of the window message channel.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("window channel closed")]
    ChannelClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_never_surfaced() {
        assert!(!OperationError::NotFound.is_surfaced());
        assert!(OperationError::Timeout.is_surfaced());
        assert!(OperationError::InvalidInput("x".into()).is_surfaced());
    }
}
