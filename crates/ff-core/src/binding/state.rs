use serde::{Deserialize, Serialize};

/// Per-input processing state machine
///
/// Design principle: this is a pure type state machine with only state
/// definitions and transition validation logic. Runtime behaviors like
/// timers and message dispatch are handled by the application layer
/// (ff-app).
///
/// State transitions:
///
/// ```text
/// Idle ──(dispatch request)──→ Processing
/// Processing ──(result: success)──→ Idle      [current file updated]
/// Processing ──(result: failure)──→ Failed
/// Processing ──(timeout elapsed)──→ Idle      [error surfaced, file unchanged]
/// Failed ──(any new dispatch)──→ Processing
/// ```
///
/// A second dispatch while `Processing` is refused by `begin`, which is
/// how at-most-one-concurrent-operation-per-input is enforced at the
/// trigger rather than tolerated at the result handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingState {
    /// No operation in flight for this input
    Idle,

    /// A request has been dispatched and its result is awaited
    Processing,

    /// The last operation failed; a new dispatch is allowed
    Failed,
}

impl ProcessingState {
    /// Check whether an operation is currently in flight
    pub fn is_busy(self) -> bool {
        self == Self::Processing
    }

    /// Start an operation. Refused while one is already in flight.
    pub fn begin(self) -> Option<Self> {
        match self {
            Self::Idle | Self::Failed => Some(Self::Processing),
            Self::Processing => None,
        }
    }

    /// Transition after a successful result was installed
    pub fn on_success(self) -> Self {
        match self {
            Self::Processing => Self::Idle,
            _ => self,
        }
    }

    /// Transition after the adapter reported a failure
    pub fn on_failure(self) -> Self {
        match self {
            Self::Processing => Self::Failed,
            _ => self,
        }
    }

    /// Transition after the dispatch timeout fired with no result
    pub fn on_timeout(self) -> Self {
        match self {
            Self::Processing => Self::Idle,
            _ => self,
        }
    }
}

impl Default for ProcessingState {
    fn default() -> Self {
        Self::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_flow() {
        let mut state = ProcessingState::Idle;

        state = state.begin().unwrap();
        assert_eq!(state, ProcessingState::Processing);
        assert!(state.is_busy());

        state = state.on_success();
        assert_eq!(state, ProcessingState::Idle);
        assert!(!state.is_busy());
    }

    #[test]
    fn test_failure_allows_retry() {
        let mut state = ProcessingState::Idle;

        state = state.begin().unwrap();
        state = state.on_failure();
        assert_eq!(state, ProcessingState::Failed);

        // Any new dispatch moves Failed back to Processing.
        state = state.begin().unwrap();
        assert_eq!(state, ProcessingState::Processing);
    }

    #[test]
    fn test_second_dispatch_is_refused_while_processing() {
        let state = ProcessingState::Processing;
        assert!(state.begin().is_none());
    }

    #[test]
    fn test_timeout_returns_to_idle() {
        let state = ProcessingState::Processing;
        assert_eq!(state.on_timeout(), ProcessingState::Idle);
    }

    #[test]
    fn test_results_ignored_outside_processing() {
        assert_eq!(ProcessingState::Idle.on_success(), ProcessingState::Idle);
        assert_eq!(ProcessingState::Idle.on_failure(), ProcessingState::Idle);
        assert_eq!(ProcessingState::Failed.on_timeout(), ProcessingState::Failed);
    }

    #[test]
    fn test_default_state() {
        assert_eq!(ProcessingState::default(), ProcessingState::Idle);
    }
}
