/// Fetch state definitions for tracking a single URL's retrieval
///
/// Every URL moves through `Pending → Fetching → {Success | RetryWait → Fetching | Failed}`.
use std::fmt;

/// Represents the current state of one fetch attempt sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchState {
    // ===== Active States =====
    /// Dequeued and about to be fetched
    Pending,

    /// A request is in flight
    Fetching,

    /// A transient failure happened; waiting out the backoff delay
    RetryWait,

    // ===== Terminal States =====
    /// The resource was retrieved (possibly with degraded content)
    Success,

    /// Attempts exhausted or a non-retryable error occurred
    Failed,
}

impl FetchState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }

    /// Returns true if moving from this state to `next` is a legal step
    pub fn can_transition_to(&self, next: FetchState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Fetching)
                | (Self::Fetching, Self::Success)
                | (Self::Fetching, Self::RetryWait)
                | (Self::Fetching, Self::Failed)
                | (Self::RetryWait, Self::Fetching)
        )
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::RetryWait => "retry_wait",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!FetchState::Pending.is_terminal());
        assert!(!FetchState::Fetching.is_terminal());
        assert!(!FetchState::RetryWait.is_terminal());

        assert!(FetchState::Success.is_terminal());
        assert!(FetchState::Failed.is_terminal());
    }

    #[test]
    fn test_legal_transitions() {
        assert!(FetchState::Pending.can_transition_to(FetchState::Fetching));
        assert!(FetchState::Fetching.can_transition_to(FetchState::Success));
        assert!(FetchState::Fetching.can_transition_to(FetchState::RetryWait));
        assert!(FetchState::Fetching.can_transition_to(FetchState::Failed));
        assert!(FetchState::RetryWait.can_transition_to(FetchState::Fetching));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!FetchState::Pending.can_transition_to(FetchState::Success));
        assert!(!FetchState::RetryWait.can_transition_to(FetchState::Failed));
        assert!(!FetchState::Success.can_transition_to(FetchState::Fetching));
        assert!(!FetchState::Failed.can_transition_to(FetchState::Fetching));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", FetchState::Pending), "pending");
        assert_eq!(format!("{}", FetchState::RetryWait), "retry_wait");
        assert_eq!(format!("{}", FetchState::Failed), "failed");
    }
}
