use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    Idle,
    Tracking,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Start,
    Stop,
    IngestFailure,
    Teardown,
}

/// Allowed session transitions. `None` marks an event that is not defined for the state
/// and must be ignored by the caller.
pub fn transition(status: SessionStatus, event: SessionEvent) -> Option<SessionStatus> {
    use SessionEvent::*;
    use SessionStatus::*;

    match (status, event) {
        (Idle | Error, Start) => Some(Tracking),
        (Tracking, Start) => None,

        // Error is sticky until the next Start
        (Error, Stop | Teardown) => Some(Error),
        (Idle | Tracking, Stop | Teardown) => Some(Idle),

        (Tracking, IngestFailure) => Some(Error),
        (Idle | Error, IngestFailure) => None,
    }
}

/// Identifies one Tracking session. Every `start` produces a fresh, larger token, so a callback
/// tagged with an older one can be recognized and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(u64);

impl SessionToken {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionEvent::*;
    use SessionStatus::*;

    #[test]
    fn start_is_valid_from_idle_and_error_only() {
        assert_eq!(transition(Idle, Start), Some(Tracking));
        assert_eq!(transition(Error, Start), Some(Tracking));
        assert_eq!(transition(Tracking, Start), None);
    }

    #[test]
    fn stop_preserves_error() {
        assert_eq!(transition(Tracking, Stop), Some(Idle));
        assert_eq!(transition(Idle, Stop), Some(Idle));
        assert_eq!(transition(Error, Stop), Some(Error));
    }

    #[test]
    fn teardown_behaves_like_stop() {
        for status in [Idle, Tracking, Error] {
            assert_eq!(transition(status, Teardown), transition(status, Stop));
        }
    }

    #[test]
    fn failures_only_matter_while_tracking() {
        assert_eq!(transition(Tracking, IngestFailure), Some(Error));
        assert_eq!(transition(Idle, IngestFailure), None);
        assert_eq!(transition(Error, IngestFailure), None);
    }

    #[test]
    fn tokens_increase() {
        let first = SessionToken::default().next();
        assert!(first.next() > first);
        assert_eq!(first.to_string(), "#1");
    }
}
