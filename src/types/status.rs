use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lifecycle of a listing request. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// Admin actions that may be applied to a listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Edit,
    Approve,
    Reject,
}

impl RequestStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<RequestStatus> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns the status a request moves to when `action` is applied.
    ///
    /// Every action requires a pending request. A terminal request reports
    /// the same error a missing one would, so callers cannot tell the two apart.
    pub fn apply(self, action: ModerationAction) -> Result<RequestStatus> {
        match (self, action) {
            (Self::Pending, ModerationAction::Edit) => Ok(Self::Pending),
            (Self::Pending, ModerationAction::Approve) => Ok(Self::Approved),
            (Self::Pending, ModerationAction::Reject) => Ok(Self::Rejected),
            (_, ModerationAction::Edit) => Err(Error::NotFoundOrNotPending),
            (_, _) => Err(Error::NotFoundOrAlreadyProcessed),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational status of a listed server. Observed externally; this crate
/// only sets the initial `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    #[default]
    Unknown,
    Online,
    Offline,
}

impl ServerStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }

    /// Unrecognized values read back as `Unknown`.
    #[must_use]
    pub fn parse_lenient(s: &str) -> ServerStatus {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" => Self::Online,
            "offline" => Self::Offline,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions() {
        let s = RequestStatus::Pending;
        assert_eq!(s.apply(ModerationAction::Edit).unwrap(), RequestStatus::Pending);
        assert_eq!(s.apply(ModerationAction::Approve).unwrap(), RequestStatus::Approved);
        assert_eq!(s.apply(ModerationAction::Reject).unwrap(), RequestStatus::Rejected);
    }

    #[test]
    fn test_terminal_states_reject_every_action() {
        for status in [RequestStatus::Approved, RequestStatus::Rejected] {
            assert!(matches!(
                status.apply(ModerationAction::Approve),
                Err(Error::NotFoundOrAlreadyProcessed)
            ));
            assert!(matches!(
                status.apply(ModerationAction::Reject),
                Err(Error::NotFoundOrAlreadyProcessed)
            ));
            assert!(matches!(
                status.apply(ModerationAction::Edit),
                Err(Error::NotFoundOrNotPending)
            ));
        }
    }

    #[test]
    fn test_parse_request_status() {
        assert_eq!(RequestStatus::parse("approved"), Some(RequestStatus::Approved));
        assert_eq!(RequestStatus::parse("APPROVED"), None);
        assert_eq!(RequestStatus::parse(""), None);
    }

    #[test]
    fn test_server_status_lenient() {
        assert_eq!(ServerStatus::parse_lenient("Online"), ServerStatus::Online);
        assert_eq!(ServerStatus::parse_lenient("6 players"), ServerStatus::Unknown);
        assert_eq!(ServerStatus::default().as_str(), "unknown");
    }
}
