//! Invitation lifecycle status.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an invitation.
///
/// Only `Pending` is ever durably stored: acceptance, rejection, and
/// expiry all delete the invitation outright, so the terminal variants
/// exist for wire payloads and future auditing, not for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    /// Awaiting a response from the invited user.
    Pending,
    /// Accepted by the invited user (row deleted on transition).
    Accepted,
    /// Rejected by the invited user (row deleted on transition).
    Rejected,
    /// Lapsed past its expiry time (row deleted by the sweeper).
    Expired,
}

impl InvitationStatus {
    /// Return the status as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
