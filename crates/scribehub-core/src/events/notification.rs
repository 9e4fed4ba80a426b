//! Personal notification payloads pushed over user rooms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{DocumentId, InvitationId};

/// Category of a personal notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    /// An invitation was extended to the recipient.
    #[serde(rename = "Invite")]
    Invite,
    /// Confirmation to the inviter that an invitation went out.
    #[serde(rename = "Invite Sent")]
    InviteSent,
    /// The recipient's invitation was accepted by the invitee.
    #[serde(rename = "Invite Accepted")]
    InviteAccepted,
    /// Confirmation to the invitee of their own accept/reject.
    #[serde(rename = "Invite Confirmation")]
    InviteConfirmation,
    /// The recipient's invitation was rejected by the invitee.
    #[serde(rename = "Reject")]
    Reject,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Invite => "Invite",
            Self::InviteSent => "Invite Sent",
            Self::InviteAccepted => "Invite Accepted",
            Self::InviteConfirmation => "Invite Confirmation",
            Self::Reject => "Reject",
        };
        write!(f, "{s}")
    }
}

/// A personal notification delivered best-effort to a user's room.
///
/// Delivery is fire-and-forget: a recipient with no live connections
/// simply misses it. No retry and no persistence of missed notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Client-facing dedup/ordering ID (milliseconds since the epoch).
    pub id: i64,
    /// Human-readable message.
    pub message: String,
    /// Notification category.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Related document, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<DocumentId>,
    /// Related invitation, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_id: Option<InvitationId>,
    /// Invitation status snapshot, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// When the notification was produced.
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Creates a new notification with the current time.
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis(),
            message: message.into(),
            kind,
            document_id: None,
            invite_id: None,
            status: None,
            timestamp: now,
        }
    }

    /// Attaches a related document.
    pub fn with_document(mut self, document_id: DocumentId) -> Self {
        self.document_id = Some(document_id);
        self
    }

    /// Attaches a related invitation.
    pub fn with_invite(mut self, invite_id: InvitationId) -> Self {
        self.invite_id = Some(invite_id);
        self
    }

    /// Attaches an invitation status snapshot.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_to_display_strings() {
        let json = serde_json::to_string(&NotificationKind::InviteSent).expect("serialize");
        assert_eq!(json, "\"Invite Sent\"");
    }

    #[test]
    fn test_optional_fields_omitted() {
        let n = Notification::new(NotificationKind::Reject, "Invite Rejected!");
        let value = serde_json::to_value(&n).expect("serialize");
        assert!(value.get("document_id").is_none());
        assert!(value.get("invite_id").is_none());
        assert_eq!(value.get("type").unwrap(), "Reject");
    }
}
