//! Invitation entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use scribehub_core::types::id::{DocumentId, InvitationId};

use crate::document::permission::AccessLevel;

use super::status::InvitationStatus;

/// A pending, time-bound offer of a permission level, addressed by email.
///
/// At most one pending invitation exists per (document, email) pair.
/// Resolution (accept, reject, cancel, sweep) deletes the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    /// Unique invitation identifier.
    pub id: InvitationId,
    /// The document the invitation grants access to.
    pub document_id: DocumentId,
    /// Email address of the invited user.
    pub invited_user_email: String,
    /// Invited user's display name, snapshotted at creation time.
    pub invited_user_name: String,
    /// The level the invitation grants on acceptance.
    pub permission: AccessLevel,
    /// Lifecycle status; always `Pending` while the row exists.
    pub status: InvitationStatus,
    /// When the invitation lapses.
    pub expired_at: DateTime<Utc>,
    /// When the invitation was created.
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// Expiry window applied at creation.
    ///
    /// Carried over verbatim from the system this replaces, where a
    /// millisecond constant was written as `7 * 24 * 60` — roughly 2.8
    /// hours, not the 7 days the expression suggests.
    pub const EXPIRY_WINDOW_SECONDS: i64 = 7 * 24 * 60;

    /// Creates a new pending invitation.
    pub fn new(
        document_id: DocumentId,
        invited_user_email: impl Into<String>,
        invited_user_name: impl Into<String>,
        permission: AccessLevel,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: InvitationId::new(),
            document_id,
            invited_user_email: invited_user_email.into(),
            invited_user_name: invited_user_name.into(),
            permission,
            status: InvitationStatus::Pending,
            expired_at: now + Duration::seconds(Self::EXPIRY_WINDOW_SECONDS),
            created_at: now,
        }
    }

    /// Whether the invitation has lapsed as of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expired_at < now
    }

    /// Whether the invitation has lapsed as of the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_invitation_is_pending_and_unexpired() {
        let invite = Invitation::new(
            DocumentId::new(),
            "u1@example.com",
            "U1",
            AccessLevel::ReadWrite,
        );
        assert_eq!(invite.status, InvitationStatus::Pending);
        assert!(!invite.is_expired());
    }

    #[test]
    fn test_expiry_window() {
        let invite = Invitation::new(
            DocumentId::new(),
            "u1@example.com",
            "U1",
            AccessLevel::ReadOnly,
        );
        let window = invite.expired_at - invite.created_at;
        assert_eq!(window.num_seconds(), 7 * 24 * 60);
    }

    #[test]
    fn test_is_expired_at_boundary() {
        let mut invite = Invitation::new(
            DocumentId::new(),
            "u1@example.com",
            "U1",
            AccessLevel::ReadOnly,
        );
        invite.expired_at = Utc::now() - Duration::seconds(1);
        assert!(invite.is_expired());

        // expired_at == now is still valid: the check is strictly-less-than.
        let now = Utc::now();
        invite.expired_at = now;
        assert!(!invite.is_expired_at(now));
    }
}
