//! Invitation store — pending invitation rows with atomic resolution.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use scribehub_core::types::id::{DocumentId, InvitationId};
use scribehub_core::{AppError, AppResult};
use scribehub_entity::invitation::model::Invitation;
use scribehub_entity::invitation::status::InvitationStatus;

/// Thread-safe store of pending invitations.
///
/// A secondary (document, email) index enforces the at-most-one-pending-
/// invitation invariant atomically: insertion claims the index slot
/// through its entry lock, so two racing creates cannot both succeed.
/// Resolution goes through [`InvitationStore::claim`], which removes the
/// row first — exactly one concurrent accept/cancel/reject wins and
/// every other caller observes the row as already gone.
#[derive(Debug, Default)]
pub struct InvitationStore {
    /// Invitation ID → invitation row.
    invitations: DashMap<InvitationId, Invitation>,
    /// (document, invited email) → pending invitation ID.
    pending_index: DashMap<(DocumentId, String), InvitationId>,
}

impl InvitationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            invitations: DashMap::new(),
            pending_index: DashMap::new(),
        }
    }

    /// Inserts a new pending invitation.
    ///
    /// Fails with Conflict if a pending invitation already exists for
    /// the same (document, email) pair.
    pub fn insert(&self, invitation: Invitation) -> AppResult<Invitation> {
        let key = (
            invitation.document_id,
            invitation.invited_user_email.clone(),
        );
        match self.pending_index.entry(key) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "User is already invited to this document",
            )),
            Entry::Vacant(slot) => {
                slot.insert(invitation.id);
                self.invitations.insert(invitation.id, invitation.clone());
                Ok(invitation)
            }
        }
    }

    /// Fetches an invitation by ID without resolving it.
    pub fn get(&self, id: InvitationId) -> Option<Invitation> {
        self.invitations.get(&id).map(|entry| entry.value().clone())
    }

    /// Atomically removes an invitation, returning it to the single
    /// caller that wins the race. Every other caller gets `None`.
    pub fn claim(&self, id: InvitationId) -> Option<Invitation> {
        let (_, invitation) = self.invitations.remove(&id)?;
        self.pending_index.remove(&(
            invitation.document_id,
            invitation.invited_user_email.clone(),
        ));
        Some(invitation)
    }

    /// Lists all pending invitations for a document.
    pub fn list_for_document(&self, document_id: DocumentId) -> Vec<Invitation> {
        self.invitations
            .iter()
            .filter(|entry| entry.value().document_id == document_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Lists all invitations addressed to an email.
    pub fn list_for_email(&self, email: &str) -> Vec<Invitation> {
        self.invitations
            .iter()
            .filter(|entry| entry.value().invited_user_email == email)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Deletes every pending invitation with `expired_at < now`.
    ///
    /// Idempotent and safe to run concurrently with resolution: each
    /// expired row is claimed individually, so a row racing with an
    /// accept or cancel is removed exactly once.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let expired: Vec<InvitationId> = self
            .invitations
            .iter()
            .filter(|entry| {
                let inv = entry.value();
                inv.status == InvitationStatus::Pending && inv.is_expired_at(now)
            })
            .map(|entry| *entry.key())
            .collect();

        expired
            .into_iter()
            .filter(|id| self.claim(*id).is_some())
            .count()
    }

    /// Number of stored invitations.
    pub fn len(&self) -> usize {
        self.invitations.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.invitations.is_empty()
    }
}
