//! Invitation lifecycle service.
//!
//! States: `pending → accepted`, `pending → rejected`, `pending →
//! expired`. Every transition deletes the row, so a resolved invitation
//! can never be resolved again — concurrent resolutions have exactly
//! one winner and every loser observes NotFound.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use scribehub_core::events::notification::{Notification, NotificationKind};
use scribehub_core::traits::directory::UserDirectory;
use scribehub_core::traits::notifier::Notifier;
use scribehub_core::types::id::{DocumentId, InvitationId, UserId};
use scribehub_core::{AppError, AppResult};
use scribehub_entity::document::model::Document;
use scribehub_entity::document::permission::AccessLevel;
use scribehub_entity::invitation::model::Invitation;
use scribehub_entity::invitation::status::InvitationStatus;
use scribehub_store::document::DocumentStore;
use scribehub_store::invitation::InvitationStore;

use crate::context::RequestContext;

/// Manages invitation creation, cancellation, acceptance, rejection,
/// and expiry sweeping.
pub struct InvitationService {
    /// Invitation store.
    invitations: Arc<InvitationStore>,
    /// Document store (mutated on acceptance).
    documents: Arc<DocumentStore>,
    /// External user directory.
    directory: Arc<dyn UserDirectory>,
    /// Notification sink (realtime broker).
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for InvitationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvitationService").finish()
    }
}

impl InvitationService {
    /// Creates a new invitation service.
    pub fn new(
        invitations: Arc<InvitationStore>,
        documents: Arc<DocumentStore>,
        directory: Arc<dyn UserDirectory>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            invitations,
            documents,
            directory,
            notifier,
        }
    }

    /// Creates a pending invitation for `email` on `document_id`.
    ///
    /// Only the document owner may invite; the target must exist in the
    /// directory; an existing pending invite or permission entry is a
    /// conflict. Both parties' user rooms are notified.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        email: &str,
        permission: AccessLevel,
    ) -> AppResult<Invitation> {
        let document = self.documents.get(document_id)?;
        if document.owner != ctx.user_id {
            return Err(AppError::forbidden(
                "You don't have permission to invite users to this document",
            ));
        }

        let target = self
            .directory
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if document.permission_for(target.user_id).is_some() {
            return Err(AppError::conflict(
                "User already has permissions for this document",
            ));
        }

        // The store enforces the one-pending-invite-per-(document, email)
        // invariant atomically and yields Conflict on a duplicate.
        let invitation = self.invitations.insert(Invitation::new(
            document_id,
            email,
            target.full_name.clone(),
            permission,
        ))?;

        info!(
            user_id = %ctx.user_id,
            document_id = %document_id,
            invite_id = %invitation.id,
            email = %email,
            permission = %permission,
            "Invitation created"
        );

        self.notifier
            .notify(
                target.user_id,
                Notification::new(
                    NotificationKind::Invite,
                    format!(
                        "\"{}\" has invited you to the document with {} access.",
                        ctx.full_name, permission
                    ),
                )
                .with_document(document_id)
                .with_invite(invitation.id)
                .with_status(invitation.status.as_str()),
            )
            .await;

        self.notifier
            .notify(
                ctx.user_id,
                Notification::new(
                    NotificationKind::InviteSent,
                    format!(
                        "You have successfully sent an invitation to {email} with {permission} access."
                    ),
                )
                .with_document(document_id)
                .with_invite(invitation.id)
                .with_status(invitation.status.as_str()),
            )
            .await;

        Ok(invitation)
    }

    /// Cancels a pending invitation. Owner only; the invitation must
    /// belong to `document_id`.
    pub fn cancel(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        invite_id: InvitationId,
    ) -> AppResult<()> {
        let invitation = self
            .invitations
            .get(invite_id)
            .filter(|inv| inv.document_id == document_id)
            .ok_or_else(|| AppError::not_found("Invitation not found"))?;

        let document = self.documents.get(document_id)?;
        if document.owner != ctx.user_id {
            return Err(AppError::forbidden(
                "You don't have permission to cancel this invitation",
            ));
        }

        if invitation.status != InvitationStatus::Pending {
            return Err(AppError::conflict(format!(
                "Cannot cancel invitation that has been {}",
                invitation.status
            )));
        }

        self.invitations
            .claim(invite_id)
            .ok_or_else(|| AppError::not_found("Invitation not found"))?;

        info!(
            user_id = %ctx.user_id,
            document_id = %document_id,
            invite_id = %invite_id,
            "Invitation cancelled"
        );
        Ok(())
    }

    /// Accepts an invitation addressed to the caller.
    ///
    /// Grants {caller, invite.permission} on the document and deletes
    /// the invitation as one logical transaction: the row is atomically
    /// claimed before the grant, so of two concurrent accepts exactly
    /// one succeeds and the other observes NotFound.
    pub async fn accept(
        &self,
        ctx: &RequestContext,
        invite_id: InvitationId,
    ) -> AppResult<Document> {
        let invitation = self
            .invitations
            .get(invite_id)
            .ok_or_else(|| AppError::not_found("Invitation not found"))?;

        if invitation.invited_user_email != ctx.email {
            return Err(AppError::forbidden(
                "You are not authorized to accept this invitation",
            ));
        }
        if invitation.status != InvitationStatus::Pending {
            return Err(AppError::conflict(
                "This invitation has already been processed",
            ));
        }
        if invitation.is_expired_at(ctx.request_time) {
            return Err(AppError::validation("This invitation has expired"));
        }

        let document = self.documents.get(invitation.document_id)?;
        if document.permission_for(ctx.user_id).is_some() {
            return Err(AppError::conflict(
                "You already have permissions for this document",
            ));
        }

        // Claim point: the single winner proceeds to the grant.
        let invitation = self
            .invitations
            .claim(invite_id)
            .ok_or_else(|| AppError::not_found("Invitation not found"))?;

        let document = self.documents.grant_permission_if_absent(
            invitation.document_id,
            ctx.user_id,
            invitation.permission,
        )?;

        info!(
            user_id = %ctx.user_id,
            document_id = %document.id,
            invite_id = %invite_id,
            permission = %invitation.permission,
            "Invitation accepted"
        );

        self.notifier
            .notify(
                document.owner,
                Notification::new(
                    NotificationKind::InviteAccepted,
                    format!(
                        "\"{}\" has accepted your invitation to the document.",
                        ctx.full_name
                    ),
                )
                .with_document(document.id),
            )
            .await;

        self.notifier
            .notify(
                ctx.user_id,
                Notification::new(
                    NotificationKind::InviteConfirmation,
                    "You have successfully accepted the invitation to the document.",
                )
                .with_document(document.id),
            )
            .await;

        Ok(document)
    }

    /// Rejects an invitation addressed to the caller. Deletes the row
    /// and notifies both parties; no permission changes.
    pub async fn reject(
        &self,
        ctx: &RequestContext,
        owner_id: UserId,
        invite_id: InvitationId,
    ) -> AppResult<()> {
        let invitation = self
            .invitations
            .get(invite_id)
            .ok_or_else(|| AppError::not_found("No such invite found, please try again"))?;

        if invitation.invited_user_email != ctx.email {
            return Err(AppError::forbidden(
                "You don't have permission to reject this invite",
            ));
        }

        self.invitations
            .claim(invite_id)
            .ok_or_else(|| AppError::not_found("No such invite found, please try again"))?;

        info!(
            user_id = %ctx.user_id,
            invite_id = %invite_id,
            "Invitation rejected"
        );

        self.notifier
            .notify(
                owner_id,
                Notification::new(
                    NotificationKind::Reject,
                    format!(
                        "\"{}\" has rejected your invitation to the document.",
                        ctx.full_name
                    ),
                ),
            )
            .await;

        self.notifier
            .notify(
                ctx.user_id,
                Notification::new(NotificationKind::InviteConfirmation, "Invite Rejected!"),
            )
            .await;

        Ok(())
    }

    /// Lists pending invitations for a document. Owner only.
    pub fn list_pending_for_document(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
    ) -> AppResult<Vec<Invitation>> {
        let document = self.documents.get(document_id)?;
        if document.owner != ctx.user_id {
            return Err(AppError::forbidden("Access denied"));
        }
        Ok(self.invitations.list_for_document(document_id))
    }

    /// Lists invitations addressed to the caller's email.
    pub fn list_for_current_user(&self, ctx: &RequestContext) -> Vec<Invitation> {
        self.invitations.list_for_email(&ctx.email)
    }

    /// Deletes every pending invitation past its expiry. Idempotent and
    /// safe alongside any other operation; emits no notifications.
    pub fn sweep(&self) -> usize {
        let removed = self.invitations.sweep_expired(Utc::now());
        if removed > 0 {
            info!(removed, "Cleaned up expired invitations");
        }
        removed
    }
}
