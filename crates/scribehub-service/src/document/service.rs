//! Document CRUD service with access gating.

use std::sync::Arc;

use tracing::info;

use scribehub_core::types::id::{DocumentId, UserId};
use scribehub_core::{AppError, AppResult};
use scribehub_entity::document::model::Document;
use scribehub_entity::document::permission::AccessLevel;
use scribehub_store::document::DocumentStore;

use super::access::AccessResolver;
use crate::context::RequestContext;

/// Manages document creation, reads, content updates, sharing, and
/// deletion. Every mutation is gated through the [`AccessResolver`] or
/// an ownership check before it reaches the store.
#[derive(Debug, Clone)]
pub struct DocumentService {
    /// Document store.
    documents: Arc<DocumentStore>,
    /// Permission evaluator.
    access: Arc<AccessResolver>,
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(documents: Arc<DocumentStore>, access: Arc<AccessResolver>) -> Self {
        Self { documents, access }
    }

    /// Creates a document owned by the caller.
    pub fn create(
        &self,
        ctx: &RequestContext,
        title: Option<String>,
        content: Option<String>,
    ) -> AppResult<Document> {
        let document = self
            .documents
            .insert(Document::new(ctx.user_id, title, content));

        info!(
            user_id = %ctx.user_id,
            document_id = %document.id,
            title = %document.title,
            "Document created"
        );
        Ok(document)
    }

    /// Fetches a document the caller may see: owner, grant holder, or
    /// anyone when the document is flagged allow-to-all.
    pub fn get(&self, ctx: &RequestContext, id: DocumentId) -> AppResult<Document> {
        let document = self.documents.get(id)?;
        if !document.is_visible_to(ctx.user_id) {
            return Err(AppError::forbidden("Access denied"));
        }
        Ok(document)
    }

    /// Lists every document visible to the caller.
    pub fn list_visible(&self, ctx: &RequestContext) -> Vec<Document> {
        self.documents.visible_to(ctx.user_id)
    }

    /// Replaces a document's content. Requires effective read-write
    /// access at call time; concurrent writers are last-writer-wins.
    pub fn update_content(
        &self,
        ctx: &RequestContext,
        id: DocumentId,
        content: String,
    ) -> AppResult<Document> {
        if !self.access.resolve(ctx.user_id, id)?.can_write() {
            return Err(AppError::forbidden("Access denied"));
        }
        self.documents.replace_content(id, content)
    }

    /// Grants or updates a permission entry. Owner only; atomic upsert
    /// by user, so racing shares never duplicate an entry.
    pub fn share(
        &self,
        ctx: &RequestContext,
        id: DocumentId,
        target_user_id: UserId,
        permission: AccessLevel,
    ) -> AppResult<Document> {
        let document = self.documents.get(id)?;
        if document.owner != ctx.user_id {
            return Err(AppError::forbidden("Access denied"));
        }
        if target_user_id == ctx.user_id {
            return Err(AppError::validation(
                "The owner already has full access and cannot be granted a permission entry",
            ));
        }

        let document = self
            .documents
            .upsert_permission(id, target_user_id, permission)?;

        info!(
            user_id = %ctx.user_id,
            document_id = %id,
            target_user_id = %target_user_id,
            permission = %permission,
            "Permission upserted"
        );
        Ok(document)
    }

    /// Removes a user's permission entry. Owner only; NotFound when the
    /// target holds no entry.
    pub fn remove_access(
        &self,
        ctx: &RequestContext,
        id: DocumentId,
        target_user_id: UserId,
    ) -> AppResult<Document> {
        let document = self.documents.get(id)?;
        if document.owner != ctx.user_id {
            return Err(AppError::forbidden(
                "You do not have permission to remove access",
            ));
        }

        let document = self.documents.remove_permission(id, target_user_id)?;

        info!(
            user_id = %ctx.user_id,
            document_id = %id,
            target_user_id = %target_user_id,
            "Permission removed"
        );
        Ok(document)
    }

    /// Deletes a document. Owner only.
    pub fn delete(&self, ctx: &RequestContext, id: DocumentId) -> AppResult<()> {
        let document = self.documents.get(id)?;
        if document.owner != ctx.user_id {
            return Err(AppError::forbidden("Access denied"));
        }

        self.documents.remove(id)?;
        info!(user_id = %ctx.user_id, document_id = %id, "Document deleted");
        Ok(())
    }
}
