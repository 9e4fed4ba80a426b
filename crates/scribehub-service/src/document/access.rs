//! Permission evaluator — resolves effective access per (user, document).

use std::sync::Arc;

use scribehub_core::AppResult;
use scribehub_core::types::id::{DocumentId, UserId};
use scribehub_entity::document::permission::EffectiveAccess;
use scribehub_store::document::DocumentStore;

/// Resolves the effective access of a user on a document.
///
/// Resolution order: owner ⇒ read-write; explicit permission entry ⇒
/// that level; otherwise none. The `allow_to_all` flag plays no role
/// here — it widens listing and read visibility only, never writes.
///
/// Callers that gate writes (the realtime broker in particular) resolve
/// at call time, so a revoked grant takes effect immediately rather
/// than lingering for the life of a connection.
#[derive(Debug, Clone)]
pub struct AccessResolver {
    /// Document store.
    documents: Arc<DocumentStore>,
}

impl AccessResolver {
    /// Creates a new resolver.
    pub fn new(documents: Arc<DocumentStore>) -> Self {
        Self { documents }
    }

    /// Resolves effective access for `user_id` on `document_id`.
    pub fn resolve(&self, user_id: UserId, document_id: DocumentId) -> AppResult<EffectiveAccess> {
        let document = self.documents.get(document_id)?;
        Ok(document.effective_access(user_id))
    }
}
