//! Document store — owns document rows and their permission lists.

use chrono::Utc;
use dashmap::DashMap;

use scribehub_core::types::id::{DocumentId, UserId};
use scribehub_core::{AppError, AppResult};
use scribehub_entity::document::model::Document;
use scribehub_entity::document::permission::{AccessLevel, PermissionEntry};

/// Thread-safe document store.
///
/// Every permission-list mutation runs under the document's map entry
/// lock, so concurrent `share`/`accept`/`remove_access` calls on the
/// same document are applied one at a time and the at-most-one-entry-
/// per-user invariant holds. Content replacement takes the same lock
/// but callers race by design: last writer wins.
#[derive(Debug, Default)]
pub struct DocumentStore {
    /// Document ID → document row.
    documents: DashMap<DocumentId, Document>,
}

impl DocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Inserts a new document row.
    pub fn insert(&self, document: Document) -> Document {
        self.documents.insert(document.id, document.clone());
        document
    }

    /// Fetches a document by ID.
    pub fn get(&self, id: DocumentId) -> AppResult<Document> {
        self.documents
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found("No such document found"))
    }

    /// Returns every document visible to `user_id`: owned, explicitly
    /// granted, or flagged allow-to-all.
    pub fn visible_to(&self, user_id: UserId) -> Vec<Document> {
        self.documents
            .iter()
            .filter(|entry| entry.value().is_visible_to(user_id))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Replaces a document's content (last-writer-wins).
    pub fn replace_content(&self, id: DocumentId, content: String) -> AppResult<Document> {
        let mut entry = self
            .documents
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("No such document found"))?;
        entry.content = content;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    /// Upserts a permission entry: replaces an existing entry's level,
    /// or appends a new one. Atomic per document.
    pub fn upsert_permission(
        &self,
        id: DocumentId,
        user_id: UserId,
        permission: AccessLevel,
    ) -> AppResult<Document> {
        let mut entry = self
            .documents
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("No such document found"))?;

        match entry
            .permissions
            .iter_mut()
            .find(|p| p.user_id == user_id)
        {
            Some(existing) => existing.permission = permission,
            None => entry.permissions.push(PermissionEntry {
                user_id,
                permission,
            }),
        }
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    /// Appends a permission entry only if the user holds none yet.
    ///
    /// Used by invitation acceptance, where an existing grant is a
    /// conflict rather than something to overwrite.
    pub fn grant_permission_if_absent(
        &self,
        id: DocumentId,
        user_id: UserId,
        permission: AccessLevel,
    ) -> AppResult<Document> {
        let mut entry = self
            .documents
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("No such document found"))?;

        if entry.permissions.iter().any(|p| p.user_id == user_id) {
            return Err(AppError::conflict(
                "User already has permissions for this document",
            ));
        }
        entry.permissions.push(PermissionEntry {
            user_id,
            permission,
        });
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    /// Removes the permission entry for `user_id`, exact match.
    pub fn remove_permission(&self, id: DocumentId, user_id: UserId) -> AppResult<Document> {
        let mut entry = self
            .documents
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("No such document found"))?;

        let before = entry.permissions.len();
        entry.permissions.retain(|p| p.user_id != user_id);
        if entry.permissions.len() == before {
            return Err(AppError::not_found(
                "User does not have permissions for this document",
            ));
        }
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    /// Deletes a document row.
    pub fn remove(&self, id: DocumentId) -> AppResult<Document> {
        self.documents
            .remove(&id)
            .map(|(_, doc)| doc)
            .ok_or_else(|| AppError::not_found("No such document found"))
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribehub_core::error::ErrorKind;

    fn store_with_doc(owner: UserId) -> (DocumentStore, DocumentId) {
        let store = DocumentStore::new();
        let doc = store.insert(Document::new(owner, Some("Spec".to_string()), None));
        (store, doc.id)
    }

    #[test]
    fn test_upsert_replaces_instead_of_duplicating() {
        let owner = UserId::new();
        let target = UserId::new();
        let (store, doc_id) = store_with_doc(owner);

        store
            .upsert_permission(doc_id, target, AccessLevel::ReadOnly)
            .expect("first grant");
        let doc = store
            .upsert_permission(doc_id, target, AccessLevel::ReadWrite)
            .expect("second grant");

        assert_eq!(doc.permissions.len(), 1);
        assert_eq!(doc.permission_for(target), Some(AccessLevel::ReadWrite));
    }

    #[test]
    fn test_grant_if_absent_conflicts_on_existing_entry() {
        let owner = UserId::new();
        let target = UserId::new();
        let (store, doc_id) = store_with_doc(owner);

        store
            .grant_permission_if_absent(doc_id, target, AccessLevel::ReadOnly)
            .expect("first grant");
        let err = store
            .grant_permission_if_absent(doc_id, target, AccessLevel::ReadWrite)
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(store.get(doc_id).unwrap().permissions.len(), 1);
    }

    #[test]
    fn test_remove_permission_requires_existing_entry() {
        let owner = UserId::new();
        let (store, doc_id) = store_with_doc(owner);

        let err = store.remove_permission(doc_id, UserId::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_replace_content_updates_timestamp() {
        let owner = UserId::new();
        let (store, doc_id) = store_with_doc(owner);
        let before = store.get(doc_id).unwrap();

        let after = store
            .replace_content(doc_id, "Hello".to_string())
            .expect("replace");

        assert_eq!(after.content, "Hello");
        assert!(after.updated_at >= before.updated_at);
    }

    #[test]
    fn test_missing_document_is_not_found() {
        let store = DocumentStore::new();
        let err = store.get(DocumentId::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
