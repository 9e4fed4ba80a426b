//! Document entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scribehub_core::types::id::{DocumentId, UserId};

use super::permission::{AccessLevel, EffectiveAccess, PermissionEntry};

/// A collaboratively edited document.
///
/// `content` is an opaque serialized rich-text state; the system never
/// interprets it. Concurrent writes are last-writer-wins by design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: DocumentId,
    /// Document title.
    pub title: String,
    /// Opaque serialized content blob.
    pub content: String,
    /// The owning user. The owner always resolves read-write and never
    /// appears in `permissions`.
    pub owner: UserId,
    /// Whether the document is visible to every user. Affects listing
    /// and read access only; it never grants write access on its own.
    pub allow_to_all: bool,
    /// Explicit grants, at most one entry per user.
    pub permissions: Vec<PermissionEntry>,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Title used when none is supplied.
    pub const DEFAULT_TITLE: &'static str = "Untitled Document";

    /// Creates a new document owned by `owner`.
    pub fn new(owner: UserId, title: Option<String>, content: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: DocumentId::new(),
            title: title.unwrap_or_else(|| Self::DEFAULT_TITLE.to_string()),
            content: content.unwrap_or_default(),
            owner,
            allow_to_all: false,
            permissions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the explicit grant for `user_id`, if any.
    pub fn permission_for(&self, user_id: UserId) -> Option<AccessLevel> {
        self.permissions
            .iter()
            .find(|entry| entry.user_id == user_id)
            .map(|entry| entry.permission)
    }

    /// Resolves effective access for `user_id`.
    ///
    /// Owner ⇒ read-write regardless of the permission list; explicit
    /// entry ⇒ that level; otherwise none. `allow_to_all` is evaluated
    /// by visibility logic, not here.
    pub fn effective_access(&self, user_id: UserId) -> EffectiveAccess {
        if self.owner == user_id {
            return EffectiveAccess::ReadWrite;
        }
        match self.permission_for(user_id) {
            Some(level) => level.into(),
            None => EffectiveAccess::None,
        }
    }

    /// Whether `user_id` may see this document in listings and reads:
    /// owner, explicit grant holder, or anyone when `allow_to_all` is set.
    pub fn is_visible_to(&self, user_id: UserId) -> bool {
        self.owner == user_id || self.permission_for(user_id).is_some() || self.allow_to_all
    }
}
