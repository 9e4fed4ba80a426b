//! In-memory user directory.

use async_trait::async_trait;
use dashmap::DashMap;

use scribehub_core::AppResult;
use scribehub_core::traits::directory::UserDirectory;
use scribehub_core::types::id::UserId;
use scribehub_core::types::principal::Principal;

/// In-memory [`UserDirectory`] implementation.
///
/// Production deployments back this trait with the external account
/// service; this implementation serves single-process use and tests.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    /// User ID → profile.
    by_id: DashMap<UserId, Principal>,
    /// Email → user ID.
    by_email: DashMap<String, UserId>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            by_id: DashMap::new(),
            by_email: DashMap::new(),
        }
    }

    /// Registers a user profile.
    pub fn insert(&self, principal: Principal) {
        self.by_email
            .insert(principal.email.clone(), principal.user_id);
        self.by_id.insert(principal.user_id, principal);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Principal>> {
        let Some(id) = self.by_email.get(email).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.by_id.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<Principal>> {
        Ok(self.by_id.get(&id).map(|entry| entry.value().clone()))
    }
}
