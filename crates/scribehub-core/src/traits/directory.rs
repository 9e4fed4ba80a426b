//! User directory trait — lookup of externally-owned user records.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::UserId;
use crate::types::principal::Principal;

/// Read-only access to the external user directory.
///
/// Users are referenced, never owned, by this system: accounts are
/// created and maintained by an external collaborator.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Finds a user by email address.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Principal>>;

    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<Principal>>;
}
