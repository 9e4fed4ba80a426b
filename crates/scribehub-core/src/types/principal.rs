//! Verified principal identity.

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// A verified user identity, supplied by the authorization collaborator.
///
/// Every inbound call carries one of these; no credential checks happen
/// inside this codebase. The same shape is returned by
/// [`crate::traits::UserDirectory`] lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The user's ID.
    pub user_id: UserId,
    /// The user's email address.
    pub email: String,
    /// The user's display name.
    pub full_name: String,
}

impl Principal {
    /// Creates a new principal.
    pub fn new(user_id: UserId, email: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            full_name: full_name.into(),
        }
    }
}
