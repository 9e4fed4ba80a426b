//! Request context carrying the verified principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scribehub_core::types::id::UserId;
use scribehub_core::types::principal::Principal;

/// Context for the current authenticated request.
///
/// Identity verification happens in an external collaborator; by the
/// time a call reaches a service, the principal is trusted. Passed into
/// every service method so each operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: UserId,
    /// The acting user's email address.
    pub email: String,
    /// The acting user's display name.
    pub full_name: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, email: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            full_name: full_name.into(),
            request_time: Utc::now(),
        }
    }

    /// Returns the context's principal.
    pub fn principal(&self) -> Principal {
        Principal::new(self.user_id, self.email.clone(), self.full_name.clone())
    }
}

impl From<Principal> for RequestContext {
    fn from(principal: Principal) -> Self {
        Self::new(principal.user_id, principal.email, principal.full_name)
    }
}
