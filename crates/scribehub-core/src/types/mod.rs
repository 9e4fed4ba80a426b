//! Shared type definitions used across all crates.

pub mod id;
pub mod principal;

pub use id::{ConnectionId, DocumentId, InvitationId, UserId};
pub use principal::Principal;
