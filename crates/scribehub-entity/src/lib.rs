//! # scribehub-entity
//!
//! Domain entity models for ScribeHub: documents with their permission
//! lists, and time-bound invitations. Entities are plain serde-friendly
//! structs; all persistence and business rules live in the store and
//! service crates.

pub mod document;
pub mod invitation;

pub use document::{AccessLevel, Document, EffectiveAccess, PermissionEntry};
pub use invitation::{Invitation, InvitationStatus};
