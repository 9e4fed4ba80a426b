//! # scribehub-store
//!
//! In-memory stores for ScribeHub entities, built on `dashmap`.
//!
//! Entry-level exclusive access gives each store atomic per-row
//! mutation: permission-list updates never lose writes under concurrent
//! grants, and invitation resolution has exactly one winner.

pub mod document;
pub mod invitation;
pub mod user;

pub use document::DocumentStore;
pub use invitation::InvitationStore;
pub use user::InMemoryUserDirectory;
