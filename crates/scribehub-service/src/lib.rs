//! # scribehub-service
//!
//! Business logic service layer for ScribeHub: guarded document
//! operations with effective-access resolution, and the invitation
//! state machine.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod document;
pub mod invitation;

pub use context::RequestContext;
pub use document::{AccessResolver, DocumentService};
pub use invitation::InvitationService;
