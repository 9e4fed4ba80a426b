//! Invitation state machine.

pub mod service;

pub use service::InvitationService;
