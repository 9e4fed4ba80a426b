//! Cross-crate trait seams.
//!
//! Defined here so that the service layer and the realtime layer can
//! depend on each other's behavior without a crate cycle.

pub mod directory;
pub mod notifier;

pub use directory::UserDirectory;
pub use notifier::Notifier;
