//! # scribehub-realtime
//!
//! Realtime session broker for ScribeHub: room membership over
//! per-connection channels, low-latency fan-out of edits and personal
//! notifications, and write-permission checks at submit time.
//!
//! The broker carries no authentication logic — identity is supplied
//! externally per connection.

pub mod broker;
pub mod connection;
pub mod message;
pub mod notifier;
pub mod registry;

pub use broker::{EditAck, SessionBroker};
pub use connection::ConnectionHandle;
pub use message::ServerMessage;
pub use notifier::RealtimeNotifier;
pub use registry::SessionRegistry;
