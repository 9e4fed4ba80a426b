//! Cross-crate event payloads.

pub mod notification;

pub use notification::{Notification, NotificationKind};
