//! Notifier trait — personal notification delivery sink.

use async_trait::async_trait;

use crate::events::notification::Notification;
use crate::types::id::UserId;

/// Delivers personal notifications to a user's connections.
///
/// Implemented by the realtime layer and injected into services, so the
/// invitation state machine can signal connected peers without depending
/// on the broker directly. Delivery is best-effort: implementations log
/// and drop failures rather than surfacing them to the caller.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Pushes a notification to every live connection in the target
    /// user's room.
    async fn notify(&self, target: UserId, notification: Notification);
}
