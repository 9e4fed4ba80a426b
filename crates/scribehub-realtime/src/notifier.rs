//! Realtime notification delivery.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use scribehub_core::events::notification::Notification;
use scribehub_core::traits::notifier::Notifier;
use scribehub_core::types::id::UserId;

use crate::message::ServerMessage;
use crate::registry::SessionRegistry;

/// [`Notifier`] backed by the session registry.
///
/// Delivery is best-effort: a target with no live connections, or a
/// connection with a full buffer, simply misses the notification. No
/// retry and no persistence — notification loss is acceptable, content
/// loss is not.
#[derive(Debug)]
pub struct RealtimeNotifier {
    /// Room membership registry.
    registry: Arc<SessionRegistry>,
}

impl RealtimeNotifier {
    /// Creates a new realtime notifier.
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Notifier for RealtimeNotifier {
    async fn notify(&self, target: UserId, notification: Notification) {
        let in_room = self.registry.user_room_size(target);
        let delivered = self
            .registry
            .send_to_user(target, &ServerMessage::Notification {
                payload: notification,
            });

        if delivered < in_room {
            tracing::warn!(
                user_id = %target,
                delivered,
                in_room,
                "Dropped notification for unreachable connections"
            );
        } else {
            debug!(user_id = %target, delivered, "Notification delivered");
        }
    }
}
