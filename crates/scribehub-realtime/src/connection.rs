//! Individual realtime connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use scribehub_core::types::id::{ConnectionId, UserId};

use crate::message::ServerMessage;

/// A handle to a single persistent connection.
///
/// Holds the sender half of the connection's outbound channel plus the
/// externally-verified identity it was opened with. The transport layer
/// owns the receiver half and drains it to the client.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// User this connection belongs to.
    pub user_id: UserId,
    /// Display name (cached from the principal).
    pub full_name: String,
    /// Sender for outbound messages.
    sender: mpsc::Sender<ServerMessage>,
    /// Whether the connection is still alive.
    alive: AtomicBool,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
}

impl ConnectionHandle {
    /// Creates a new connection handle.
    pub fn new(user_id: UserId, full_name: String, sender: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            id: ConnectionId::new(),
            user_id,
            full_name,
            sender,
            alive: AtomicBool::new(true),
            connected_at: Utc::now(),
        }
    }

    /// Pushes a message to this connection. Best-effort: a full buffer
    /// drops the message, a closed channel marks the connection dead.
    pub fn send(&self, msg: ServerMessage) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(msg) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Whether the connection is alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Marks the connection as dead.
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
