//! Session registry — room membership for all active connections.

use std::sync::Arc;

use dashmap::DashMap;

use scribehub_core::types::id::{ConnectionId, DocumentId, UserId};

use crate::connection::ConnectionHandle;
use crate::message::ServerMessage;

/// Rooms a connection has joined, kept as a reverse index so disconnect
/// cleanup never scans the whole registry.
#[derive(Debug, Default)]
struct Membership {
    user_rooms: Vec<UserId>,
    document_rooms: Vec<DocumentId>,
}

/// Registry of all active connections and their room memberships.
///
/// Two independent multimaps: user rooms carry personal notifications,
/// document rooms carry edit broadcasts. Membership is purely ephemeral
/// — created on join, pruned on disconnect, no durable state.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    /// Connection ID → handle.
    connections: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    /// User ID → connections in that user's room.
    user_rooms: DashMap<UserId, Vec<Arc<ConnectionHandle>>>,
    /// Document ID → connections in that document's room.
    document_rooms: DashMap<DocumentId, Vec<Arc<ConnectionHandle>>>,
    /// Connection ID → rooms joined.
    memberships: DashMap<ConnectionId, Membership>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection.
    pub fn register(&self, handle: Arc<ConnectionHandle>) {
        self.memberships.insert(handle.id, Membership::default());
        self.connections.insert(handle.id, handle);
    }

    /// Looks up a connection by ID.
    pub fn connection(&self, conn_id: ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.connections
            .get(&conn_id)
            .map(|entry| entry.value().clone())
    }

    /// Adds a connection to a user's room. Joining twice is a no-op.
    pub fn join_user_room(&self, conn_id: ConnectionId, user_id: UserId) {
        let Some(handle) = self.connection(conn_id) else {
            return;
        };
        let mut room = self.user_rooms.entry(user_id).or_default();
        if room.iter().any(|c| c.id == conn_id) {
            return;
        }
        room.push(handle);
        drop(room);
        if let Some(mut membership) = self.memberships.get_mut(&conn_id) {
            membership.user_rooms.push(user_id);
        }
    }

    /// Adds a connection to a document's room. Joining twice is a no-op.
    pub fn join_document_room(&self, conn_id: ConnectionId, document_id: DocumentId) {
        let Some(handle) = self.connection(conn_id) else {
            return;
        };
        let mut room = self.document_rooms.entry(document_id).or_default();
        if room.iter().any(|c| c.id == conn_id) {
            return;
        }
        room.push(handle);
        drop(room);
        if let Some(mut membership) = self.memberships.get_mut(&conn_id) {
            membership.document_rooms.push(document_id);
        }
    }

    /// Removes a connection from every room it joined and drops it.
    pub fn remove(&self, conn_id: ConnectionId) -> Option<Arc<ConnectionHandle>> {
        if let Some((_, membership)) = self.memberships.remove(&conn_id) {
            for user_id in membership.user_rooms {
                if let Some(mut room) = self.user_rooms.get_mut(&user_id) {
                    room.retain(|c| c.id != conn_id);
                    if room.is_empty() {
                        drop(room);
                        self.user_rooms.remove(&user_id);
                    }
                }
            }
            for document_id in membership.document_rooms {
                if let Some(mut room) = self.document_rooms.get_mut(&document_id) {
                    room.retain(|c| c.id != conn_id);
                    if room.is_empty() {
                        drop(room);
                        self.document_rooms.remove(&document_id);
                    }
                }
            }
        }
        self.connections.remove(&conn_id).map(|(_, handle)| handle)
    }

    /// Sends a message to every connection in a user's room. Returns the
    /// number of successful sends; failures are counted by the caller's
    /// logging, never retried.
    pub fn send_to_user(&self, user_id: UserId, msg: &ServerMessage) -> usize {
        let Some(room) = self.user_rooms.get(&user_id) else {
            return 0;
        };
        room.iter().filter(|conn| conn.send(msg.clone())).count()
    }

    /// Broadcasts to every connection in a document's room except the
    /// sender. Returns the number of successful sends.
    pub fn broadcast_to_document(
        &self,
        document_id: DocumentId,
        except: ConnectionId,
        msg: &ServerMessage,
    ) -> usize {
        let Some(room) = self.document_rooms.get(&document_id) else {
            return 0;
        };
        room.iter()
            .filter(|conn| conn.id != except)
            .filter(|conn| conn.send(msg.clone()))
            .count()
    }

    /// Number of connections in a document's room.
    pub fn document_room_size(&self, document_id: DocumentId) -> usize {
        self.document_rooms
            .get(&document_id)
            .map(|room| room.len())
            .unwrap_or(0)
    }

    /// Number of connections in a user's room.
    pub fn user_room_size(&self, user_id: UserId) -> usize {
        self.user_rooms
            .get(&user_id)
            .map(|room| room.len())
            .unwrap_or(0)
    }

    /// Total number of registered connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of registered connections belonging to a user, regardless
    /// of room membership.
    pub fn user_connection_count(&self, user_id: UserId) -> usize {
        self.connections
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn connect(
        registry: &SessionRegistry,
        name: &str,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(16);
        let handle = Arc::new(ConnectionHandle::new(UserId::new(), name.to_string(), tx));
        registry.register(handle.clone());
        (handle, rx)
    }

    fn edit(content: &str) -> ServerMessage {
        ServerMessage::EditBroadcast {
            delta: serde_json::Value::Null,
            editor_name: "A".to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_broadcast_excludes_sender() {
        let registry = SessionRegistry::new();
        let doc = DocumentId::new();
        let (a, mut a_rx) = connect(&registry, "A");
        let (b, mut b_rx) = connect(&registry, "B");
        let (c, mut c_rx) = connect(&registry, "C");
        for conn in [&a, &b, &c] {
            registry.join_document_room(conn.id, doc);
        }

        let sent = registry.broadcast_to_document(doc, a.id, &edit("Hello"));

        assert_eq!(sent, 2);
        assert!(a_rx.try_recv().is_err());
        assert!(b_rx.try_recv().is_ok());
        assert!(c_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_double_join_is_single_membership() {
        let registry = SessionRegistry::new();
        let doc = DocumentId::new();
        let (a, _a_rx) = connect(&registry, "A");
        let (b, mut b_rx) = connect(&registry, "B");
        registry.join_document_room(a.id, doc);
        registry.join_document_room(b.id, doc);
        registry.join_document_room(b.id, doc);

        registry.broadcast_to_document(doc, a.id, &edit("x"));

        assert!(b_rx.try_recv().is_ok());
        assert!(b_rx.try_recv().is_err(), "B must receive exactly one copy");
    }

    #[tokio::test]
    async fn test_remove_prunes_every_room() {
        let registry = SessionRegistry::new();
        let doc = DocumentId::new();
        let (a, _a_rx) = connect(&registry, "A");
        registry.join_user_room(a.id, a.user_id);
        registry.join_document_room(a.id, doc);

        registry.remove(a.id);

        assert_eq!(registry.connection_count(), 0);
        assert_eq!(registry.user_room_size(a.user_id), 0);
        assert_eq!(registry.document_room_size(doc), 0);
    }

    #[tokio::test]
    async fn test_user_room_fans_out_to_all_connections() {
        let registry = SessionRegistry::new();
        let user = UserId::new();
        let (tx1, mut rx1) = mpsc::channel(16);
        let (tx2, mut rx2) = mpsc::channel(16);
        let c1 = Arc::new(ConnectionHandle::new(user, "U".to_string(), tx1));
        let c2 = Arc::new(ConnectionHandle::new(user, "U".to_string(), tx2));
        registry.register(c1.clone());
        registry.register(c2.clone());
        registry.join_user_room(c1.id, user);
        registry.join_user_room(c2.id, user);

        let sent = registry.send_to_user(user, &edit("note"));

        assert_eq!(sent, 2);
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }
}
