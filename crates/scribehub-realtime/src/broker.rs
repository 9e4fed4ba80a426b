//! Session broker — connection lifecycle, room joins, and edit fan-out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

use scribehub_core::config::realtime::RealtimeConfig;
use scribehub_core::traits::directory::UserDirectory;
use scribehub_core::types::id::{ConnectionId, DocumentId, UserId};
use scribehub_core::types::principal::Principal;
use scribehub_core::{AppError, AppResult};
use scribehub_service::document::access::AccessResolver;
use scribehub_store::document::DocumentStore;

use crate::connection::ConnectionHandle;
use crate::message::ServerMessage;
use crate::registry::SessionRegistry;

/// Successful acknowledgement of a submitted edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditAck {
    /// The document the edit was persisted to.
    pub document_id: DocumentId,
}

/// Fans out edits and notifications over persistent per-connection
/// channels.
///
/// Write permission is resolved at every `submit_edit`, never cached
/// from join time, so a revoked grant cannot keep writing through an
/// old connection. Content persists before any broadcast goes out.
pub struct SessionBroker {
    /// Room membership registry.
    registry: Arc<SessionRegistry>,
    /// Document store (edit persistence).
    documents: Arc<DocumentStore>,
    /// Permission evaluator.
    access: Arc<AccessResolver>,
    /// External user directory (editor display names).
    directory: Arc<dyn UserDirectory>,
    /// Broker configuration.
    config: RealtimeConfig,
}

impl std::fmt::Debug for SessionBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBroker")
            .field("connections", &self.registry.connection_count())
            .finish()
    }
}

impl SessionBroker {
    /// Creates a new session broker.
    pub fn new(
        registry: Arc<SessionRegistry>,
        documents: Arc<DocumentStore>,
        access: Arc<AccessResolver>,
        directory: Arc<dyn UserDirectory>,
        config: RealtimeConfig,
    ) -> Self {
        Self {
            registry,
            documents,
            access,
            directory,
            config,
        }
    }

    /// Opens a connection for a verified principal.
    ///
    /// Returns the handle and the receiver half of the outbound channel;
    /// the transport layer drains the receiver to the client. Refuses
    /// the connection once the user's concurrent-connection limit is
    /// reached.
    pub fn connect(
        &self,
        principal: &Principal,
    ) -> AppResult<(Arc<ConnectionHandle>, mpsc::Receiver<ServerMessage>)> {
        if self.registry.user_connection_count(principal.user_id)
            >= self.config.max_connections_per_user
        {
            return Err(AppError::conflict(
                "Connection limit reached for this user",
            ));
        }

        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(
            principal.user_id,
            principal.full_name.clone(),
            tx,
        ));
        self.registry.register(handle.clone());

        info!(
            conn_id = %handle.id,
            user_id = %principal.user_id,
            "Connection registered"
        );
        Ok((handle, rx))
    }

    /// Registers a connection in a user's room for personal notifications.
    pub fn join_user_room(&self, conn: &ConnectionHandle, user_id: UserId) {
        self.registry.join_user_room(conn.id, user_id);
        debug!(conn_id = %conn.id, user_id = %user_id, "Joined user room");
    }

    /// Registers a connection in a document's room for edit broadcasts.
    pub fn join_document_room(&self, conn: &ConnectionHandle, document_id: DocumentId) {
        self.registry.join_document_room(conn.id, document_id);
        debug!(conn_id = %conn.id, document_id = %document_id, "Joined document room");
    }

    /// Submits an edit on behalf of the connection's user.
    ///
    /// On success the full content is persisted (last-writer-wins) and
    /// then broadcast to every other room member. On failure the error
    /// is both returned and pushed to the submitter as an
    /// [`ServerMessage::EditRejected`] event.
    pub async fn submit_edit(
        &self,
        conn: &ConnectionHandle,
        document_id: DocumentId,
        delta: serde_json::Value,
        full_content: String,
    ) -> AppResult<EditAck> {
        match self
            .handle_edit(conn, document_id, delta, full_content)
            .await
        {
            Ok(ack) => Ok(ack),
            Err(err) => {
                conn.send(ServerMessage::EditRejected {
                    code: err.kind.to_string(),
                    message: err.message.clone(),
                });
                Err(err)
            }
        }
    }

    async fn handle_edit(
        &self,
        conn: &ConnectionHandle,
        document_id: DocumentId,
        delta: serde_json::Value,
        full_content: String,
    ) -> AppResult<EditAck> {
        // Effective access is resolved now, not at join time.
        if !self.access.resolve(conn.user_id, document_id)?.can_write() {
            return Err(AppError::forbidden("Access denied"));
        }

        // Persist before broadcast: a peer never observes an edit whose
        // content is not durably stored.
        self.documents
            .replace_content(document_id, full_content.clone())?;

        let editor_name = self
            .directory
            .find_by_id(conn.user_id)
            .await?
            .map(|user| user.full_name)
            .unwrap_or_else(|| "Unknown User".to_string());

        let delivered = self.registry.broadcast_to_document(
            document_id,
            conn.id,
            &ServerMessage::EditBroadcast {
                delta,
                editor_name,
                content: full_content,
            },
        );

        debug!(
            conn_id = %conn.id,
            document_id = %document_id,
            delivered,
            "Edit persisted and broadcast"
        );
        Ok(EditAck { document_id })
    }

    /// Tears down a connection: removes it from every room it joined.
    pub fn disconnect(&self, conn_id: ConnectionId) {
        if let Some(handle) = self.registry.remove(conn_id) {
            handle.mark_dead();
            info!(conn_id = %conn_id, user_id = %handle.user_id, "Connection closed");
        }
    }

    /// The registry backing this broker.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }
}
