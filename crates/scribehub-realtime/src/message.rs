//! Server → client message type definitions.

use serde::{Deserialize, Serialize};

use scribehub_core::events::notification::Notification;

/// Messages pushed by the server to a connected client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Another room member's edit.
    EditBroadcast {
        /// The incremental change, opaque to the server.
        delta: serde_json::Value,
        /// Display name of the editing user.
        editor_name: String,
        /// Full document content after the edit.
        content: String,
    },
    /// The recipient's own edit was refused. Sent alongside the per-call
    /// acknowledgement so a client can tell a failed edit apart from
    /// connectivity loss and resync from the document store.
    EditRejected {
        /// Stable error kind.
        code: String,
        /// Human-readable reason.
        message: String,
    },
    /// A personal notification. The payload nests its own `type` field
    /// (the notification category), distinct from the envelope tag.
    Notification {
        /// The notification payload.
        payload: Notification,
    },
}
