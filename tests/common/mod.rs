//! Shared test helpers for integration tests.

use std::sync::Arc;

use tokio::sync::mpsc;

use scribehub_core::config::realtime::RealtimeConfig;
use scribehub_core::types::id::UserId;
use scribehub_realtime::broker::SessionBroker;
use scribehub_realtime::connection::ConnectionHandle;
use scribehub_realtime::message::ServerMessage;
use scribehub_realtime::notifier::RealtimeNotifier;
use scribehub_realtime::registry::SessionRegistry;
use scribehub_service::context::RequestContext;
use scribehub_service::document::access::AccessResolver;
use scribehub_service::document::service::DocumentService;
use scribehub_service::invitation::service::InvitationService;
use scribehub_store::document::DocumentStore;
use scribehub_store::invitation::InvitationStore;
use scribehub_store::user::InMemoryUserDirectory;

/// Fully wired in-memory application for integration tests.
pub struct TestApp {
    /// Document store for direct state assertions.
    pub documents: Arc<DocumentStore>,
    /// Invitation store for direct state assertions.
    pub invitations: Arc<InvitationStore>,
    /// User directory.
    pub directory: Arc<InMemoryUserDirectory>,
    /// Document service.
    pub document_service: DocumentService,
    /// Invitation service, notifying through the realtime broker.
    pub invitation_service: Arc<InvitationService>,
    /// Session broker.
    pub broker: SessionBroker,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let documents = Arc::new(DocumentStore::new());
        let invitations = Arc::new(InvitationStore::new());
        let directory = Arc::new(InMemoryUserDirectory::new());
        let registry = Arc::new(SessionRegistry::new());
        let notifier = Arc::new(RealtimeNotifier::new(registry.clone()));

        let access = Arc::new(AccessResolver::new(documents.clone()));
        let document_service = DocumentService::new(documents.clone(), access.clone());
        let invitation_service = Arc::new(InvitationService::new(
            invitations.clone(),
            documents.clone(),
            directory.clone(),
            notifier,
        ));
        let broker = SessionBroker::new(
            registry,
            documents.clone(),
            access,
            directory.clone(),
            RealtimeConfig::default(),
        );

        Self {
            documents,
            invitations,
            directory,
            document_service,
            invitation_service,
            broker,
        }
    }

    /// Registers a user in the directory and returns their context.
    pub fn create_test_user(&self, name: &str) -> RequestContext {
        let ctx = RequestContext::new(
            UserId::new(),
            format!("{}@example.com", name.to_lowercase()),
            name,
        );
        self.directory.insert(ctx.principal());
        ctx
    }

    /// Opens a connection for the user and joins their personal room.
    pub fn connect(
        &self,
        ctx: &RequestContext,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<ServerMessage>) {
        let (conn, rx) = self.broker.connect(&ctx.principal()).expect("connect");
        self.broker.join_user_room(&conn, ctx.user_id);
        (conn, rx)
    }
}
