//! Invitation expiry sweep job.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use scribehub_service::invitation::service::InvitationService;

/// Periodic purge of stale pending invitations.
///
/// Stateless between runs. Overlapping executions would be harmless
/// (each deletes a disjoint subset of expired rows), but a run is
/// skipped while a previous one is still in flight to bound resource
/// use.
pub struct SweepJob {
    /// Invitation service whose `sweep` is invoked.
    invitations: Arc<InvitationService>,
    /// In-flight guard.
    running: AtomicBool,
}

impl std::fmt::Debug for SweepJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepJob")
            .field("running", &self.running.load(Ordering::SeqCst))
            .finish()
    }
}

impl SweepJob {
    /// Creates a new sweep job.
    pub fn new(invitations: Arc<InvitationService>) -> Self {
        Self {
            invitations,
            running: AtomicBool::new(false),
        }
    }

    /// Runs one sweep. Returns the removed count, or `None` when the
    /// run was skipped because a previous one is still active.
    pub fn run(&self) -> Option<usize> {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Skipping invitation sweep: previous run still in flight");
            return None;
        }

        info!("Starting scheduled invitation cleanup");
        let removed = self.invitations.sweep();

        self.running.store(false, Ordering::SeqCst);
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use scribehub_core::events::notification::Notification;
    use scribehub_core::traits::notifier::Notifier;
    use scribehub_core::types::id::UserId;
    use scribehub_entity::document::model::Document;
    use scribehub_entity::document::permission::AccessLevel;
    use scribehub_entity::invitation::model::Invitation;
    use scribehub_store::document::DocumentStore;
    use scribehub_store::invitation::InvitationStore;
    use scribehub_store::user::InMemoryUserDirectory;

    struct NullNotifier;

    #[async_trait]
    impl Notifier for NullNotifier {
        async fn notify(&self, _target: UserId, _notification: Notification) {}
    }

    fn job_with_invites() -> (SweepJob, Arc<InvitationStore>) {
        let documents = Arc::new(DocumentStore::new());
        let invitations = Arc::new(InvitationStore::new());
        let service = Arc::new(InvitationService::new(
            invitations.clone(),
            documents.clone(),
            Arc::new(InMemoryUserDirectory::new()),
            Arc::new(NullNotifier),
        ));

        let doc = documents.insert(Document::new(UserId::new(), None, None));
        let mut stale = Invitation::new(doc.id, "stale@example.com", "S", AccessLevel::ReadOnly);
        stale.expired_at = Utc::now() - Duration::seconds(10);
        invitations.insert(stale).expect("stale");
        invitations
            .insert(Invitation::new(
                doc.id,
                "fresh@example.com",
                "F",
                AccessLevel::ReadOnly,
            ))
            .expect("fresh");

        (SweepJob::new(service), invitations)
    }

    #[tokio::test]
    async fn test_run_purges_only_expired_rows() {
        let (job, invitations) = job_with_invites();

        assert_eq!(job.run(), Some(1));
        assert_eq!(invitations.len(), 1);

        // Idempotent: a second run removes nothing further.
        assert_eq!(job.run(), Some(0));
    }

    #[tokio::test]
    async fn test_run_skips_while_in_flight() {
        let (job, _invitations) = job_with_invites();

        job.running.store(true, Ordering::SeqCst);
        assert_eq!(job.run(), None);

        job.running.store(false, Ordering::SeqCst);
        assert_eq!(job.run(), Some(1));
    }
}
