//! ScribeHub Server — collaborative document editing core.
//!
//! Main entry point that wires all crates together and starts the
//! background scheduler. Transport adapters plug into the broker and
//! services assembled here.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use scribehub_core::config::AppConfig;
use scribehub_core::error::AppError;
use scribehub_realtime::broker::SessionBroker;
use scribehub_realtime::notifier::RealtimeNotifier;
use scribehub_realtime::registry::SessionRegistry;
use scribehub_service::document::access::AccessResolver;
use scribehub_service::document::service::DocumentService;
use scribehub_service::invitation::service::InvitationService;
use scribehub_store::document::DocumentStore;
use scribehub_store::invitation::InvitationStore;
use scribehub_store::user::InMemoryUserDirectory;
use scribehub_worker::scheduler::Scheduler;
use scribehub_worker::sweep::SweepJob;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("SCRIBEHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ScribeHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Stores and user directory ────────────────────────
    let documents = Arc::new(DocumentStore::new());
    let invitations = Arc::new(InvitationStore::new());
    let directory = Arc::new(InMemoryUserDirectory::new());

    // ── Step 2: Realtime registry and notifier ───────────────────
    let registry = Arc::new(SessionRegistry::new());
    let notifier = Arc::new(RealtimeNotifier::new(Arc::clone(&registry)));

    // ── Step 3: Services ──────────────────────────────────────────
    let access = Arc::new(AccessResolver::new(Arc::clone(&documents)));
    // Handed to the transport layer alongside the broker; nothing in
    // the core binds a socket itself.
    let _document_service = Arc::new(DocumentService::new(
        Arc::clone(&documents),
        Arc::clone(&access),
    ));
    let invitation_service = Arc::new(InvitationService::new(
        Arc::clone(&invitations),
        Arc::clone(&documents),
        directory.clone(),
        notifier,
    ));
    tracing::info!("Services initialized");

    // ── Step 4: Session broker ────────────────────────────────────
    let _broker = Arc::new(SessionBroker::new(
        Arc::clone(&registry),
        Arc::clone(&documents),
        Arc::clone(&access),
        directory,
        config.realtime.clone(),
    ));
    tracing::info!("Session broker initialized");

    // ── Step 5: Background scheduler ──────────────────────────────
    let mut scheduler = if config.worker.enabled {
        let sweep = Arc::new(SweepJob::new(Arc::clone(&invitation_service)));
        let scheduler = Scheduler::new(sweep).await?;
        scheduler
            .register_invitation_sweep(&config.worker.sweep_schedule)
            .await?;
        scheduler.start().await?;
        tracing::info!("Background worker started");
        Some(scheduler)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 6: Graceful shutdown ─────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown...");

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }

    tracing::info!("ScribeHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
