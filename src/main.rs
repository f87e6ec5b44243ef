use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use md_collab::adapters::auth::JwtSessionValidator;
use md_collab::adapters::http::{build_router, AppPorts};
use md_collab::adapters::memory::{
    InMemoryDocumentRepository, InMemoryNotificationRepository, InMemoryProposalRepository,
    InMemoryUserDirectory, SeedFile,
};
use md_collab::adapters::postgres::{
    run_migrations, PostgresDocumentRepository, PostgresNotificationRepository,
    PostgresProposalRepository, PostgresUserDirectory,
};
use md_collab::adapters::websocket::InMemoryConnectionRegistry;
use md_collab::config::AppConfig;
use md_collab::ports::ConnectionRegistry;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let addr = config.server.socket_addr()?;
    let registry = Arc::new(InMemoryConnectionRegistry::new(
        config.review.live_channel_capacity,
    ));
    let ports = build_ports(&config, registry.clone()).await?;
    let app = build_router(&ports, &config.review, &config.server);

    let storage = if config.uses_database() { "postgres" } else { "memory" };
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        storage,
        "md-collab starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(registry))
        .await?;

    tracing::info!("md-collab stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .pretty()
            .init();
    }
}

async fn build_ports(
    config: &AppConfig,
    registry: Arc<InMemoryConnectionRegistry>,
) -> Result<AppPorts, BoxError> {
    let validator = Arc::new(JwtSessionValidator::from_config(&config.auth));
    let seed = match &config.seed_file {
        Some(path) => Some(SeedFile::load(path)?),
        None => None,
    };

    if let Some(database) = &config.database {
        let pool = database.connect().await?;
        if database.run_migrations {
            run_migrations(&pool).await?;
            tracing::info!("migrations applied");
        }

        let directory = PostgresUserDirectory::new(pool.clone());
        if let Some(seed) = &seed {
            for user in &seed.users {
                directory.upsert(user).await?;
            }
            tracing::info!(users = seed.users.len(), "seed users upserted; seed documents skipped");
        }

        return Ok(AppPorts {
            documents: Arc::new(PostgresDocumentRepository::new(pool.clone())),
            proposals: Arc::new(PostgresProposalRepository::new(pool.clone())),
            notifications: Arc::new(PostgresNotificationRepository::new(pool)),
            directory: Arc::new(directory),
            registry,
            validator,
        });
    }

    let directory = InMemoryUserDirectory::new();
    let documents = InMemoryDocumentRepository::new();
    match &seed {
        Some(seed) => {
            seed.apply(&directory, &documents).await?;
        }
        None => tracing::warn!("no seed file configured; the user directory is empty"),
    }

    Ok(AppPorts {
        documents: Arc::new(documents),
        proposals: Arc::new(InMemoryProposalRepository::new()),
        notifications: Arc::new(InMemoryNotificationRepository::new()),
        directory: Arc::new(directory),
        registry,
        validator,
    })
}

/// Resolves on Ctrl-C or SIGTERM, after dropping every live channel so open
/// sockets close and the server can drain.
async fn shutdown_signal(registry: Arc<InMemoryConnectionRegistry>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    let closed = registry.clear().await;
    tracing::info!(live_channels = closed, "shutdown signal received");
}
