use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use murmur::config::{AppConfig, StoreBackend};
use murmur::infra::db::Db;
use murmur::infra::memory::MemoryStore;
use murmur::infra::postgres::PgStore;
use murmur::infra::store::SharedStore;
use murmur::{http, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let store: SharedStore = match config.store_backend {
        StoreBackend::Postgres => {
            let db = Db::connect(&config).await?;
            if config.run_migrations {
                db.migrate().await?;
                tracing::info!("migrations applied");
            }
            Arc::new(PgStore::new(db))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState {
        store,
        paseto_access_key: config.paseto_access_key,
        max_page_limit: config.max_page_limit,
    };

    let app: Router = http::router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!("listening on {}", config.http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
