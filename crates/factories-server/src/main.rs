//! factories-server — standalone REST server for the factory/children service.
//!
//! Reads config from env vars:
//!   FACTORIES_DATABASE_URL — Postgres connection string (required)
//!   FACTORIES_BIND_ADDR    — listen address (default: 0.0.0.0:4200)
//!   FACTORIES_NOTIFY_URL   — change-notification relay (default: http://127.0.0.1:4000)

use std::sync::Arc;

use factories_core::generate::ThreadRngSource;
use factories_core::service::{FactoryService, FactoryServiceImpl};
use factories_postgres::PgFactoryStore;
use factories_server::notifier::{HttpNotifier, DEFAULT_NOTIFY_URL};
use factories_server::router::build_router;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,factories_server=debug".into()),
        )
        .init();

    // Read config from environment
    let database_url =
        std::env::var("FACTORIES_DATABASE_URL").expect("FACTORIES_DATABASE_URL must be set");
    let bind_addr = std::env::var("FACTORIES_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:4200".into());
    let notify_url =
        std::env::var("FACTORIES_NOTIFY_URL").unwrap_or_else(|_| DEFAULT_NOTIFY_URL.into());

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("failed to connect to database");
    tracing::info!("Connected to database");

    let service: Arc<dyn FactoryService> = Arc::new(FactoryServiceImpl::new(
        Arc::new(PgFactoryStore::new(pool)),
        Arc::new(HttpNotifier::new(&notify_url)),
        Arc::new(ThreadRngSource),
    ));

    let app = build_router(service);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {bind_addr}: {e}"));
    tracing::info!("factories-server listening on {bind_addr}");
    axum::serve(listener, app).await.expect("server error");
}
