//! Router construction for the factories server.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use factories_core::service::FactoryService;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Build the full axum router with all routes and middleware.
pub fn build_router(service: Arc<dyn FactoryService>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/factories",
            get(handlers::factories::list).post(handlers::factories::create),
        )
        .route(
            "/factories/:id",
            get(handlers::factories::get)
                .patch(handlers::factories::update)
                .delete(handlers::factories::delete),
        )
        .route(
            "/factories/:id/generate",
            post(handlers::factories::regenerate),
        )
        .layer(Extension(service))
        .layer(TraceLayer::new_for_http())
        // Viewers connect from arbitrary origins; auth is out of scope here.
        .layer(CorsLayer::permissive())
}
