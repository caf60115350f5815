//! Route definitions for the SocialHub HTTP API.
//!
//! All REST routes are mounted under `/api`; the WebSocket endpoint
//! lives at `/ws`. The router receives `AppState` and passes it to all
//! handlers via Axum's `State` extractor.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(notification_routes())
        .merge(admin_routes())
        .route("/events", post(handlers::events::ingest))
        .route("/health", get(handlers::health::health));

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// User-facing notification endpoints.
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notification::list))
        .route("/notifications/stats", get(handlers::notification::stats))
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/mark-all-read",
            post(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/preferences",
            get(handlers::preference::get).put(handlers::preference::update),
        )
        .route(
            "/notifications/test",
            post(handlers::notification::test_notification),
        )
        .route(
            "/notifications/{id}/read",
            post(handlers::notification::mark_read),
        )
        .route(
            "/notifications/{id}/archive",
            post(handlers::notification::archive),
        )
        .route(
            "/notifications/{id}/unarchive",
            post(handlers::notification::unarchive),
        )
        .route(
            "/notifications/{id}",
            get(handlers::notification::detail).delete(handlers::notification::delete),
        )
}

/// Admin endpoints.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications/admin",
            get(handlers::admin::list_all).post(handlers::admin::create),
        )
        .route(
            "/notifications/admin/{id}",
            delete(handlers::admin::delete),
        )
}

fn build_cors_layer(state: &AppState) -> CorsLayer {
    let origins = &state.config.server.cors.allowed_origins;
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed: Vec<_> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
