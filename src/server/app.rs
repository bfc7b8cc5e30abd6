use axum::{extract::DefaultBodyLimit, middleware, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api::{api_routes, public_routes};

use super::middleware::api_key_auth;
use super::AppState;

/// Largest accepted request body (batch submissions carry URL lists)
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = api_routes().layer(middleware::from_fn_with_state(
        state.clone(),
        api_key_auth,
    ));

    Router::new()
        .nest("/api/v1", protected)
        .merge(public_routes())
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // Add state
        .with_state(state)
}
