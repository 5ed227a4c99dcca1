//! Router configuration for the web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::handlers::{create_property, get_property, list_properties, login, me, register, AppState};
use super::middleware::{create_cors_layer, token_auth};

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me));

    let body_limit = app_state.uploads.body_limit();
    let property_routes = Router::new()
        .route(
            "/",
            get(list_properties)
                .merge(post(create_property).layer(DefaultBodyLimit::max(body_limit))),
        )
        .route("/:id", get(get_property));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/properties", property_routes);

    let tokens = app_state.tokens.clone();

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    token_auth(tokens.clone(), req, next)
                })),
        )
        .with_state(app_state)
}

/// Serve uploaded media under its public prefix.
pub fn create_media_router(app_state: &AppState) -> Router {
    Router::new().nest_service(
        app_state.media.public_prefix(),
        ServeDir::new(app_state.media.base_path()),
    )
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// The full application: API, media and health check.
pub fn create_app(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let media = create_media_router(&app_state);
    create_router(app_state, cors_origins)
        .merge(media)
        .merge(create_health_router())
}
