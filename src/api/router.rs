use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::health;
use super::middleware::{logging_middleware, security_headers_middleware};
use super::state::AppState;
use super::user;
use crate::config::AppConfig;

/// Room for multipart boundaries and the text fields around the file
pub const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Normalise a mount path to `/segment`, or `None` for the root
fn mount_path(path: &str) -> Option<String> {
    let trimmed = path.trim().trim_matches('/');

    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{}", trimmed))
    }
}

/// Create the full router with application state
///
/// User routes live under `server.base_path`; uploaded images are served
/// from `uploads.directory` under `uploads.public_prefix`.
pub fn create_router(state: AppState, config: &AppConfig) -> Router {
    let user_router = user::create_user_router();
    let body_limit = config.uploads.max_file_size + MULTIPART_OVERHEAD;

    let router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check));

    let router = match mount_path(&config.server.base_path) {
        Some(base_path) => router.nest(&base_path, user_router),
        None => router.merge(user_router),
    };

    let router = match mount_path(&config.uploads.public_prefix) {
        Some(prefix) => router.nest_service(&prefix, ServeDir::new(&config.uploads.directory)),
        None => router,
    };

    router
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
