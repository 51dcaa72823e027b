//! User account endpoints

pub mod handlers;
pub mod upload;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::state::AppState;

/// Create the user router, nested under the configured base path
pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(handlers::create_user))
        .route("/edit", put(handlers::update_user))
        .route("/delete", delete(handlers::delete_user))
        .route("/getAll", get(handlers::list_users))
        .route("/uploadImage", post(upload::upload_image))
}
