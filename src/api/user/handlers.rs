//! JSON handlers for the user lifecycle

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::UserSummary;
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest};

pub const USER_CREATED: &str = "User created successfully.";
pub const USER_UPDATED: &str = "User updated successfully.";
pub const USER_DELETED: &str = "User deleted successfully.";

/// Body of POST /create
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserApiRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body of PUT /edit
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserApiRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub password: Option<String>,
}

/// Body of DELETE /delete
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteUserApiRequest {
    pub email: Option<String>,
}

/// Confirmation returned by mutations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Body of GET /getAll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserSummary>,
}

/// POST /create
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserApiRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    debug!(email = ?request.email, "Creating user");

    state
        .user_service
        .create(CreateUserRequest {
            full_name: request.full_name,
            email: request.email,
            password: request.password,
        })
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(MessageResponse::new(USER_CREATED))))
}

/// PUT /edit
pub async fn update_user(
    State(state): State<AppState>,
    Json(request): Json<UpdateUserApiRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!(email = ?request.email, "Updating user");

    state
        .user_service
        .update(UpdateUserRequest {
            email: request.email,
            full_name: request.full_name,
            password: request.password,
        })
        .await
        .map_err(ApiError::from)?;

    Ok(Json(MessageResponse::new(USER_UPDATED)))
}

/// DELETE /delete
pub async fn delete_user(
    State(state): State<AppState>,
    Json(request): Json<DeleteUserApiRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!(email = ?request.email, "Deleting user");

    state
        .user_service
        .delete(request.email.as_deref())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(MessageResponse::new(USER_DELETED)))
}

/// GET /getAll
pub async fn list_users(State(state): State<AppState>) -> Result<Json<ListUsersResponse>, ApiError> {
    debug!("Listing users");

    let users = state.user_service.list().await.map_err(ApiError::from)?;

    Ok(Json(ListUsersResponse { users }))
}
