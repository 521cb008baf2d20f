use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::auth::CurrentUser;
use crate::api::response::{ApiError, AppJson, JSend};
use crate::error::DomainError;
use crate::storage::models::{Role, User};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

/// Public view of a user; the password hash never leaves the service.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub created_at: String,
    pub email: String,
    pub id: String,
    pub role: Role,
    pub updated_at: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyCredentialsRequest {
    /// Username or email.
    pub identifier: String,
    pub password: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<Json<JSend<UserResponse>>, ApiError> {
    let user = state
        .users
        .register(&req.username, &req.email, &req.password)?;
    Ok(JSend::success(user_to_response(user)))
}

pub async fn verify_credentials(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<VerifyCredentialsRequest>,
) -> Result<Json<JSend<UserResponse>>, ApiError> {
    let user = state
        .users
        .verify_credentials(&req.identifier, &req.password)
        .map_err(|e| match e {
            DomainError::Unauthorized => ApiError::unauthorized("Invalid credentials"),
            other => other.into(),
        })?;
    Ok(JSend::success(user_to_response(user)))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<JSend<UserResponse>> {
    JSend::success(user_to_response(user))
}

pub async fn become_creator(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<JSend<UserResponse>>, ApiError> {
    let user = state.users.become_creator(&user.id)?;
    Ok(JSend::success(user_to_response(user)))
}

fn user_to_response(user: User) -> UserResponse {
    UserResponse {
        created_at: user.created_at.to_rfc3339(),
        email: user.email,
        id: user.id,
        role: user.role,
        updated_at: user.updated_at.to_rfc3339(),
        username: user.username,
    }
}
