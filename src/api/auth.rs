//! Requester identity extractors.
//!
//! Tokens are verified upstream; requests reach this service with the
//! authenticated user's id in `X-User-Id`. Each extractor loads that user
//! and rejects with a JSend error when the requirement is not met.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::api::response::ApiError;
use crate::storage::models::{Role, User};
use crate::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Any authenticated user. Rejects with 401 when the header is missing or
/// names an unknown user.
pub struct CurrentUser(pub User);

/// Like [`CurrentUser`] but anonymous requests pass through as `None`.
pub struct MaybeUser(pub Option<User>);

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub User);

fn header_user_id(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn load_user(state: &AppState, user_id: &str) -> Result<User, ApiError> {
    state
        .db
        .get_user(user_id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::unauthorized("Unknown user"))
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, ApiError> {
        let user_id = header_user_id(parts)
            .ok_or_else(|| ApiError::unauthorized("Missing X-User-Id header"))?;
        Ok(CurrentUser(load_user(state, user_id)?))
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, ApiError> {
        match header_user_id(parts) {
            Some(user_id) => Ok(MaybeUser(Some(load_user(state, user_id)?))),
            None => Ok(MaybeUser(None)),
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, ApiError> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(ApiError::forbidden("Admin role required"));
        }
        Ok(RequireAdmin(user))
    }
}
