use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JSendStatus {
    Error,
    Fail,
    Success,
}

/// Success envelope: `{"status": "success", "data": ...}`.
#[derive(Debug, Serialize)]
pub struct JSend<T: Serialize> {
    pub data: T,
    pub status: JSendStatus,
}

impl<T: Serialize> JSend<T> {
    pub fn success(data: T) -> Json<JSend<T>> {
        Json(JSend {
            data,
            status: JSendStatus::Success,
        })
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Handler error rendered as a JSend `fail` (4xx) or `error` (5xx) body.
#[derive(Debug)]
pub struct ApiError {
    pub code: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // JSend puts client messages under `data`, server messages at the top level
        let body = if self.code.is_server_error() {
            json!({ "status": JSendStatus::Error, "message": self.message })
        } else {
            json!({ "status": JSendStatus::Fail, "data": { "message": self.message } })
        };
        (self.code, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Unauthorized => {
                ApiError::forbidden("You are not the creator of this resource")
            }
            DomainError::Forbidden => {
                ApiError::forbidden("You do not have access to this resource")
            }
            DomainError::NotFound(entity) => {
                ApiError::not_found(format!("{} not found", capitalize(entity)))
            }
            DomainError::InvalidInput(_) | DomainError::InvalidFileType(_) => {
                ApiError::bad_request(e.to_string())
            }
            DomainError::FileTooLarge { .. } => {
                ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, e.to_string())
            }
            DomainError::InvalidStatus(_) | DomainError::Conflict(_) => {
                ApiError::new(StatusCode::CONFLICT, e.to_string())
            }
            DomainError::Storage(_) => {
                tracing::error!(error = %e, "Storage gateway error");
                ApiError::bad_gateway(e.to_string())
            }
            DomainError::Persistence(_) | DomainError::Internal(_) => {
                tracing::error!(error = %e, "Internal error");
                ApiError::internal(e.to_string())
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Extractors
// ============================================================================

/// `axum::Json` that rejects with a JSend body.
pub struct AppJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(JsonRejection::JsonDataError(err)) => Err(ApiError::bad_request(format!(
                "Invalid request body: {}",
                err.body_text()
            ))),
            Err(JsonRejection::MissingJsonContentType(_)) => Err(ApiError::bad_request(
                "Missing Content-Type: application/json header",
            )),
            Err(_) => Err(ApiError::bad_request("Malformed JSON in request body")),
        }
    }
}

/// Query string parsed with `serde_qs`; paging numbers must be non-negative.
pub struct AppQuery<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, ApiError> {
        let query = parts.uri.query().unwrap_or_default();
        serde_qs::from_str(query).map(AppQuery).map_err(|e| {
            ApiError::bad_request(format!(
                "Invalid query parameter: {}",
                e.to_string().replace("u32", "non-negative integer")
            ))
        })
    }
}
