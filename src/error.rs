// Client-side error types
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::StorageError;
use crate::validation::ValidationErrors;

/// Structured error body returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<FieldErrorResponse>,
}

/// Field-level error entry of an `ApiErrorResponse`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrorResponse {
    pub field: String,
    pub message: String,
}

impl ApiErrorResponse {
    /// Build a body for responses that carried no parseable JSON
    pub fn from_status(status: u16, raw: &str) -> Self {
        let message = if raw.trim().is_empty() {
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Request failed")
                .to_string()
        } else {
            raw.trim().to_string()
        };

        Self {
            status,
            message,
            errors: Vec::new(),
        }
    }
}

/// Errors surfaced by the API client, stores and hooks
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{}", .body.message)]
    Api { status: u16, body: ApiErrorResponse },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("No refresh token available")]
    MissingRefreshToken,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    WorkspaceRequired(String),
}

impl ClientError {
    pub fn api(status: u16, body: ApiErrorResponse) -> Self {
        ClientError::Api { status, body }
    }

    /// HTTP status of the failed call, if the failure came from the server
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    pub fn is_forbidden(&self) -> bool {
        self.status_code() == Some(403)
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Api { status, .. } => match status {
                400 => "BAD_REQUEST",
                401 => "UNAUTHORIZED",
                403 => "FORBIDDEN",
                404 => "NOT_FOUND",
                409 => "CONFLICT",
                422 => "UNPROCESSABLE_ENTITY",
                429 => "TOO_MANY_REQUESTS",
                500..=599 => "SERVER_ERROR",
                _ => "HTTP_ERROR",
            },
            ClientError::Network(_) => "NETWORK_ERROR",
            ClientError::Decode(_) => "INVALID_RESPONSE",
            ClientError::Storage(_) => "STORAGE_ERROR",
            ClientError::Validation(_) => "VALIDATION_ERROR",
            ClientError::MissingRefreshToken => "MISSING_REFRESH_TOKEN",
            ClientError::InvalidUrl(_) => "INVALID_URL",
            ClientError::WorkspaceRequired(_) => "WORKSPACE_REQUIRED",
        }
    }

    /// Field-level messages as `(field, message)` pairs
    pub fn field_errors(&self) -> Vec<(String, String)> {
        match self {
            ClientError::Api { body, .. } => body
                .errors
                .iter()
                .map(|e| (e.field.clone(), e.message.clone()))
                .collect(),
            ClientError::Validation(errors) => errors
                .iter()
                .map(|e| (e.field.to_string(), e.message.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Human-readable message for stores and notices.
    ///
    /// Server errors with field details render as `"<message> - field: msg, ..."`;
    /// a server error without a message yields `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api { body, .. } => {
                if !body.errors.is_empty() {
                    let fields = body
                        .errors
                        .iter()
                        .map(|e| format!("{}: {}", e.field, e.message))
                        .collect::<Vec<_>>()
                        .join(", ");
                    if body.message.is_empty() {
                        fields
                    } else {
                        format!("{} - {}", body.message, fields)
                    }
                } else if body.message.is_empty() {
                    fallback.to_string()
                } else {
                    body.message.clone()
                }
            }
            other => {
                let message = other.to_string();
                if message.is_empty() {
                    fallback.to_string()
                } else {
                    message
                }
            }
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(message: &str, errors: &[(&str, &str)]) -> ClientError {
        ClientError::api(
            400,
            ApiErrorResponse {
                status: 400,
                message: message.to_string(),
                errors: errors
                    .iter()
                    .map(|(f, m)| FieldErrorResponse {
                        field: f.to_string(),
                        message: m.to_string(),
                    })
                    .collect(),
            },
        )
    }

    #[test]
    fn user_message_joins_field_errors() {
        let err = api_error("Validation failed", &[("name", "too short"), ("slug", "taken")]);
        assert_eq!(
            err.user_message("fallback"),
            "Validation failed - name: too short, slug: taken"
        );
    }

    #[test]
    fn user_message_without_top_level_message_uses_fields_only() {
        let err = api_error("", &[("email", "invalid")]);
        assert_eq!(err.user_message("fallback"), "email: invalid");
    }

    #[test]
    fn user_message_falls_back_when_body_is_empty() {
        let err = api_error("", &[]);
        assert_eq!(err.user_message("Failed to fetch workspaces"), "Failed to fetch workspaces");
    }

    #[test]
    fn missing_refresh_token_has_stable_code() {
        let err = ClientError::MissingRefreshToken;
        assert_eq!(err.error_code(), "MISSING_REFRESH_TOKEN");
        assert_eq!(err.user_message("x"), "No refresh token available");
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn from_status_uses_canonical_reason_for_empty_bodies() {
        let body = ApiErrorResponse::from_status(404, "");
        assert_eq!(body.message, "Not Found");
        assert_eq!(body.status, 404);
    }

    #[test]
    fn error_body_deserializes_with_missing_fields() {
        let body: ApiErrorResponse = serde_json::from_str(r#"{"message":"nope"}"#).unwrap();
        assert_eq!(body.message, "nope");
        assert!(body.errors.is_empty());
    }
}
