use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required. Please log in.")]
    AuthenticationRequired,
    #[error("Session expired. Please log in again.")]
    SessionExpired,
    #[error("Access denied. Admin privileges required.")]
    AccessDenied,
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Failed to connect to server. Please try again.")]
    Network(#[source] reqwest::Error),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err)
        }
    }
}

impl ApiError {
    /// True for errors that a fresh login would fix.
    pub fn needs_login(&self) -> bool {
        matches!(self, ApiError::AuthenticationRequired | ApiError::SessionExpired)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Maps a non-success response onto the error taxonomy.
///
/// 401 and 403 get fixed messages; anything else uses the body's `error` field,
/// falling back to `fallback`.
pub async fn ensure_success(response: Response, fallback: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => {
            tracing::error!("Request to {} rejected: session expired", response.url());
            Err(ApiError::SessionExpired)
        }
        StatusCode::FORBIDDEN => {
            tracing::error!("Request to {} rejected: access denied", response.url());
            Err(ApiError::AccessDenied)
        }
        _ => {
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Request to {} failed. Status: {}, Body: {}", url, status, body);
            Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body).unwrap_or_else(|| fallback.to_string()),
            })
        }
    }
}

fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.error.or(parsed.message).filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_field_is_preferred_over_message() {
        let body = r#"{"error": "Comment not found", "message": "ignored"}"#;
        assert_eq!(error_message(body), Some("Comment not found".to_string()));
    }

    #[test]
    fn message_field_is_used_when_error_missing() {
        assert_eq!(error_message(r#"{"message": "Bad input"}"#), Some("Bad input".to_string()));
    }

    #[test]
    fn non_json_body_has_no_message() {
        assert_eq!(error_message("<html>502</html>"), None);
    }

    #[test]
    fn session_errors_need_login() {
        assert!(ApiError::SessionExpired.needs_login());
        assert!(ApiError::AuthenticationRequired.needs_login());
        assert!(!ApiError::AccessDenied.needs_login());
    }

    #[test]
    fn status_error_displays_server_message() {
        let err = ApiError::Status { status: 500, message: "Failed to fetch comments".to_string() };
        assert_eq!(err.to_string(), "Failed to fetch comments");
    }
}
