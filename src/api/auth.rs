use serde::{Deserialize, Serialize};

use crate::api::client::AdminClient;
use crate::api::error::ApiError;
use crate::session::{AdminUser, Session};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<AdminUser>,
    #[serde(default)]
    message: Option<String>,
}

impl AdminClient {
    /// Exchanges admin credentials for a session. The returned client is not
    /// modified; callers attach the session with `with_session`.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let url = self.admin_endpoint("/auth/admin/login");
        tracing::info!("Logging in {} at {}", email, url);

        let request = self.http().post(&url).json(&LoginRequest { email, password });
        let response: LoginResponse = self.send_json(request, "Login failed").await?;

        if let Some(message) = &response.message {
            tracing::debug!("Login message: {}", message);
        }

        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Decode("login response carried no token".to_string()))?;

        tracing::info!("Logged in as {}", email);
        Ok(Session { token, user: response.user })
    }
}
