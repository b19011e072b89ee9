use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::api::error::{ensure_success, ApiError};
use crate::session::Session;
use crate::storage::config::ApiConfig;

/// HTTP client for the content service and the admin backend.
///
/// Public content calls go to `content_url`; authenticated admin calls need a
/// session token and carry it as a bearer header.
#[derive(Debug, Clone)]
pub struct AdminClient {
    content_url: String,
    admin_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl AdminClient {
    pub fn new(api: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_seconds))
            .build()?;

        Ok(Self {
            content_url: trim_base(&api.content_url),
            admin_url: trim_base(&api.admin_url),
            token: None,
            client,
        })
    }

    pub fn with_session(mut self, session: Option<&Session>) -> Self {
        self.token = session.map(|s| s.token.clone()).filter(|t| !t.is_empty());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn content_url(&self) -> &str {
        &self.content_url
    }

    pub fn admin_url(&self) -> &str {
        &self.admin_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn content_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.content_url, path)
    }

    pub(crate) fn admin_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.admin_url, path)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// Adds the bearer header, or fails when no session token is present.
    pub(crate) fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or_else(|| {
            tracing::warn!("Admin request attempted without a session token");
            ApiError::AuthenticationRequired
        })?;
        Ok(request.bearer_auth(token))
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        tracing::info!("{} responded with {}", response.url(), response.status());
        let response = ensure_success(response, fallback).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn send_empty(&self, request: RequestBuilder, fallback: &str) -> Result<(), ApiError> {
        let response = request.send().await?;
        tracing::info!("{} responded with {}", response.url(), response.status());
        ensure_success(response, fallback).await?;
        Ok(())
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Percent-encodes an id for use as a path segment.
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
