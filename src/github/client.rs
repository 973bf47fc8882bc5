use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::auth::Credentials;
use crate::config::normalize_base_url;
use crate::github::request::ApiRequest;

const ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = "issuecheck";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// HTTP client bound to one base URL.
///
/// Error statuses are returned as ordinary responses; only failures to reach
/// the server or read its answer are errors.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(ApiClient {
            http,
            base_url,
            credentials: None,
        })
    }

    /// Sends Basic credentials with every following request
    pub fn set_authenticator(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let path = request.resolve_path()?;
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(
            method = %request.method(),
            %path,
            authenticated = self.is_authenticated(),
            "sending request"
        );

        let mut builder = self
            .http
            .request(request.method().clone(), &url)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT);
        if let Some(credentials) = &self.credentials {
            builder = builder.basic_auth(credentials.user(), Some(credentials.token()));
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("{} {} failed", request.method(), url))?;
        let status = response.status();
        let content = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body of {} {}", request.method(), url))?;

        tracing::debug!(%status, bytes = content.len(), "received response");
        Ok(ApiResponse { status, content })
    }
}

/// Status and raw body of a response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    content: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, content: impl Into<String>) -> Self {
        ApiResponse {
            status,
            content: content.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.content)
            .with_context(|| format!("Failed to decode response body (HTTP {})", self.status))
    }
}
