//! HTTP client for the identity backend.
//!
//! Upstream contract:
//! - `POST {API_URL}/api/users/login` with `{email, password}` returns
//!   `{message, user, token: {access_token, expires_in, refresh_token?}}`.
//! - `POST {API_URL}/api/users/refresh` with the `refresh_token` cookie
//!   forwarded returns `{token: {access_token, refresh_token}}`.

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
};
use reqwest::{header::COOKIE, Client};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::{error::GatewayError, session::UserProfile, session::REFRESH_TOKEN_COOKIE};
use crate::APP_USER_AGENT;

const LOGIN_PATH: &str = "/api/users/login";
const REFRESH_PATH: &str = "/api/users/refresh";

/// Raw upstream answer, kept verbatim so rejections can be passed through.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl UpstreamResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body of a successful answer.
    ///
    /// # Errors
    /// Returns an error if the body is not the expected JSON.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    /// Turn a non-2xx answer into a passthrough error.
    #[must_use]
    pub fn into_rejection(self) -> GatewayError {
        GatewayError::UpstreamRejected {
            status: self.status,
            content_type: self.content_type,
            body: self.body,
        }
    }
}

/// `token` object shared by the login and refresh answers.
#[derive(Debug, Default, Deserialize)]
pub struct TokenPayload {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenPayload {
    /// Access token, if upstream sent a non-empty one.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        non_empty(self.access_token.as_deref())
    }

    /// Refresh token, if upstream sent a non-empty one.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        non_empty(self.refresh_token.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub token: Option<TokenPayload>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshPayload {
    #[serde(default)]
    pub token: Option<TokenPayload>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Clone, Debug)]
pub struct UpstreamClient {
    client: Client,
    base_url: Url,
}

impl UpstreamClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build upstream HTTP client")?;
        Ok(Self { client, base_url })
    }

    /// `{API_URL}{path}`, keeping any path prefix of the configured URL.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    /// Exchange credentials for tokens.
    ///
    /// # Errors
    /// Returns an error only on transport failure; non-2xx answers are returned
    /// as an [`UpstreamResponse`].
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<UpstreamResponse> {
        let request = self.client.post(self.endpoint(LOGIN_PATH)).json(&Credentials {
            email,
            password: password.expose_secret(),
        });
        Self::send(request).await.context("Upstream login request failed")
    }

    /// Mint a new access token from a refresh token.
    ///
    /// # Errors
    /// Returns an error only on transport failure.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &SecretString) -> Result<UpstreamResponse> {
        let request = self.client.post(self.endpoint(REFRESH_PATH)).header(
            COOKIE,
            format!("{REFRESH_TOKEN_COOKIE}={}", refresh_token.expose_secret()),
        );
        Self::send(request)
            .await
            .context("Upstream refresh request failed")
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<UpstreamResponse> {
        let response = request.send().await?;
        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response.bytes().await?;
        debug!(%status, "Upstream answered");
        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
