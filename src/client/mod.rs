//! Cookie-aware client for the gateway's `/api/auth` endpoints.
//!
//! This is the consumer side of the session: it keeps the cookies the gateway
//! sets (like a browser would) and drives the [`RefreshScheduler`].

pub mod scheduler;

pub use scheduler::{Refresh, RefreshScheduler, DEFAULT_REFRESH_INTERVAL};

use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::gateway::{
    error::ErrorResponse,
    handlers::auth::types::{LoginRequest, LoginResponse, SuccessResponse, TokenResponse},
};
use crate::APP_USER_AGENT;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not authenticated: {0}")]
    Unauthenticated(String),
    #[error("request rejected with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("invalid gateway URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Clone, Debug)]
pub struct ConsoleClient {
    http: Client,
    base_url: Url,
}

impl ConsoleClient {
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)?;
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .cookie_store(true)
            .build()?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// # Errors
    /// Upstream rejections come back as [`ClientError::Rejected`] with the
    /// backend's own body.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, ClientError> {
        let response = self
            .http
            .post(self.endpoint("/api/auth/login")?)
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.expose_secret().to_string(),
            })
            .send()
            .await?;
        decode(response).await
    }

    /// # Errors
    /// Only transport failures; logout always succeeds at the gateway.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.endpoint("/api/auth/logout")?)
            .send()
            .await?;
        decode::<SuccessResponse>(response).await.map(|_| ())
    }

    /// # Errors
    /// [`ClientError::Unauthenticated`] when there is no refresh cookie or the
    /// backend refused it.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.endpoint("/api/auth/refresh")?)
            .send()
            .await?;
        decode::<SuccessResponse>(response).await.map(|_| ())
    }

    /// Raw access token, for building an `Authorization` header.
    ///
    /// # Errors
    /// [`ClientError::Unauthenticated`] when no session exists.
    pub async fn token(&self) -> Result<SecretString, ClientError> {
        let response = self
            .http
            .get(self.endpoint("/api/auth/token")?)
            .send()
            .await?;
        let TokenResponse { token } = decode(response).await?;
        Ok(SecretString::from(token))
    }
}

impl Refresh for ConsoleClient {
    type Error = ClientError;

    fn refresh_session(&self) -> impl Future<Output = Result<(), Self::Error>> + Send {
        self.refresh()
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await?;
    debug!(%status, "Gateway rejected request");
    if status == StatusCode::UNAUTHORIZED {
        if let Ok(ErrorResponse { error }) = serde_json::from_str(&body) {
            return Err(ClientError::Unauthenticated(error));
        }
    }
    Err(ClientError::Rejected { status, body })
}
