use anyhow::{anyhow, Context};
use axum::{extract::Extension, response::IntoResponse, Json};
use axum_extra::extract::{cookie::CookieJar, WithRejection};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::types::{LoginRequest, LoginResponse};
use crate::gateway::{
    error::{ErrorResponse, GatewayError},
    session::cookies,
    upstream::LoginPayload,
    GatewayState,
};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookies set", body = LoginResponse),
        (status = 415, description = "Body is not JSON", body = ErrorResponse),
        (status = 422, description = "Body is missing `email` or `password`", body = ErrorResponse),
        (status = 500, description = "Upstream unreachable or returned no access token", body = ErrorResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all, fields(email = %request.email))]
pub async fn login(
    state: Extension<Arc<GatewayState>>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, GatewayError>,
) -> Result<impl IntoResponse, GatewayError> {
    let password = SecretString::from(request.password);
    let response = state.upstream().login(&request.email, &password).await?;

    // Upstream errors (bad credentials, locked accounts, ...) reach the console as-is.
    if !response.is_success() {
        debug!(status = %response.status, "Upstream rejected login");
        return Err(response.into_rejection());
    }

    let payload: LoginPayload = response
        .json()
        .context("Upstream login answered with an unreadable body")?;
    let token = payload.token.unwrap_or_default();
    let Some(access_token) = token.access_token() else {
        return Err(anyhow!("Upstream login succeeded without token.access_token").into());
    };

    let ttl_seconds = token
        .expires_in
        .filter(|seconds| *seconds >= 0)
        .unwrap_or(cookies::DEFAULT_ACCESS_TOKEN_TTL_SECONDS);
    let secure = state.config().secure_cookies();

    let mut jar = CookieJar::new().add(cookies::access_token_cookie(
        access_token,
        ttl_seconds,
        secure,
    ));
    if let Some(refresh_token) = token.refresh_token() {
        jar = jar.add(cookies::refresh_token_cookie(refresh_token, secure));
    }
    if let Some(user) = &payload.user {
        let cookie = cookies::user_cookie(user, ttl_seconds, secure)
            .context("Failed to encode user cookie")?;
        jar = jar.add(cookie);
    }

    info!(ttl_seconds, "Login succeeded");

    Ok((
        jar,
        Json(LoginResponse {
            message: payload.message,
            user: payload.user,
        }),
    ))
}
