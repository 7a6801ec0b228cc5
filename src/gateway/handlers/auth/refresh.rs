use anyhow::Context;
use axum::{extract::Extension, response::IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::types::SuccessResponse;
use crate::gateway::{
    error::{ErrorResponse, GatewayError},
    session::{cookies, Session},
    upstream::RefreshPayload,
    GatewayState,
};

pub(crate) const NO_REFRESH_TOKEN: &str = "No refresh token";
pub(crate) const REFRESH_FAILED: &str = "Failed to refresh token";

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "Tokens rotated", body = SuccessResponse),
        (status = 401, description = "Missing refresh cookie or upstream refused it", body = ErrorResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn refresh(
    state: Extension<Arc<GatewayState>>,
    session: Session,
) -> Result<impl IntoResponse, GatewayError> {
    let Some(refresh_token) = session.refresh_token() else {
        return Err(GatewayError::Unauthenticated(NO_REFRESH_TOKEN));
    };

    let response = state.upstream().refresh(refresh_token).await?;
    if !response.is_success() {
        warn!(status = %response.status, "Upstream rejected token refresh");
        return Err(GatewayError::Unauthenticated(REFRESH_FAILED));
    }

    let payload: RefreshPayload = response
        .json()
        .context("Upstream refresh answered with an unreadable body")?;
    let token = payload.token.unwrap_or_default();
    let secure = state.config().secure_cookies();

    // Only rotate what upstream actually issued; the rest stays as it is.
    let mut jar = CookieJar::new();
    if let Some(access_token) = token.access_token() {
        jar = jar.add(cookies::access_token_cookie(
            access_token,
            cookies::REFRESHED_ACCESS_TOKEN_TTL_SECONDS,
            secure,
        ));
    }
    if let Some(refresh_token) = token.refresh_token() {
        jar = jar.add(cookies::refresh_token_cookie(refresh_token, secure));
    }

    info!(
        access_rotated = token.access_token().is_some(),
        refresh_rotated = token.refresh_token().is_some(),
        "Token refreshed"
    );

    Ok((jar, Json(SuccessResponse::OK)))
}
