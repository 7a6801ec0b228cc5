use axum::Json;
use secrecy::ExposeSecret;

use super::types::TokenResponse;
use crate::gateway::{
    error::{ErrorResponse, GatewayError},
    session::Session,
};

pub(crate) const NO_TOKEN: &str = "No token found";

/// Hand the raw access token to callers that cannot rely on the cookie, e.g.
/// to build an `Authorization` header for a non-browser client.
#[utoipa::path(
    get,
    path = "/api/auth/token",
    responses(
        (status = 200, description = "Current access token", body = TokenResponse),
        (status = 401, description = "No access-token cookie", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn token(session: Session) -> Result<Json<TokenResponse>, GatewayError> {
    let token = session
        .access_token()
        .ok_or(GatewayError::Unauthenticated(NO_TOKEN))?;

    Ok(Json(TokenResponse {
        token: token.expose_secret().to_string(),
    }))
}
