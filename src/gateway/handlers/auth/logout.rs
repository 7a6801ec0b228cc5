use axum::{extract::Extension, response::IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{info, instrument};

use super::types::SuccessResponse;
use crate::gateway::{
    session::{cookies, Session},
    GatewayState,
};

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookies cleared", body = SuccessResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn logout(state: Extension<Arc<GatewayState>>, session: Session) -> impl IntoResponse {
    // Always clear, even when the request carried no session.
    let jar = cookies::clear_session_cookies(state.config().secure_cookies())
        .into_iter()
        .fold(CookieJar::new(), |jar, cookie| jar.add(cookie));

    info!(had_session = session.is_authenticated(), "Logged out");

    (jar, Json(SuccessResponse::OK))
}
