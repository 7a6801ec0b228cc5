use axum::Json;
use utoipa::OpenApi;

use super::{
    error::ErrorResponse,
    handlers::{
        auth::{
            self,
            types::{LoginRequest, LoginResponse, SuccessResponse, TokenResponse},
        },
        health,
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Console Gateway", description = "Session lifecycle for the administration console"),
    paths(
        health::health,
        auth::login::login,
        auth::logout::logout,
        auth::refresh::refresh,
        auth::token::token,
    ),
    components(schemas(LoginRequest, LoginResponse, SuccessResponse, TokenResponse, ErrorResponse)),
    tags(
        (name = "auth", description = "Login, logout, refresh and token retrieval"),
        (name = "health", description = "Liveness and build information"),
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi())
}
