pub mod auth;

pub mod health;
pub use self::health::health;

use axum::{http::StatusCode, response::IntoResponse};

/// Page paths end here when no console bundle is configured.
pub async fn page_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
