use axum::{
    body::{Body, Bytes},
    extract::rejection::JsonRejection,
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

pub(crate) const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error body returned by every gateway endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// No usable credential where one is required.
    #[error("unauthenticated: {0}")]
    Unauthenticated(&'static str),
    /// The request body could not be read as the expected JSON.
    #[error("invalid request: {message}")]
    InvalidRequest { status: StatusCode, message: String },
    /// The identity backend answered with a non-2xx status. Status and body
    /// go back to the browser unchanged.
    #[error("upstream rejected the request with status {status}")]
    UpstreamRejected {
        status: StatusCode,
        content_type: Option<HeaderValue>,
        body: Bytes,
    },
    /// Transport failure or an upstream contract violation.
    #[error(transparent)]
    ServerError(#[from] anyhow::Error),
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated(message) => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: message.to_string(),
                }),
            )
                .into_response(),
            Self::InvalidRequest { status, message } => {
                (status, Json(ErrorResponse { error: message })).into_response()
            }
            Self::UpstreamRejected {
                status,
                content_type,
                body,
            } => {
                let mut response = Response::new(Body::from(body));
                *response.status_mut() = status;
                if let Some(content_type) = content_type {
                    response.headers_mut().insert(CONTENT_TYPE, content_type);
                }
                response
            }
            Self::ServerError(err) => {
                error!("Auth gateway failure: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: INTERNAL_ERROR_MESSAGE.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
