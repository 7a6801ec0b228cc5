use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, services::ServeDir, set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;

pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
mod openapi;
pub mod session;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use openapi::openapi;
pub use session::{Session, UserProfile};

use handlers::{auth, health, page_not_found};
use upstream::UpstreamClient;

/// Shared, read-only state of the gateway.
#[derive(Debug)]
pub struct GatewayState {
    config: GatewayConfig,
    upstream: UpstreamClient,
}

impl GatewayState {
    /// # Errors
    /// Returns an error if the upstream HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let upstream = UpstreamClient::new(config.api_url().clone(), config.upstream_timeout())?;
        Ok(Self { config, upstream })
    }

    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    #[must_use]
    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }
}

/// Build the full application: `/api/auth/*`, `/health`, the OpenAPI
/// document, and the guarded page paths as fallback.
pub fn router(state: Arc<GatewayState>) -> Router {
    let pages = match state.config().static_dir() {
        Some(dir) => Router::new().fallback_service(ServeDir::new(dir)),
        None => Router::new().fallback(page_not_found),
    }
    .layer(middleware::from_fn_with_state(
        state.clone(),
        guard::route_guard,
    ));

    let api = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/token", get(auth::token))
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .layer(Extension(state));

    api.fallback_service(pages).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span)),
    )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, config: GatewayConfig) -> Result<()> {
    info!(
        api_url = %config.api_url(),
        production = config.production(),
        "Starting console gateway"
    );

    let state = Arc::new(GatewayState::new(config)?);
    let app = router(state);

    let listener = TcpListener::bind(format!("::0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        // Without a signal handler the server keeps running until killed.
        error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Gracefully shutdown");
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
