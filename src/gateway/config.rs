//! Gateway configuration.
//!
//! Built once at startup from CLI arguments and shared (read-only) by every
//! handler through [`super::GatewayState`].

use std::{path::PathBuf, time::Duration};
use url::Url;

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_ADMIN_PATH: &str = "/admin";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    api_url: Url,
    production: bool,
    login_path: String,
    admin_path: String,
    static_dir: Option<PathBuf>,
    upstream_timeout: Duration,
}

impl GatewayConfig {
    #[must_use]
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            production: false,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            admin_path: DEFAULT_ADMIN_PATH.to_string(),
            static_dir: None,
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECONDS),
        }
    }

    #[must_use]
    pub fn with_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    #[must_use]
    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = normalize_path(&login_path.into());
        self
    }

    #[must_use]
    pub fn with_admin_path(mut self, admin_path: impl Into<String>) -> Self {
        self.admin_path = normalize_path(&admin_path.into());
        self
    }

    #[must_use]
    pub fn with_static_dir(mut self, static_dir: Option<PathBuf>) -> Self {
        self.static_dir = static_dir;
        self
    }

    #[must_use]
    pub fn with_upstream_timeout_seconds(mut self, seconds: u64) -> Self {
        self.upstream_timeout = Duration::from_secs(seconds.max(1));
        self
    }

    /// Base URL of the identity backend.
    #[must_use]
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    #[must_use]
    pub fn production(&self) -> bool {
        self.production
    }

    /// Auth cookies only carry `Secure` in production deployments.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.production
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Protected section prefix, also the landing page after login.
    #[must_use]
    pub fn admin_path(&self) -> &str {
        &self.admin_path
    }

    #[must_use]
    pub fn static_dir(&self) -> Option<&PathBuf> {
        self.static_dir.as_ref()
    }

    #[must_use]
    pub fn upstream_timeout(&self) -> Duration {
        self.upstream_timeout
    }
}

/// Leading slash, no trailing slash (except for the root itself).
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
