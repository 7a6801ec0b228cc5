use crate::gateway::{self, GatewayConfig};
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub api_url: Url,
    pub production: bool,
    pub login_path: String,
    pub admin_path: String,
    pub static_dir: Option<PathBuf>,
    pub upstream_timeout_seconds: u64,
}

impl Args {
    #[must_use]
    pub fn config(&self) -> GatewayConfig {
        GatewayConfig::new(self.api_url.clone())
            .with_production(self.production)
            .with_login_path(self.login_path.as_str())
            .with_admin_path(self.admin_path.as_str())
            .with_static_dir(self.static_dir.clone())
            .with_upstream_timeout_seconds(self.upstream_timeout_seconds)
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the upstream client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);
    gateway::new(args.port, args.config()).await
}

fn log_startup_args(args: &Args) {
    let static_dir = args
        .static_dir
        .as_ref()
        .map_or_else(|| "none".to_string(), |dir| dir.display().to_string());

    info!(
        port = args.port,
        api_url = %args.api_url,
        production = args.production,
        login_path = %args.login_path,
        admin_path = %args.admin_path,
        static_dir = %static_dir,
        upstream_timeout_seconds = args.upstream_timeout_seconds,
        "Startup configuration"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn config_is_normalized() {
        let args = Args {
            port: 8080,
            api_url: Url::parse("https://api.tld").unwrap(),
            production: true,
            login_path: "signin/".to_string(),
            admin_path: "/console/".to_string(),
            static_dir: Some(PathBuf::from("/srv/console")),
            upstream_timeout_seconds: 5,
        };

        let config = args.config();
        assert!(config.secure_cookies());
        assert_eq!(config.login_path(), "/signin");
        assert_eq!(config.admin_path(), "/console");
        assert_eq!(config.static_dir(), Some(&PathBuf::from("/srv/console")));
        assert_eq!(config.upstream_timeout(), Duration::from_secs(5));
    }
}
