use crate::cli::{
    actions::{server::Args, Action},
    commands::{self, pages},
};
use anyhow::{Context, Result};
use std::path::PathBuf;
use url::Url;

/// # Errors
/// Returns an error if required arguments are missing or the API URL is invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches
        .get_one::<u16>(commands::ARG_PORT)
        .copied()
        .unwrap_or(8080);

    let api_url = matches
        .get_one::<String>(commands::ARG_API_URL)
        .context("missing required argument: --api-url")?;
    let api_url = Url::parse(api_url).context("invalid CONSOLE_API_URL")?;

    let login_path = matches
        .get_one::<String>(pages::ARG_LOGIN_PATH)
        .cloned()
        .context("missing argument: --login-path")?;
    let admin_path = matches
        .get_one::<String>(pages::ARG_ADMIN_PATH)
        .cloned()
        .context("missing argument: --admin-path")?;

    Ok(Action::Server(Args {
        port,
        api_url,
        production: matches.get_flag(commands::ARG_PRODUCTION),
        login_path,
        admin_path,
        static_dir: matches.get_one::<PathBuf>(pages::ARG_STATIC_DIR).cloned(),
        upstream_timeout_seconds: matches
            .get_one::<u64>(commands::ARG_UPSTREAM_TIMEOUT)
            .copied()
            .unwrap_or(crate::gateway::config::DEFAULT_UPSTREAM_TIMEOUT_SECONDS),
    }))
}
