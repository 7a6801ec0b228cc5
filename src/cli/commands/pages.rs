use crate::gateway::config::{DEFAULT_ADMIN_PATH, DEFAULT_LOGIN_PATH};
use clap::{Arg, Command};

pub const ARG_LOGIN_PATH: &str = "login-path";
pub const ARG_ADMIN_PATH: &str = "admin-path";
pub const ARG_STATIC_DIR: &str = "static-dir";

/// Page paths watched by the route guard, and where the console's built
/// assets are served from.
#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_LOGIN_PATH)
                .long(ARG_LOGIN_PATH)
                .help("Path of the login page")
                .default_value(DEFAULT_LOGIN_PATH)
                .env("CONSOLE_LOGIN_PATH"),
        )
        .arg(
            Arg::new(ARG_ADMIN_PATH)
                .long(ARG_ADMIN_PATH)
                .help("Protected section prefix, also the landing page after login")
                .default_value(DEFAULT_ADMIN_PATH)
                .env("CONSOLE_ADMIN_PATH"),
        )
        .arg(
            Arg::new(ARG_STATIC_DIR)
                .long(ARG_STATIC_DIR)
                .help("Directory with the console's static files, served behind the route guard")
                .env("CONSOLE_STATIC_DIR")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
}
