pub mod logging;
pub mod pages;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";
pub const ARG_API_URL: &str = "api-url";
pub const ARG_PRODUCTION: &str = "production";
pub const ARG_UPSTREAM_TIMEOUT: &str = "upstream-timeout-seconds";

const DEFAULT_UPSTREAM_TIMEOUT: &str = "10";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("console-gateway")
        .about("Session gateway for the administration console")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("8080")
                .env("CONSOLE_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Base URL of the identity backend, example: https://api.tld")
                .env("CONSOLE_API_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PRODUCTION)
                .long(ARG_PRODUCTION)
                .help("Production deployment: session cookies get the Secure attribute")
                .env("CONSOLE_PRODUCTION")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_UPSTREAM_TIMEOUT)
                .long(ARG_UPSTREAM_TIMEOUT)
                .help("Timeout for calls to the identity backend, in seconds")
                .default_value(DEFAULT_UPSTREAM_TIMEOUT)
                .env("CONSOLE_UPSTREAM_TIMEOUT_SECONDS")
                .value_parser(clap::value_parser!(u64).range(1..)),
        );

    let command = pages::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const API_URL: &str = "https://api.tld";

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "console-gateway");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Session gateway for the administration console"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("CONSOLE_PORT", None::<&str>),
                ("CONSOLE_PRODUCTION", None),
                ("CONSOLE_LOGIN_PATH", None),
                ("CONSOLE_ADMIN_PATH", None),
                ("CONSOLE_STATIC_DIR", None),
                ("CONSOLE_UPSTREAM_TIMEOUT_SECONDS", None),
                ("CONSOLE_LOG_LEVEL", None),
            ],
            || {
                let matches = new().get_matches_from(vec!["console-gateway", "--api-url", API_URL]);

                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8080));
                assert_eq!(
                    matches.get_one::<String>(ARG_API_URL).map(String::as_str),
                    Some(API_URL)
                );
                assert!(!matches.get_flag(ARG_PRODUCTION));
                assert_eq!(
                    matches.get_one::<u64>(ARG_UPSTREAM_TIMEOUT).copied(),
                    Some(crate::gateway::config::DEFAULT_UPSTREAM_TIMEOUT_SECONDS)
                );
                assert_eq!(
                    matches
                        .get_one::<String>(pages::ARG_LOGIN_PATH)
                        .map(String::as_str),
                    Some("/login")
                );
                assert_eq!(
                    matches
                        .get_one::<String>(pages::ARG_ADMIN_PATH)
                        .map(String::as_str),
                    Some("/admin")
                );
                assert!(matches.get_one::<PathBuf>(pages::ARG_STATIC_DIR).is_none());
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(0)
                );
            },
        );
    }

    #[test]
    fn test_api_url_is_required() {
        temp_env::with_vars([("CONSOLE_API_URL", None::<&str>)], || {
            let result = new().try_get_matches_from(vec!["console-gateway"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = new().try_get_matches_from(vec![
            "console-gateway",
            "--api-url",
            API_URL,
            "--upstream-timeout-seconds",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("CONSOLE_API_URL", Some(API_URL)),
                ("CONSOLE_PORT", Some("443")),
                ("CONSOLE_PRODUCTION", Some("true")),
                ("CONSOLE_LOGIN_PATH", Some("/signin")),
                ("CONSOLE_ADMIN_PATH", Some("/console")),
                ("CONSOLE_STATIC_DIR", Some("/srv/console")),
                ("CONSOLE_UPSTREAM_TIMEOUT_SECONDS", Some("3")),
                ("CONSOLE_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["console-gateway"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>(ARG_API_URL).map(String::as_str),
                    Some(API_URL)
                );
                assert!(matches.get_flag(ARG_PRODUCTION));
                assert_eq!(
                    matches
                        .get_one::<String>(pages::ARG_LOGIN_PATH)
                        .map(String::as_str),
                    Some("/signin")
                );
                assert_eq!(
                    matches
                        .get_one::<String>(pages::ARG_ADMIN_PATH)
                        .map(String::as_str),
                    Some("/console")
                );
                assert_eq!(
                    matches.get_one::<PathBuf>(pages::ARG_STATIC_DIR),
                    Some(&PathBuf::from("/srv/console"))
                );
                assert_eq!(
                    matches.get_one::<u64>(ARG_UPSTREAM_TIMEOUT).copied(),
                    Some(3)
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("CONSOLE_LOG_LEVEL", Some(level)),
                    ("CONSOLE_API_URL", Some(API_URL)),
                ],
                || {
                    let matches = new().get_matches_from(vec!["console-gateway"]);
                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        u8::try_from(index).ok()
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_usize {
            temp_env::with_vars([("CONSOLE_LOG_LEVEL", None::<String>)], || {
                let mut args = vec![
                    "console-gateway".to_string(),
                    "--api-url".to_string(),
                    API_URL.to_string(),
                ];

                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }
}
