use crate::cli::{
    actions::Action,
    commands::{self, logging},
    dispatch, telemetry,
};
use anyhow::Result;

/// Read the command line and environment, install logging, and hand back the
/// [`Action`] for the binary to run.
///
/// # Errors
///
/// Returns an error if the subscriber cannot be installed or the arguments do
/// not describe a runnable gateway (for example an unparsable `--api-url`).
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    telemetry::init(logging::level(&matches))?;

    dispatch::handler(&matches)
}
