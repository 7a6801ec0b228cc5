//! Route guard for the console's page paths.
//!
//! Two states, decided only by whether the request carries a non-empty
//! `access_token` cookie:
//!
//! | visitor        | path                 | outcome                    |
//! |----------------|----------------------|----------------------------|
//! | anonymous      | admin section        | redirect to the login page |
//! | authenticated  | login page           | redirect to the admin page |
//! | anything else  |                      | pass through               |
//!
//! Paths are compared in the form the static file service resolves them:
//! percent-decoded with empty and `.` segments dropped. Paths containing `..`
//! never reach a page and get a `404`.
//!
//! Expiry and signatures are not checked here. A stale cookie still counts as
//! authenticated; the upstream API rejects it on the next call.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use percent_encoding::percent_decode_str;
use tracing::debug;

use super::{config::GatewayConfig, handlers::page_not_found, session::Session, GatewayState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visitor {
    Anonymous,
    Authenticated,
}

impl From<&Session> for Visitor {
    fn from(session: &Session) -> Self {
        if session.is_authenticated() {
            Self::Authenticated
        } else {
            Self::Anonymous
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision<'a> {
    Pass,
    Redirect(&'a str),
    /// The path cannot name a page (`..`, backslashes, invalid UTF-8).
    Reject,
}

/// Resolve `raw` the way the static file service does before it touches the
/// disk: percent-decoded, empty and `.` segments dropped. `None` for paths
/// that would escape the page root or do not decode.
fn canonical_path(raw: &str) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;

    let mut canonical = String::with_capacity(decoded.len() + 1);
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            _ if segment.contains('\\') => return None,
            _ => {
                canonical.push('/');
                canonical.push_str(segment);
            }
        }
    }

    if canonical.is_empty() {
        canonical.push('/');
    }
    Some(canonical)
}

/// `section` itself and anything below it.
fn in_section(path: &str, section: &str) -> bool {
    if section == "/" {
        return true;
    }
    path.strip_prefix(section)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Decide what happens to a page request. `path` is the raw request path;
/// matching happens on its canonical form so encoded or doubled slashes
/// cannot reach the admin section unnoticed.
#[must_use]
pub fn decide<'a>(config: &'a GatewayConfig, path: &str, visitor: Visitor) -> GuardDecision<'a> {
    let Some(path) = canonical_path(path) else {
        return GuardDecision::Reject;
    };

    match visitor {
        Visitor::Anonymous if in_section(&path, config.admin_path()) => {
            GuardDecision::Redirect(config.login_path())
        }
        Visitor::Authenticated if path == config.login_path() => {
            GuardDecision::Redirect(config.admin_path())
        }
        _ => GuardDecision::Pass,
    }
}

/// Middleware wrapping the page routes.
pub async fn route_guard(
    State(state): State<Arc<GatewayState>>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let visitor = Visitor::from(&session);
    match decide(state.config(), request.uri().path(), visitor) {
        GuardDecision::Pass => next.run(request).await,
        GuardDecision::Redirect(location) => {
            debug!(path = request.uri().path(), ?visitor, location, "Route guard redirect");
            Redirect::temporary(location).into_response()
        }
        GuardDecision::Reject => {
            debug!(path = request.uri().path(), "Route guard rejected path");
            page_not_found().await.into_response()
        }
    }
}
