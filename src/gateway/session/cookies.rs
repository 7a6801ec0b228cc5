//! Cookie codec for the session.
//!
//! Every auth cookie is `SameSite=Strict` with `Path=/`. Token cookies are
//! `HttpOnly`; the `user` cookie is script-readable so the console can render
//! identity without a round trip.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use super::UserProfile;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
pub const USER_COOKIE: &str = "user";

/// Access-token lifetime when upstream login omits `expires_in`.
pub const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 30 * 60;
/// Access-token lifetime after a refresh.
pub const REFRESHED_ACCESS_TOKEN_TTL_SECONDS: i64 = 15 * 60;
pub const REFRESH_TOKEN_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

fn auth_cookie(
    name: &'static str,
    value: String,
    http_only: bool,
    secure: bool,
    max_age: Duration,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(http_only)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(max_age)
        .build()
}

pub(crate) fn access_token_cookie(token: &str, ttl_seconds: i64, secure: bool) -> Cookie<'static> {
    auth_cookie(
        ACCESS_TOKEN_COOKIE,
        token.to_string(),
        true,
        secure,
        Duration::seconds(ttl_seconds),
    )
}

pub(crate) fn refresh_token_cookie(token: &str, secure: bool) -> Cookie<'static> {
    auth_cookie(
        REFRESH_TOKEN_COOKIE,
        token.to_string(),
        true,
        secure,
        Duration::seconds(REFRESH_TOKEN_TTL_SECONDS),
    )
}

/// JSON-encoded profile; percent-encoding happens when the jar is written.
pub(crate) fn user_cookie(
    user: &UserProfile,
    ttl_seconds: i64,
    secure: bool,
) -> Result<Cookie<'static>, serde_json::Error> {
    let value = serde_json::to_string(user)?;
    Ok(auth_cookie(
        USER_COOKIE,
        value,
        false,
        secure,
        Duration::seconds(ttl_seconds),
    ))
}

/// Removal cookies for every session cookie, regardless of what the request
/// carried.
pub(crate) fn clear_session_cookies(secure: bool) -> [Cookie<'static>; 3] {
    [
        auth_cookie(ACCESS_TOKEN_COOKIE, String::new(), true, secure, Duration::ZERO),
        auth_cookie(REFRESH_TOKEN_COOKIE, String::new(), true, secure, Duration::ZERO),
        auth_cookie(USER_COOKIE, String::new(), false, secure, Duration::ZERO),
    ]
}
