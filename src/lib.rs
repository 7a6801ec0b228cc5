//! # Console Gateway (session lifecycle for the administration console)
//!
//! `console-gateway` sits between the administration console running in the
//! browser and the platform's identity backend ("upstream"). It owns the
//! session lifecycle of the console:
//!
//! - **Login / Refresh / Logout / Token** endpoints under `/api/auth`, which
//!   exchange credentials with upstream and keep the resulting tokens in
//!   cookies.
//! - A **route guard** in front of the console's page paths (`/admin/**` and
//!   `/login`).
//! - A **refresh scheduler** (client side) that rotates the access token before
//!   it lapses.
//!
//! ## Cookies
//!
//! The access and refresh tokens live in `HttpOnly` cookies, so page scripts
//! never see them. A JSON snapshot of the user profile lives in a
//! script-readable `user` cookie for display purposes only. All cookies are
//! `SameSite=Strict`; `Secure` is only set in production deployments.
//!
//! ## Trust boundary
//!
//! The route guard only checks that an access-token cookie is present. Expiry
//! and signatures are enforced by the upstream API, which rejects stale tokens
//! with `401` on the next call.

pub mod cli;
pub mod client;
pub mod gateway;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
