//! Session state carried by the request.
//!
//! The browser's cookies are parsed once per request into a [`Session`]
//! value; handlers and the route guard receive it as an extractor instead of
//! reading cookies themselves.

pub mod cookies;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::convert::Infallible;
use tracing::debug;

pub use cookies::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, USER_COOKIE};

/// Upstream user ids are numeric for some tenants and strings for others.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

/// Display-only snapshot of the authenticated user.
///
/// Fields the console does not know about are kept in `extra` so the snapshot
/// mirrors what upstream returned.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    access_token: Option<SecretString>,
    refresh_token: Option<SecretString>,
    user: Option<UserProfile>,
}

impl Session {
    /// Build the session from the request cookies. Empty values count as
    /// absent; an unreadable `user` cookie is ignored.
    #[must_use]
    pub fn from_jar(jar: &CookieJar) -> Self {
        let value = |name: &str| {
            jar.get(name)
                .map(|cookie| cookie.value().trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let user = value(USER_COOKIE).and_then(|raw| {
            serde_json::from_str::<UserProfile>(&raw)
                .map_err(|err| debug!("Ignoring unreadable user cookie: {err}"))
                .ok()
        });

        Self {
            access_token: value(ACCESS_TOKEN_COOKIE).map(SecretString::from),
            refresh_token: value(REFRESH_TOKEN_COOKIE).map(SecretString::from),
            user,
        }
    }

    /// Presence check only; expiry is enforced by the upstream API.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&SecretString> {
        self.access_token.as_ref()
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<&SecretString> {
        self.refresh_token.as_ref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_jar(&CookieJar::from_headers(&parts.headers)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
    use secrecy::ExposeSecret;
    use serde_json::json;

    fn session_from(cookie_header: &str) -> Session {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie_header).unwrap());
        Session::from_jar(&CookieJar::from_headers(&headers))
    }

    #[test]
    fn no_cookies_is_anonymous() {
        let session = Session::from_jar(&CookieJar::from_headers(&HeaderMap::new()));
        assert!(!session.is_authenticated());
        assert!(session.refresh_token().is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn reads_tokens() {
        let session = session_from("access_token=T1; refresh_token=R1; theme=dark");
        assert!(session.is_authenticated());
        assert_eq!(
            session.access_token().map(|t| t.expose_secret().to_string()),
            Some("T1".to_string())
        );
        assert_eq!(
            session.refresh_token().map(|t| t.expose_secret().to_string()),
            Some("R1".to_string())
        );
    }

    #[test]
    fn empty_token_is_absent() {
        let session = session_from("access_token=; refresh_token=");
        assert!(!session.is_authenticated());
        assert!(session.refresh_token().is_none());
    }

    #[test]
    fn reads_percent_encoded_user() {
        let session = session_from(
            "user=%7B%22id%22%3A1%2C%22email%22%3A%22a%40b.com%22%2C%22plan%22%3A%22pro%22%7D",
        );
        let user = session.user().unwrap();
        assert_eq!(user.id, Some(UserId::Number(1)));
        assert_eq!(user.email.as_deref(), Some("a@b.com"));
        assert_eq!(user.extra.get("plan"), Some(&json!("pro")));
        // The profile alone does not authenticate the request.
        assert!(!session.is_authenticated());
    }

    #[test]
    fn unreadable_user_cookie_is_ignored() {
        let session = session_from("access_token=T1; user=not-json");
        assert!(session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let session = session_from("access_token=super-secret");
        assert!(!format!("{session:?}").contains("super-secret"));
    }

    #[test]
    fn user_profile_keeps_unknown_fields() {
        let raw = json!({"id": "u-1", "email": "a@b.com", "role": "owner", "organization_id": 7, "name": "Ada"});
        let user: UserProfile = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(user.id, Some(UserId::Text("u-1".to_string())));
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }
}
