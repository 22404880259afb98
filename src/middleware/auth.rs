use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use subtle::ConstantTimeEq;
use time::Duration;

use crate::error::ToolroomError;
use crate::router::ToolroomState;

pub const SESSION_COOKIE: &str = "toolroom_session";
const SESSION_FLAG: &str = "authenticated";
pub const LOGIN_PATH: &str = "/login";

/// The single configured login pair.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    /// Both fields are compared in constant time; both are always checked.
    pub fn verify(&self, username: &str, password: &str) -> Result<(), ToolroomError> {
        let user_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        if bool::from(user_ok & pass_ok) {
            Ok(())
        } else {
            Err(ToolroomError::InvalidCredentials)
        }
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// True when the jar carries a session cookie that decrypted successfully.
pub fn is_authenticated(jar: &PrivateCookieJar) -> bool {
    jar.get(SESSION_COOKIE)
        .is_some_and(|c| c.value() == SESSION_FLAG)
}

pub fn start_session(jar: PrivateCookieJar, insecure_cookie: bool) -> PrivateCookieJar {
    let cookie = Cookie::build(Cookie::new(SESSION_COOKIE, SESSION_FLAG))
        .path("/")
        .http_only(true)
        .secure(!insecure_cookie)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(12))
        .build();
    jar.add(cookie)
}

pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(Cookie::new(SESSION_COOKIE, "")).path("/").build())
}

/// Extractor guarding protected pages. Unauthenticated callers are
/// redirected to the login form.
#[derive(Debug, Clone, Copy)]
pub struct RequireLogin;

impl FromRequestParts<ToolroomState> for RequireLogin {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ToolroomState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_headers(&parts.headers, Key::from_ref(state));
        if is_authenticated(&jar) {
            Ok(Self)
        } else {
            Err(Redirect::to(LOGIN_PATH).into_response())
        }
    }
}
