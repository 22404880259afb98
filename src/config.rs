use axum_extra::extract::cookie::Key;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ToolroomError;
use crate::middleware::auth::AdminCredentials;

/// Runtime configuration.
///
/// Sources, lowest to highest precedence:
/// - built-in defaults
/// - `DATABASE_URL` / `PORT`
/// - `TOOLROOM_*` variables (e.g. `TOOLROOM_ADMIN_PASSWORD`)
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub loglevel: String,
    pub admin_username: String,
    pub admin_password: String,
    /// Master key material for the session cookie, at least 64 bytes.
    pub session_secret: Option<String>,
    /// Omit the `Secure` cookie attribute. The server itself speaks plain
    /// HTTP, so this stays on unless a TLS proxy fronts it.
    pub insecure_cookie: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:toolroom.db".to_string(),
            host: "0.0.0.0".to_string(),
            port: 10000,
            loglevel: "info".to_string(),
            admin_username: "admin".to_string(),
            admin_password: "toolroom".to_string(),
            session_secret: None,
            insecure_cookie: true,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("loglevel", &self.loglevel)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"[REDACTED]")
            .field(
                "session_secret",
                &self.session_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("insecure_cookie", &self.insecure_cookie)
            .finish()
    }
}

impl Config {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ToolroomError> {
        Self::figment()
            .extract()
            .map_err(|e| ToolroomError::ConfigError(e.to_string()))
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(&["DATABASE_URL", "PORT"]))
            .merge(Env::prefixed("TOOLROOM_"))
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn credentials(&self) -> AdminCredentials {
        AdminCredentials::new(self.admin_username.clone(), self.admin_password.clone())
    }

    /// Cookie encryption key. Falls back to a random key, which invalidates
    /// every session on restart.
    pub fn cookie_key(&self) -> Result<Key, ToolroomError> {
        match self.session_secret.as_deref() {
            Some(secret) => Key::try_from(secret.as_bytes()).map_err(|_| {
                ToolroomError::ConfigError(
                    "session_secret must be at least 64 bytes long".to_string(),
                )
            }),
            None => {
                warn!("no session_secret configured; generating an ephemeral cookie key");
                Ok(Key::generate())
            }
        }
    }
}
