use std::{env, net::SocketAddr};

use crate::error::ConfigError;

const LOCAL_JWT_SECRET: &str = "library-portal-local-dev-secret";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// AppConfig
///
/// Loaded once at startup and immutable afterwards. Handlers pull it out of
/// the shared state through `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Picks the log format and the secret fallback.
    pub env: Env,
    // Accept the `x-user-id` header as a session. Only on when `APP_ENV=local`
    // is set explicitly; an unset `APP_ENV` leaves it off.
    pub auth_bypass: bool,
    // Secret used to verify incoming session tokens.
    pub jwt_secret: String,
    // Prefix the client is served under. Empty for `/`, otherwise `/app` style.
    pub base_path: String,
    // Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
}

/// Env
///
/// Runtime context of the process.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: Env::Local,
            auth_bypass: false,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            base_path: String::new(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads `APP_ENV`, `JWT_SECRET`, `BASE_URL` and `BIND_ADDR`. Production
    /// refuses to start without an explicit `JWT_SECRET`.
    ///
    /// Anything other than `APP_ENV=production` runs as `Env::Local`, but the
    /// `x-user-id` bypass needs the literal `APP_ENV=local`.
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = env::var("APP_ENV").ok();
        let env = match app_env.as_deref() {
            Some("production") => Env::Production,
            _ => Env::Local,
        };
        let auth_bypass = app_env.as_deref() == Some("local");

        let jwt_secret = match (env, env::var("JWT_SECRET")) {
            (_, Ok(secret)) if !secret.is_empty() => secret,
            (Env::Production, _) => return Err(ConfigError::MissingVar("JWT_SECRET")),
            (Env::Local, _) => LOCAL_JWT_SECRET.to_string(),
        };

        let base_path = normalize_base_path(&env::var("BASE_URL").unwrap_or_default());

        let raw_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(raw_addr.clone()))?;

        Ok(Self {
            env,
            auth_bypass,
            jwt_secret,
            base_path,
            bind_addr,
        })
    }

    /// Maps a request path onto an application path by removing the base
    /// path. `None` when the request lies outside the base path.
    pub fn strip_base<'a>(&self, path: &'a str) -> Option<&'a str> {
        if self.base_path.is_empty() {
            return Some(path);
        }
        match path.strip_prefix(self.base_path.as_str())? {
            "" => Some("/"),
            rest if rest.starts_with('/') => Some(rest),
            _ => None,
        }
    }

    /// Prefixes an application path with the base path.
    pub fn with_base(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path)
    }
}

/// normalize_base_path
///
/// `""`, `"/"` -> `""`; `"app"`, `"/app/"` -> `"/app"`.
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
