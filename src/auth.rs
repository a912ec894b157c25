use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tracing::debug;
use uuid::Uuid;

use crate::config::AppConfig;

/// Name of the cookie the client stores its access token in.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Role reported for sessions opened through the local `x-user-id` bypass.
pub const LOCAL_BYPASS_ROLE: &str = "member";

/// TokenType
///
/// The `type` claim. Only access tokens open a session; refresh tokens are
/// meant for the token endpoint and are refused here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims
///
/// Payload of the HS256 session token issued by the authentication service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user's id.
    pub sub: Uuid,
    /// The user's role, e.g. `member` or `librarian`.
    pub role: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Expiration Time (exp), seconds since the epoch.
    pub exp: usize,
    /// Issued At (iat), seconds since the epoch.
    pub iat: usize,
}

/// AuthUser
///
/// The identity behind an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: String,
}

/// AuthState
///
/// What the guard knows about the current session. Anything that cannot be
/// read with certainty is `Anonymous`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(AuthUser),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            AuthState::Anonymous => None,
        }
    }
}

/// SessionError
///
/// Why a presented token did not open a session. Only ever logged; the
/// session falls back to `Anonymous`.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("token rejected: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("refresh tokens cannot open a session")]
    NotAnAccessToken,
}

/// AuthState Extractor Implementation
///
/// Reads the session from the request. Never rejects: missing, malformed,
/// expired or refresh tokens all produce `AuthState::Anonymous`, which the
/// guard treats as "not authenticated".
impl<S> FromRequestParts<S> for AuthState
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);
        Ok(read_auth_state(&parts.headers, &config))
    }
}

/// read_auth_state
///
/// Resolution order: the `x-user-id` bypass (only with `auth_bypass` set),
/// then the `Authorization: Bearer` header, then the `access_token` cookie.
pub fn read_auth_state(headers: &HeaderMap, config: &AppConfig) -> AuthState {
    if config.auth_bypass {
        let bypass = headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| Uuid::parse_str(raw).ok());
        if let Some(id) = bypass {
            debug!(%id, "session opened through local bypass");
            return AuthState::Authenticated(AuthUser {
                id,
                role: LOCAL_BYPASS_ROLE.to_string(),
            });
        }
    }

    let Some(token) = bearer_token(headers).or_else(|| cookie_token(headers)) else {
        return AuthState::Anonymous;
    };

    match decode_access_token(token, &config.jwt_secret) {
        Ok(user) => AuthState::Authenticated(user),
        Err(e) => {
            debug!(error = %e, "session token refused");
            AuthState::Anonymous
        }
    }
}

/// decode_access_token
///
/// Verifies signature and expiry, then insists on `type = access`.
pub fn decode_access_token(token: &str, secret: &str) -> Result<AuthUser, SessionError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    let claims = decode::<Claims>(token, &decoding_key, &validation)?.claims;
    if claims.token_type != TokenType::Access {
        return Err(SessionError::NotAnAccessToken);
    }

    Ok(AuthUser {
        id: claims.sub,
        role: claims.role,
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == ACCESS_TOKEN_COOKIE)
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
}
