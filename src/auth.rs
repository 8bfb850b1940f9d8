//! Request authentication
//!
//! Tokens are issued by the SSO service and verified here with the shared
//! HMAC secret. The token is read from the `token` query parameter first,
//! then from the `Authorization` cookie. Verified requests carry an
//! `AuthUser` extension.

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name of the cookie carrying the token
pub const AUTH_COOKIE: &str = "Authorization";

/// Claims issued by the SSO service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id in this application
    pub uid: i64,
    /// Expiry (Unix timestamp), checked when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>,
    /// Login email
    #[serde(default)]
    pub email: Option<String>,
    /// Application the token was issued for
    #[serde(default)]
    pub app_id: Option<i32>,
}

/// HMAC (HS256/HS384/HS512) token verifier
#[derive(Clone)]
pub struct JwtVerifier {
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Verifier for tokens signed with `secret`
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: hmac_validation(),
        }
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Auth(format!("invalid auth token: {}", e)))
    }
}

fn hmac_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
    // SSO tokens without `exp` never expire
    validation.required_spec_claims.clear();
    validation
}

/// The authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    /// User id taken from the `uid` claim
    pub id: i64,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| AppError::Auth("request is not authenticated".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Token from the `token` query parameter, else from the auth cookie
pub fn request_token(parts: &Parts) -> Option<String> {
    let from_query = Query::<TokenQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(q)| q.token)
        .filter(|t| !t.is_empty());
    if from_query.is_some() {
        return from_query;
    }

    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|t| !t.is_empty())
}

/// Middleware rejecting requests without a valid token
pub async fn require_auth(
    State(verifier): State<Arc<JwtVerifier>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();

    let Some(token) = request_token(&parts) else {
        tracing::warn!(path = %parts.uri.path(), "Auth token is empty");
        return Err(AppError::Auth("auth token is empty".to_string()));
    };

    let claims = verifier.verify(&token).map_err(|e| {
        tracing::warn!(path = %parts.uri.path(), error = %e, "Invalid auth token");
        e
    })?;

    parts.extensions.insert(AuthUser { id: claims.uid });
    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// `Set-Cookie` value issued on login
pub fn auth_cookie(token: &str, ttl_secs: u64) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        AUTH_COOKIE, token, ttl_secs
    )
}
