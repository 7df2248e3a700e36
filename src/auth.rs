//! Bearer token authentication for protected routes.
//!
//! Tokens are HS256 JWTs signed with `JWT_SECRET`. [`private_route`] verifies
//! the token and stores its [`Claims`] in the request extensions;
//! [`roles`] then restricts a route to the listed roles. Both are ordinary
//! route middleware and must be listed in that order.

use crate::error::ApiError;
use crate::routing::{middleware, Middleware};
use crate::state::AppState;
use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Lifetime of issued tokens, in seconds
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

pub const MISSING_TOKEN: &str = "Acesso negado, token não fornecido";
pub const INVALID_TOKEN: &str = "Token inválido ou expirado";
pub const ACCESS_DENIED: &str = "Acesso negado!";

/// Verified token contents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Sign a token for `sub`, valid for one hour
pub fn make_token(
    secret: &str,
    sub: &str,
    role: Option<&str>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: sub.to_string(),
        role: role.map(str::to_string),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Check signature and expiry
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// Extract Bearer token from Authorization header
pub fn extract_bearer_token(authorization: &str) -> Option<&str> {
    authorization
        .strip_prefix("Bearer ")
        .or_else(|| authorization.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(state: &AppState, request: &Request) -> Result<Claims, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or_else(|| ApiError::Unauthorized(MISSING_TOKEN.to_string()))?;

    let Some(secret) = state.config.jwt_secret.as_deref() else {
        warn!("JWT_SECRET is not configured; rejecting token");
        return Err(ApiError::Unauthorized(INVALID_TOKEN.to_string()));
    };

    verify_token(secret, token).map_err(|e| {
        debug!(error = %e, "Token rejected");
        ApiError::Unauthorized(INVALID_TOKEN.to_string())
    })
}

/// Require a valid bearer token
pub fn private_route() -> Middleware {
    middleware(|state: AppState, mut request: Request, next: Next| async move {
        match authenticate(&state, &request) {
            Ok(claims) => {
                request.extensions_mut().insert(claims);
                next.run(request).await
            }
            Err(err) => err.into_response(),
        }
    })
}

/// Allow only tokens whose role is listed. Must follow [`private_route`].
pub fn roles(allowed: &'static [&'static str]) -> Middleware {
    middleware(move |_state: AppState, request: Request, next: Next| async move {
        let permitted = request
            .extensions()
            .get::<Claims>()
            .and_then(|claims| claims.role.as_deref())
            .is_some_and(|role| allowed.iter().any(|r| *r == role));

        if permitted {
            next.run(request).await
        } else {
            ApiError::Forbidden(ACCESS_DENIED.to_string()).into_response()
        }
    })
}
