//! Authentication middleware
//!
//! Bridges the transport to a verified identity: the session token is read
//! from the `token` cookie (or an `Authorization: Bearer` header for
//! non-browser clients) and checked with the [`TokenCodec`] from AppState.

use super::jwt::{Claims, TokenCodec};
use super::session::TOKEN_COOKIE;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use quill_shared::AuthError;
use uuid::Uuid;

/// Authenticated user extracted from the session token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub user_name: String,
    pub claims: Claims,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            user_name: claims.username.clone(),
            claims,
        }
    }
}

/// Pull the raw session token out of request headers
///
/// An empty cookie is what logout leaves behind and counts as no token.
fn extract_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Ok(cookie.value().to_string());
        }
    }

    match headers.get(AUTHORIZATION) {
        None => Err(AuthError::MissingToken),
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidToken),
    }
}

/// Resolve the caller's identity from request headers
pub fn authenticate(headers: &HeaderMap, codec: &TokenCodec) -> Result<AuthUser, AuthError> {
    let token = extract_token(headers)?;
    codec.verify(&token).map(AuthUser::from)
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already resolved by `auth_middleware` on this route
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let app_state = AppState::from_ref(state);
        Ok(authenticate(&parts.headers, app_state.tokens())?)
    }
}

/// Middleware function for authentication (alternative to extractor)
///
/// Use this when you need to apply auth to a group of routes via layer.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: axum::extract::Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(request.headers(), state.tokens())?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
