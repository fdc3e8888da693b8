//! Authentication routes
//!
//! Register, login and logout set or clear the `token` session cookie;
//! `/profile` echoes the verified claim back to the client.

use crate::auth::{auth_middleware, AuthUser};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use quill_shared::{AckResponse, LoginRequest, RegisterRequest, SessionProfile, UserSummary};

/// Create auth routes
pub fn auth_routes(state: &AppState) -> Router<AppState> {
    let gate = middleware::from_fn_with_state(state.clone(), auth_middleware);

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/profile", get(profile).route_layer(gate))
}

/// Register a new user
///
/// POST /register
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<UserSummary>)> {
    let session = UserService::register(state.db(), state.tokens(), &req).await?;
    let jar = state.cookies.set_token(jar, session.token);
    Ok((StatusCode::CREATED, jar, Json(session.user)))
}

/// Login with user name and password
///
/// POST /login
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<(CookieJar, Json<UserSummary>)> {
    let session = UserService::login(state.db(), state.tokens(), &req).await?;
    let jar = state.cookies.set_token(jar, session.token);
    Ok((jar, Json(session.user)))
}

/// Drop the session cookie; tokens are stateless so nothing else changes
///
/// POST /logout
async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<AckResponse>) {
    (state.cookies.clear_token(jar), Json(AckResponse { ok: true }))
}

/// Decoded claim of the current session
///
/// GET /profile
async fn profile(auth: AuthUser) -> Json<SessionProfile> {
    Json(auth.claims.into_profile())
}
