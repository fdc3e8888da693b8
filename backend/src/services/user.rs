//! User service for registration and login
//!
//! Password hashing and verification run on the blocking thread pool;
//! the token codec is passed by reference (pre-computed keys).

use crate::auth::{password, Claim, TokenCodec};
use crate::db;
use crate::error::ApiError;
use crate::repositories::{UserRecord, UserRepository};
use quill_shared::validation::{validate_password, validate_user_name};
use quill_shared::{AuthError, LoginRequest, RegisterRequest, UserSummary};
use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

/// Outcome of a successful register/login
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub user: UserSummary,
    pub token: String,
}

fn record_attempt(action: &'static str, outcome: &'static str) {
    metrics::counter!(
        "quill_auth_attempts_total",
        "action" => action,
        "outcome" => outcome
    )
    .increment(1);
}

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user and sign them in
    pub async fn register(
        pool: &PgPool,
        tokens: &TokenCodec,
        req: &RegisterRequest,
    ) -> Result<IssuedSession, ApiError> {
        req.validate()?;
        validate_user_name(&req.user_name).map_err(ApiError::Validation)?;
        validate_password(&req.password).map_err(ApiError::Validation)?;

        if UserRepository::user_name_exists(pool, &req.user_name).await? {
            record_attempt("register", "duplicate");
            return Err(AuthError::DuplicateUserName.into());
        }

        let password_hash = password::hash_password_async(req.password.clone()).await?;

        // A concurrent registration can still win the race; the unique
        // constraint decides.
        let user = match UserRepository::create(pool, &req.user_name, &password_hash).await {
            Ok(user) => user,
            Err(e) if db::is_unique_violation(&e) => {
                record_attempt("register", "duplicate");
                return Err(AuthError::DuplicateUserName.into());
            }
            Err(e) => return Err(ApiError::Internal(e)),
        };

        info!(user_id = %user.id, user_name = %user.user_name, "User registered");
        record_attempt("register", "success");

        Self::issue(tokens, &user)
    }

    /// Verify credentials and sign the user in
    pub async fn login(
        pool: &PgPool,
        tokens: &TokenCodec,
        req: &LoginRequest,
    ) -> Result<IssuedSession, ApiError> {
        req.validate()?;

        let user = match UserRepository::find_by_user_name(pool, &req.user_name).await? {
            Some(user) => user,
            None => {
                warn!(user_name = %req.user_name, "Login for unknown user");
                record_attempt("login", "user_not_found");
                return Err(AuthError::UserNotFound.into());
            }
        };

        let valid =
            password::verify_password_async(req.password.clone(), user.password_hash.clone())
                .await?;
        if !valid {
            warn!(user_id = %user.id, "Login with wrong password");
            record_attempt("login", "invalid_password");
            return Err(AuthError::InvalidPassword.into());
        }

        info!(user_id = %user.id, "User logged in");
        record_attempt("login", "success");

        Self::issue(tokens, &user)
    }

    fn issue(tokens: &TokenCodec, user: &UserRecord) -> Result<IssuedSession, ApiError> {
        let token = tokens.issue(&Claim {
            user_id: user.id,
            user_name: user.user_name.clone(),
        })?;

        Ok(IssuedSession {
            user: UserSummary {
                id: user.id,
                user_name: user.user_name.clone(),
            },
            token,
        })
    }
}
