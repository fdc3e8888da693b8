//! Error types for the Quill application

use thiserror::Error;

/// Authentication and authorization failures
///
/// Every variant is terminal for the request that produced it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing session token")]
    MissingToken,

    #[error("Invalid session token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("User name already taken")]
    DuplicateUserName,

    #[error("Not the author of this resource")]
    Forbidden,
}

impl AuthError {
    /// Stable machine-readable code used in API error payloads
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::InvalidPassword => "INVALID_PASSWORD",
            AuthError::DuplicateUserName => "DUPLICATE_USER_NAME",
            AuthError::Forbidden => "FORBIDDEN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let all = [
            AuthError::MissingToken,
            AuthError::InvalidToken,
            AuthError::UserNotFound,
            AuthError::InvalidPassword,
            AuthError::DuplicateUserName,
            AuthError::Forbidden,
        ];
        let mut codes: Vec<_> = all.iter().map(AuthError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
