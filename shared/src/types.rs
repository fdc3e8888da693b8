//! API request and response types
//!
//! Payloads use camelCase on the wire to match the browser client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AckResponse {
    pub ok: bool,
}

// ============================================================================
// Authentication Types
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 4, max = 32, message = "User name must be 4-32 characters"))]
    pub user_name: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "User name is required"))]
    pub user_name: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Identity returned after register/login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub user_name: String,
}

/// Decoded session claim returned by `/profile`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionProfile {
    pub id: Uuid,
    pub user_name: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

// ============================================================================
// Post Types
// ============================================================================

/// Post author as embedded in post responses
pub type AuthorSummary = UserSummary;

/// Post response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub content: String,
    /// Relative path of the cover image, e.g. `uploads/<id>.png`
    pub cover: Option<String>,
    pub author: AuthorSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Text fields of a new post (the cover arrives as a separate multipart part)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 500, message = "Summary must be 1-500 characters"))]
    pub summary: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

/// Text fields of a post update; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 500, message = "Summary must be 1-500 characters"))]
    pub summary: Option<String>,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,
}

/// Post listing query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostListQuery {
    /// Maximum number of posts to return (default: 20, max: 100)
    #[serde(default)]
    pub limit: Option<i64>,
    /// Number of posts to skip (default: 0)
    #[serde(default)]
    pub offset: Option<i64>,
}

impl PostListQuery {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    /// Resolve `(limit, offset)` with defaults applied and bounds clamped
    pub fn normalize(&self) -> (i64, i64) {
        let limit = self
            .limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_user_summary_uses_camel_case() {
        let summary = UserSummary {
            id: Uuid::nil(),
            user_name: "alice".to_string(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["userName"], "alice");
        assert!(json.get("user_name").is_none());
    }

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            user_name: "alice".to_string(),
            password: "correct horse".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short = RegisterRequest {
            user_name: "al".to_string(),
            password: "pw".to_string(),
        };
        let errors = short.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("user_name"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_update_request_allows_absent_fields() {
        let update = UpdatePostRequest::default();
        assert!(update.validate().is_ok());

        let empty_title = UpdatePostRequest {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(empty_title.validate().is_err());
    }

    #[rstest]
    #[case(None, None, (20, 0))]
    #[case(Some(5), Some(10), (5, 10))]
    #[case(Some(0), Some(-3), (1, 0))]
    #[case(Some(1000), None, (100, 0))]
    fn test_post_list_query_normalize(
        #[case] limit: Option<i64>,
        #[case] offset: Option<i64>,
        #[case] expected: (i64, i64),
    ) {
        let query = PostListQuery { limit, offset };
        assert_eq!(query.normalize(), expected);
    }
}
