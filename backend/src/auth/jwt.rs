//! Session token issuance and verification
//!
//! Tokens are HS256 JWTs carrying the user id and user name. They are
//! self-contained: nothing is stored server side, so verifying a token
//! only needs the signing key held in [`TokenCodec`].

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use quill_shared::{AuthError, SessionProfile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Identity embedded in a session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub user_id: Uuid,
    pub user_name: String,
}

/// JWT claims as they appear on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// User name at the time of issue
    pub username: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn claim(&self) -> Claim {
        Claim {
            user_id: self.sub,
            user_name: self.username.clone(),
        }
    }

    pub fn into_profile(self) -> SessionProfile {
        SessionProfile {
            id: self.sub,
            user_name: self.username,
            iat: self.iat,
            exp: self.exp,
        }
    }
}

/// Pre-computed signing keys, created once at startup
#[derive(Clone)]
struct TokenKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl TokenKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Issues and verifies session tokens
///
/// Cloning is cheap; keep one in `AppState` rather than building per request.
#[derive(Clone)]
pub struct TokenCodec {
    keys: TokenKeys,
    validation: Arc<Validation>,
    expiry_secs: i64,
}

impl TokenCodec {
    pub fn new(secret: &str, expiry_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            keys: TokenKeys::new(secret),
            validation: Arc::new(validation),
            expiry_secs,
        }
    }

    /// Sign a token for `claim`, valid for the configured lifetime
    pub fn issue(&self, claim: &Claim) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expiry_secs);

        let claims = Claims {
            sub: claim.user_id,
            username: claim.user_name.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign session token: {}", e))
    }

    /// Check signature and expiry and return the embedded claims
    ///
    /// Malformed, tampered, foreign-key and expired tokens all collapse
    /// into [`AuthError::InvalidToken`].
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Session token rejected");
                AuthError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn create_test_codec() -> TokenCodec {
        TokenCodec::new("test-secret", 3600)
    }

    fn claim(name: &str) -> Claim {
        Claim {
            user_id: Uuid::new_v4(),
            user_name: name.to_string(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let codec = create_test_codec();
        let claim = claim("alice");

        let token = codec.issue(&claim).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.claim(), claim);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = create_test_codec().issue(&claim("alice")).unwrap();
        let other = TokenCodec::new("another-secret", 3600);

        assert_eq!(other.verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_garbage_rejected() {
        let codec = create_test_codec();
        for token in ["", "invalid", "invalid.token.here", "a.b.c.d"] {
            assert_eq!(codec.verify(token).unwrap_err(), AuthError::InvalidToken);
        }
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = create_test_codec();
        let token = codec.issue(&claim("alice")).unwrap();

        // Splice another user's payload under the original signature
        let forged_source = codec.issue(&claim("mallory")).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged_source.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert_eq!(codec.verify(&forged).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Well past the default 60s leeway
        let codec = TokenCodec::new("test-secret", -3600);
        let token = codec.issue(&claim("alice")).unwrap();

        assert_eq!(codec.verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_codec_is_clone_cheap() {
        let codec = create_test_codec();
        let cloned = codec.clone();
        let token = codec.issue(&claim("alice")).unwrap();
        assert!(cloned.verify(&token).is_ok());
    }

    #[test]
    fn test_profile_mirrors_claims() {
        let codec = create_test_codec();
        let claim = claim("alice");
        let claims = codec.verify(&codec.issue(&claim).unwrap()).unwrap();
        let (iat, exp) = (claims.iat, claims.exp);

        let profile = claims.into_profile();
        assert_eq!(profile.id, claim.user_id);
        assert_eq!(profile.user_name, "alice");
        assert_eq!((profile.iat, profile.exp), (iat, exp));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_round_trip(id in any::<u128>(), name in "[A-Za-z0-9_.-]{1,32}") {
            let codec = create_test_codec();
            let claim = Claim { user_id: Uuid::from_u128(id), user_name: name };

            let token = codec.issue(&claim).unwrap();
            prop_assert_eq!(codec.verify(&token).unwrap().claim(), claim);
        }

        #[test]
        fn prop_foreign_key_rejected(
            key in "[a-z]{8,32}",
            other in "[A-Z]{8,32}",
        ) {
            let claim = Claim { user_id: Uuid::new_v4(), user_name: "alice".to_string() };
            let token = TokenCodec::new(&key, 3600).issue(&claim).unwrap();

            prop_assert_eq!(
                TokenCodec::new(&other, 3600).verify(&token).unwrap_err(),
                AuthError::InvalidToken
            );
        }
    }
}
