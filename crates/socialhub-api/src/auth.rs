//! JWT issuing and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use socialhub_core::config::AuthConfig;
use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;
use socialhub_core::types::id::UserId;
use socialhub_entity::user::UserRole;
use socialhub_service::context::RequestContext;

/// Access token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's ID.
    pub sub: UserId,
    pub username: String,
    pub role: UserRole,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

impl Claims {
    pub fn into_context(self) -> RequestContext {
        RequestContext::new(self.sub, self.role, self.username)
    }
}

/// Issue an access token for a user.
pub fn issue_token(
    config: &AuthConfig,
    user_id: UserId,
    username: &str,
    role: UserRole,
) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        role,
        iat: now.timestamp(),
        exp: (now + Duration::seconds(config.access_token_ttl_seconds as i64)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::with_source(socialhub_core::ErrorKind::Internal, "Failed to sign token", e))
}

/// Validate a token and return its claims.
pub fn decode_token(config: &AuthConfig, token: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".into(),
            access_token_ttl_seconds: 3600,
        }
    }

    #[test]
    fn test_round_trip() {
        let cfg = config();
        let user_id = UserId::new();
        let token = issue_token(&cfg, user_id, "alice", UserRole::Member).unwrap();
        let claims = decode_token(&cfg, &token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, UserRole::Member);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(&config(), UserId::new(), "alice", UserRole::Member).unwrap();
        let other = AuthConfig {
            jwt_secret: "other-secret".into(),
            access_token_ttl_seconds: 3600,
        };
        let err = decode_token(&other, &token).unwrap_err();
        assert_eq!(err.kind, socialhub_core::ErrorKind::Unauthorized);
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(decode_token(&config(), "not-a-token").is_err());
    }
}
