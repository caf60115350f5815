//! Authentication configuration.
//!
//! SocialHub validates bearer tokens issued by the surrounding identity
//! service; only the shared secret and lifetime live here.

use serde::{Deserialize, Serialize};

/// JWT validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret shared with the token issuer.
    pub jwt_secret: String,
    /// Access token lifetime in seconds (used when issuing test tokens).
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_seconds: u64,
}

fn default_access_ttl() -> u64 {
    3600
}
