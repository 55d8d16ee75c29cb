//! JWT access-token validation.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload.
//! They are issued by the identity service; this server only verifies them.
//! Client-role tokens carry the id of the organization the user belongs to.

use jsonwebtoken::{decode, DecodingKey, Validation};
use regwatch_core::types::DbId;
use serde::{Deserialize, Serialize};

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: DbId,
    /// The user's role name (`"admin"`, `"analyst"`, `"client"`).
    pub role: String,
    /// Organization of a client user; absent for internal staff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<DbId>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for audit.
    pub jti: String,
}

/// Configuration for JWT validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the token issuer.
    pub secret: String,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var      | Required |
    /// |--------------|----------|
    /// | `JWT_SECRET` | **yes**  |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        Self { secret }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        }
    }

    fn sign(sub: DbId, role: &str, org_id: Option<DbId>, exp_offset_secs: i64, secret: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub,
            role: role.to_string(),
            org_id,
            exp: now + exp_offset_secs,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    #[test]
    fn test_validate_access_token() {
        let config = test_config();
        let token = sign(42, "analyst", None, 900, &config.secret);

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "analyst");
        assert_eq!(claims.org_id, None);
        assert!(claims.exp > claims.iat);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_client_token_carries_organization() {
        let config = test_config();
        let token = sign(7, "client", Some(3), 900, &config.secret);
        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.org_id, Some(3));
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Well beyond the default 60-second leeway.
        let token = sign(1, "analyst", None, -300, &config.secret);

        assert!(validate_token(&token, &config).is_err(), "expired token must fail validation");
    }

    #[test]
    fn test_different_secrets_fail() {
        let token = sign(1, "analyst", None, 900, "secret-alpha");
        let config_b = JwtConfig {
            secret: "secret-bravo".to_string(),
        };

        assert!(
            validate_token(&token, &config_b).is_err(),
            "token signed with a different secret must fail"
        );
    }
}
