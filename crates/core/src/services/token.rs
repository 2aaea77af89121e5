//! JWT verification and issuance.
//!
//! Tokens are HS256-signed. The `sub` claim carries the user ID as a decimal
//! string and `type` tells access tokens from refresh tokens; only access
//! tokens authenticate API requests.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use likeboard_common::{AppError, AppResult, config::JwtConfig};
use serde::{Deserialize, Serialize};

/// Kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: String,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

/// Verified identity of the user making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: i32,
}

/// Token service.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenService {
    /// Create a new token service.
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_ttl_secs: config.access_token_ttl_secs,
            refresh_ttl_secs: config.refresh_token_ttl_secs,
        }
    }

    /// Issue an access token for a user.
    pub fn issue_access(&self, user_id: i32) -> AppResult<String> {
        self.issue(user_id, TokenType::Access, self.access_ttl_secs)
    }

    /// Issue a refresh token for a user.
    pub fn issue_refresh(&self, user_id: i32) -> AppResult<String> {
        self.issue(user_id, TokenType::Refresh, self.refresh_ttl_secs)
    }

    fn issue(&self, user_id: i32, token_type: TokenType, ttl_secs: i64) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + ttl_secs,
            token_type,
        };
        self.encode(&claims)
    }

    /// Sign arbitrary claims.
    pub fn encode(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Decode and validate a token of any type.
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected token");
                AppError::Unauthorized
            })
    }

    /// Verify an access token and return the caller it identifies.
    pub fn verify_access(&self, token: &str) -> AppResult<CallerIdentity> {
        let claims = self.decode(token)?;

        if claims.token_type != TokenType::Access {
            tracing::debug!(token_type = ?claims.token_type, "Rejected non-access token");
            return Err(AppError::Unauthorized);
        }

        let user_id = claims.sub.parse::<i32>().map_err(|_| {
            tracing::debug!(sub = %claims.sub, "Rejected token with non-numeric subject");
            AppError::Unauthorized
        })?;

        Ok(CallerIdentity { user_id })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_ttl_secs: 3600,
            refresh_token_ttl_secs: 2_592_000,
            leeway_secs: 0,
        }
    }

    fn service() -> TokenService {
        TokenService::new(&test_config("test-secret-0123456789"))
    }

    #[test]
    fn test_access_token_identifies_user() {
        let service = service();
        let token = service.issue_access(7).unwrap();

        let caller = service.verify_access(&token).unwrap();
        assert_eq!(caller.user_id, 7);
    }

    #[test]
    fn test_refresh_token_is_not_accepted_as_access() {
        let service = service();
        let token = service.issue_refresh(7).unwrap();

        assert_eq!(service.decode(&token).unwrap().token_type, TokenType::Refresh);
        assert!(matches!(
            service.verify_access(&token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = service();
        let now = Utc::now().timestamp();
        let token = service
            .encode(&Claims {
                sub: "7".to_string(),
                iat: now - 7200,
                exp: now - 3600,
                token_type: TokenType::Access,
            })
            .unwrap();

        assert!(service.verify_access(&token).is_err());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = TokenService::new(&test_config("another-secret-9876543210"));
        let token = other.issue_access(7).unwrap();

        assert!(service().verify_access(&token).is_err());
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let service = service();
        let now = Utc::now().timestamp();
        let token = service
            .encode(&Claims {
                sub: "alice".to_string(),
                iat: now,
                exp: now + 60,
                token_type: TokenType::Access,
            })
            .unwrap();

        assert!(service.verify_access(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(service().verify_access("not-a-jwt").is_err());
    }
}
