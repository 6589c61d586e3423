//! Session tokens signed with HS256.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use yatube_core::ports::{AuthError, TokenClaims, TokenService};

/// Placeholder secret used when none is configured.
pub const DEFAULT_SECRET: &str = "change-me-in-production";

/// Signing settings for session tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "yatube".to_string(),
        }
    }
}

/// What actually goes over the wire. `sub` holds the user id.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    username: String,
    iss: String,
    iat: i64,
    exp: i64,
}

impl SessionClaims {
    fn issue(user_id: i64, username: &str, issuer: &str, now: DateTime<Utc>, ttl: TimeDelta) -> Self {
        Self {
            sub: user_id.to_string(),
            username: username.to_string(),
            iss: issuer.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

impl TryFrom<SessionClaims> for TokenClaims {
    type Error = AuthError;

    fn try_from(claims: SessionClaims) -> Result<Self, Self::Error> {
        let user_id = claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken(format!("bad subject '{}'", claims.sub)))?;

        Ok(TokenClaims {
            user_id,
            username: claims.username,
            exp: claims.exp,
        })
    }
}

/// Signs and checks the session tokens stored in the login cookie.
pub struct JwtTokenService {
    keys: (EncodingKey, DecodingKey),
    validation: Validation,
    issuer: String,
    ttl: TimeDelta,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        if config.secret == DEFAULT_SECRET {
            tracing::warn!("JWT_SECRET is not set; sessions are signed with the built-in secret");
        }

        let secret = config.secret.as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            keys: (EncodingKey::from_secret(secret), DecodingKey::from_secret(secret)),
            validation,
            issuer: config.issuer,
            ttl: TimeDelta::hours(config.expiration_hours),
        }
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user_id: i64, username: &str) -> Result<String, AuthError> {
        let claims = SessionClaims::issue(user_id, username, &self.issuer, Utc::now(), self.ttl);

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.0)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = decode::<SessionClaims>(token, &self.keys.1, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            },
        )?;

        TokenClaims::try_from(data.claims)
    }

    fn expiration_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str, issuer: &str, hours: i64) -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: secret.to_string(),
            expiration_hours: hours,
            issuer: issuer.to_string(),
        })
    }

    #[test]
    fn test_token_carries_user() {
        let tokens = service("test-secret-key", "yatube", 1);

        let claims = tokens
            .validate_token(&tokens.generate_token(42, "TestUser").unwrap())
            .unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.username, "TestUser");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let tokens = service("test-secret-key", "yatube", 1);
        assert!(matches!(
            tokens.validate_token("invalid-token"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_foreign_tokens_are_rejected() {
        let token = service("test-secret-key", "yatube", 1)
            .generate_token(1, "auth")
            .unwrap();

        for other in [
            service("test-secret-key", "someone-else", 1),
            service("another-secret", "yatube", 1),
        ] {
            assert!(other.validate_token(&token).is_err());
        }
    }

    #[test]
    fn test_expired_token() {
        // An hour in the past is well beyond the default leeway.
        let tokens = service("test-secret-key", "yatube", -1);
        let token = tokens.generate_token(1, "auth").unwrap();

        assert!(matches!(
            tokens.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_non_numeric_subject_is_rejected() {
        let claims = SessionClaims {
            sub: "not-a-number".to_string(),
            username: "auth".to_string(),
            iss: "yatube".to_string(),
            iat: 0,
            exp: 0,
        };
        assert!(TokenClaims::try_from(claims).is_err());
    }

    #[test]
    fn test_expiration_seconds() {
        assert_eq!(service("s", "yatube", 24).expiration_seconds(), 86_400);
    }
}
