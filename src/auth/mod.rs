pub mod password;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

/// Token payload. `sub` is the user's email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    pub fn new(subject: impl Into<String>, expiry_hours: Option<u64>) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = match expiry_hours {
            Some(hours) => Some(
                expires_at(now, hours)
                    .ok_or_else(|| {
                        JwtError::TokenGeneration(format!("token expiry of {} hours is out of range", hours))
                    })?
                    .timestamp(),
            ),
            None => None,
        };

        Ok(Self {
            sub: subject.into(),
            iat: now.timestamp(),
            exp,
        })
    }
}

/// `None` when `hours` does not fit a chrono timestamp
fn expires_at(now: DateTime<Utc>, hours: u64) -> Option<DateTime<Utc>> {
    let hours = i64::try_from(hours).ok()?;
    now.checked_add_signed(TimeDelta::try_hours(hours)?)
}

/// Authenticated caller, resolved from a verified bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { email: claims.sub }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
}

/// Signing and verification keys derived once from the configured secret
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiry_hours: Option<u64>,
}

impl TokenKeys {
    pub fn new(secret: &str, expiry_hours: Option<u64>) -> Self {
        let mut validation = Validation::default();
        validation.required_spec_claims.clear();
        validation.validate_exp = expiry_hours.is_some();
        if validation.validate_exp {
            validation.required_spec_claims.insert("exp".to_string());
        }
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry_hours,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(&security.jwt_secret, security.jwt_expiry_hours)
    }

    /// Issue an HS256 access token asserting `subject`
    pub fn issue(&self, subject: &str) -> Result<String, JwtError> {
        let claims = Claims::new(subject, self.expiry_hours)?;
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Verify the signature (and expiry, when enabled) and return the claims
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_resolves_to_subject() {
        let keys = TokenKeys::new("secret", None);
        let token = keys.issue("a@x.com").unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, "a@x.com");
        assert!(claims.exp.is_none());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = TokenKeys::new("one", None).issue("a@x.com").unwrap();
        assert!(TokenKeys::new("two", None).verify(&token).is_err());
    }

    #[test]
    fn rejects_malformed_token() {
        let keys = TokenKeys::new("secret", None);
        assert!(keys.verify("not-a-token").is_err());
        assert!(keys.verify("").is_err());
    }

    #[test]
    fn expiring_tokens_carry_exp() {
        let keys = TokenKeys::new("secret", Some(2));
        let claims = keys.verify(&keys.issue("a@x.com").unwrap()).unwrap();
        let exp = claims.exp.unwrap();
        assert!(exp > claims.iat);
        assert!(exp <= claims.iat + 2 * 3600);
    }

    #[test]
    fn expiring_keys_reject_tokens_without_exp() {
        let unbounded = TokenKeys::new("secret", None).issue("a@x.com").unwrap();
        assert!(TokenKeys::new("secret", Some(1)).verify(&unbounded).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let keys = TokenKeys::new("secret", Some(1));
        let claims = Claims {
            sub: "a@x.com".to_string(),
            iat: Utc::now().timestamp() - 7200,
            exp: Some(Utc::now().timestamp() - 3600),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"secret")).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn out_of_range_expiry_is_a_generation_error() {
        for hours in [10_000_000_000, u64::MAX] {
            let err = TokenKeys::new("secret", Some(hours)).issue("a@x.com").unwrap_err();
            assert!(matches!(err, JwtError::TokenGeneration(_)), "{} hours", hours);
        }
    }
}
