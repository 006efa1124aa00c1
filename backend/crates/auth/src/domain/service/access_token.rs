//! Access Token Codec
//!
//! Access tokens are HS256 JWTs carrying `sub`, `iat` and `exp`. Any
//! service holding the shared secret can validate them without calling
//! back here.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessTokenError {
    /// Wrong shape, bad signature or unreadable claims
    #[error("Invalid access token")]
    Invalid,

    #[error("Access token expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for AccessTokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Invalid,
        }
    }
}

/// Signs and verifies access tokens with one shared secret
#[derive(Clone)]
pub struct AccessTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AccessTokenCodec {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        let secret = secret.into();
        Self {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
        }
    }

    pub fn sign(&self, subject: &UserId, ttl: Duration) -> AuthResult<String> {
        self.sign_at(subject, ttl, Utc::now())
    }

    /// Sign with an explicit issue time
    pub fn sign_at(&self, subject: &UserId, ttl: Duration, now: DateTime<Utc>) -> AuthResult<String> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat,
            exp: iat.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<UserId, AccessTokenError> {
        let claims = self.decode_claims(token, true)?;
        Self::check_claims(claims, Utc::now())
    }

    /// Verify against an explicit clock; `now >= exp` is expired.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, AccessTokenError> {
        let claims = self.decode_claims(token, false)?;
        Self::check_claims(claims, now)
    }

    fn decode_claims(&self, token: &str, validate_exp: bool) -> Result<Claims, AccessTokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = validate_exp;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(decode::<Claims>(token, &self.decoding, &validation)?.claims)
    }

    fn check_claims(claims: Claims, now: DateTime<Utc>) -> Result<UserId, AccessTokenError> {
        // The library treats `exp == now` as live
        if now.timestamp() >= claims.exp {
            return Err(AccessTokenError::Expired);
        }

        claims.sub.parse().map_err(|_| AccessTokenError::Invalid)
    }
}

impl fmt::Debug for AccessTokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenCodec")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use platform::crypto::{from_base64url, to_base64url};

    const TTL: Duration = Duration::from_secs(15 * 60);

    fn codec() -> AccessTokenCodec {
        AccessTokenCodec::new(b"test-secret".to_vec())
    }

    #[test]
    fn test_sign_and_verify() {
        let user_id = UserId::new();
        let token = codec().sign(&user_id, TTL).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(codec().verify(&token), Ok(user_id));
    }

    #[test]
    fn test_claims_are_standard_jwt() {
        let user_id = UserId::new();
        let now = Utc::now();
        let token = codec().sign_at(&user_id, TTL, now).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let header: serde_json::Value =
            serde_json::from_slice(&from_base64url(parts[0]).unwrap()).unwrap();
        let claims: serde_json::Value =
            serde_json::from_slice(&from_base64url(parts[1]).unwrap()).unwrap();

        assert_eq!(header["alg"], "HS256");
        assert_eq!(header["typ"], "JWT");
        assert_eq!(claims["sub"], user_id.to_string());
        assert_eq!(claims["iat"], now.timestamp());
        assert_eq!(claims["exp"], now.timestamp() + 900);
    }

    #[test]
    fn test_expiry_boundary() {
        let user_id = UserId::new();
        let issued = Utc::now();
        let token = codec().sign_at(&user_id, TTL, issued).unwrap();

        let just_before = issued + TimeDelta::seconds(899);
        assert_eq!(codec().verify_at(&token, just_before), Ok(user_id));

        let at_expiry = issued + TimeDelta::seconds(900);
        assert_eq!(
            codec().verify_at(&token, at_expiry),
            Err(AccessTokenError::Expired)
        );
    }

    #[test]
    fn test_expired_against_wall_clock() {
        let issued = Utc::now() - TimeDelta::hours(1);
        let token = codec().sign_at(&UserId::new(), TTL, issued).unwrap();

        assert_eq!(codec().verify(&token), Err(AccessTokenError::Expired));
    }

    #[test]
    fn test_unsigned_token_is_invalid() {
        let claims = format!(
            r#"{{"sub":"{}","iat":0,"exp":99999999999}}"#,
            UserId::new()
        );
        let token = format!(
            "{}.{}.",
            to_base64url(br#"{"alg":"none","typ":"JWT"}"#),
            to_base64url(claims.as_bytes())
        );

        assert_eq!(codec().verify(&token), Err(AccessTokenError::Invalid));
    }

    #[test]
    fn test_tampered_signature_is_invalid() {
        let token = codec().sign(&UserId::new(), TTL).unwrap();
        let (signing_input, signature) = token.rsplit_once('.').unwrap();

        let mut bytes = from_base64url(signature).unwrap();
        bytes[7] ^= 0x20;
        let forged = format!("{}.{}", signing_input, to_base64url(&bytes));

        assert_eq!(codec().verify(&forged), Err(AccessTokenError::Invalid));
    }

    #[test]
    fn test_tampered_claims_are_invalid() {
        let token = codec().sign(&UserId::new(), TTL).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let other = format!(
            r#"{{"sub":"{}","iat":0,"exp":99999999999}}"#,
            UserId::new()
        );
        let forged = format!("{}.{}.{}", parts[0], to_base64url(other.as_bytes()), parts[2]);

        assert_eq!(codec().verify(&forged), Err(AccessTokenError::Invalid));
    }

    #[test]
    fn test_other_secret_is_invalid() {
        let token = codec().sign(&UserId::new(), TTL).unwrap();
        let other = AccessTokenCodec::new(b"another-secret".to_vec());
        assert_eq!(other.verify(&token), Err(AccessTokenError::Invalid));
    }

    #[test]
    fn test_malformed_tokens() {
        for token in ["", "abc", "a.b", "a.b.c.d", "...", "not a token at all"] {
            assert_eq!(codec().verify(token), Err(AccessTokenError::Invalid), "{token}");
        }
    }

    #[test]
    fn test_debug_hides_secret() {
        assert!(!format!("{:?}", codec()).contains("test-secret"));
    }
}
