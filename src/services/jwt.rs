// JWT Token Service
// HS256 access tokens signed with the process-wide secret; stateless, no refresh or revocation

use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::models::auth::{TokenClaims, TokenSubject};

/// Error types for JWT operations.
///
/// `Malformed`, `BadSignature` and `Expired` all surface as 401 at the HTTP
/// boundary; they stay distinct here for logging.
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Malformed token")]
    Malformed,

    #[error("Token signature mismatch")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("JWT encoding error: {0}")]
    EncodingError(String),

    #[error("System clock error: {0}")]
    Clock(String),
}

impl JwtError {
    /// Short label used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            JwtError::Malformed => "malformed",
            JwtError::BadSignature => "bad_signature",
            JwtError::Expired => "expired",
            JwtError::EncodingError(_) => "encoding",
            JwtError::Clock(_) => "clock",
        }
    }

    /// Whether this error came out of verifying a client-supplied token
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            JwtError::Malformed | JwtError::BadSignature | JwtError::Expired
        )
    }
}

fn classify_decode_error(err: jsonwebtoken::errors::Error) -> JwtError {
    match err.kind() {
        ErrorKind::InvalidSignature => JwtError::BadSignature,
        ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Malformed,
    }
}

// JWT configuration: one signing key, fixed lifetime per issuance
#[derive(Clone)]
pub struct JwtConfig {
    pub token_expiry: u64,
    pub algorithm: Algorithm,
    pub encoding_key: EncodingKey,
    pub decoding_key: DecodingKey,
    /// Key versioning for rotation, written to the `kid` header
    pub key_version: u32,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("token_expiry", &self.token_expiry)
            .field("algorithm", &self.algorithm)
            .field("encoding_key", &"<redacted>")
            .field("decoding_key", &"<redacted>")
            .field("key_version", &self.key_version)
            .finish()
    }
}

impl JwtConfig {
    pub fn from_secret(secret: &[u8], token_expiry: u64, key_version: u32) -> Self {
        JwtConfig {
            token_expiry,
            algorithm: Algorithm::HS256,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            key_version,
        }
    }

    /// Create JWT config from the loaded app configuration
    pub fn from_app_config(config: &crate::app_config::JwtConfig) -> Self {
        Self::from_secret(config.secret.as_bytes(), config.expiry, config.key_version)
    }
}

fn unix_now() -> Result<u64, JwtError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| JwtError::Clock(e.to_string()))
}

// Token codec: the only place claims are created or decoded
pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// Lifetime of every token this service issues, in seconds
    pub fn token_expiry(&self) -> u64 {
        self.config.token_expiry
    }

    /// Issue an access token for `subject`, valid for the configured lifetime
    pub fn issue(&self, subject: TokenSubject) -> Result<String, JwtError> {
        self.issue_at(subject, unix_now()?)
    }

    /// Issue an access token as if the current time were `now`
    pub fn issue_at(&self, subject: TokenSubject, now: u64) -> Result<String, JwtError> {
        let expires_at = now
            .checked_add(self.config.token_expiry)
            .ok_or_else(|| JwtError::EncodingError("token expiry overflows".to_string()))?;
        let claims = TokenClaims::new(subject, now, expires_at);

        let mut header = Header::new(self.config.algorithm);
        header.kid = Some(self.config.key_version.to_string());

        encode(&header, &claims, &self.config.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Verify signature and expiry, returning the decoded claims
    pub fn verify(&self, token: &str) -> Result<TokenClaims, JwtError> {
        self.verify_at(token, unix_now()?)
    }

    /// Verify as if the current time were `now`.
    ///
    /// Expiry is checked here rather than by `jsonwebtoken` so that a token is
    /// rejected at exactly `exp`, with no leeway.
    pub fn verify_at(&self, token: &str, now: u64) -> Result<TokenClaims, JwtError> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = decode::<TokenClaims>(token, &self.config.decoding_key, &validation)
            .map_err(classify_decode_error)?;

        if token_data.claims.is_expired_at(now) {
            return Err(JwtError::Expired);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const SECRET: &[u8] = b"unit-test-secret-hs256-at-least-32-characters";

    fn service(expiry: u64) -> JwtService {
        JwtService::new(JwtConfig::from_secret(SECRET, expiry, 1))
    }

    fn subject() -> TokenSubject {
        TokenSubject {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            last_name: "X".to_string(),
            first_name: "Y".to_string(),
            is_admin: true,
            is_employee: false,
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let jwt = service(3600);
        let subject = subject();
        let token = jwt.issue_at(subject.clone(), 1_000).unwrap();

        let claims = jwt.verify_at(&token, 1_500).unwrap();
        assert_eq!(claims.id, subject.id);
        assert_eq!(claims.email, "a@b.com");
        assert!(claims.is_admin);
        assert_eq!(claims.iat, 1_000);
        assert_eq!(claims.exp, 4_600);
    }

    #[test]
    fn test_expired_at_and_after_exp() {
        let jwt = service(60);
        let token = jwt.issue_at(subject(), 1_000).unwrap();

        assert!(jwt.verify_at(&token, 1_059).is_ok());
        assert!(matches!(jwt.verify_at(&token, 1_060), Err(JwtError::Expired)));
        assert!(matches!(jwt.verify_at(&token, 9_999), Err(JwtError::Expired)));
    }

    #[test]
    fn test_wrong_key_is_signature_error() {
        let token = service(60).issue_at(subject(), 1_000).unwrap();
        let other = JwtService::new(JwtConfig::from_secret(
            b"a-completely-different-secret-of-32-chars!",
            60,
            1,
        ));

        assert!(matches!(
            other.verify_at(&token, 1_001),
            Err(JwtError::BadSignature)
        ));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let jwt = service(60);
        for garbage in ["", "abc", "a.b", "not.a.token", "....."] {
            let err = jwt.verify_at(garbage, 0).unwrap_err();
            assert!(matches!(err, JwtError::Malformed), "{garbage:?} gave {err:?}");
            assert!(err.is_verification_failure());
        }
    }

    #[test]
    fn test_header_carries_key_version() {
        let jwt = JwtService::new(JwtConfig::from_secret(SECRET, 60, 7));
        let token = jwt.issue_at(subject(), 1_000).unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();

        assert_eq!(header.kid.as_deref(), Some("7"));
        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn test_debug_redacts_keys() {
        let debug = format!("{:?}", JwtConfig::from_secret(SECRET, 60, 1));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let jwt = service(u64::MAX);
        let result = jwt.issue_at(subject(), 1_000);

        assert!(matches!(result, Err(JwtError::EncodingError(_))));
        assert!(!result.unwrap_err().is_verification_failure());
    }
}
