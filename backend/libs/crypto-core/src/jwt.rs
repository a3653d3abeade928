//! JWT handling for the asset upload API
//!
//! Tokens are HS256-signed with a shared secret and carry the user id in `sub`.
//! Validation also pins the issuer, so tokens minted for another purpose
//! (e.g. refresh tokens under a different issuer) are rejected.
//!
//! ## Usage
//!
//! ```rust
//! use crypto_core::jwt::{self, JwtValidator};
//! use uuid::Uuid;
//!
//! let validator = JwtValidator::new("secret", jwt::DEFAULT_ISSUER).unwrap();
//! let user_id = Uuid::new_v4();
//! let token = jwt::make_token(user_id, "secret", jwt::DEFAULT_ISSUER, chrono::Duration::hours(1)).unwrap();
//! assert_eq!(validator.validate(&token).unwrap(), user_id);
//! ```

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

/// Issuer stamped on access tokens
pub const DEFAULT_ISSUER: &str = "tubely-access";

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

const BEARER_PREFIX: &str = "Bearer ";

// ============================================================================
// Data Structures
// ============================================================================

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum JwtError {
    #[error("authorization header is missing")]
    MissingAuthorization,

    #[error("authorization header is not a bearer token")]
    InvalidScheme,

    #[error("JWT secret must not be empty")]
    EmptySecret,

    #[error("token has expired")]
    Expired,

    #[error("token is invalid: {0}")]
    Invalid(String),

    #[error("token subject is not a valid user id: {0}")]
    InvalidSubject(String),

    #[error("failed to sign token: {0}")]
    Encode(String),
}

// ============================================================================
// Header parsing
// ============================================================================

/// Extract the token from an `Authorization` header value.
///
/// Expects `Bearer <token>`; surrounding whitespace around the token is
/// ignored and an empty token is rejected.
pub fn get_bearer_token(authorization: Option<&str>) -> Result<&str, JwtError> {
    let value = authorization.ok_or(JwtError::MissingAuthorization)?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(JwtError::InvalidScheme)?
        .trim();

    if token.is_empty() {
        return Err(JwtError::InvalidScheme);
    }

    Ok(token)
}

// ============================================================================
// Validation
// ============================================================================

/// Validates access tokens against a shared signing secret.
///
/// Built once at startup and shared through application state.
#[derive(Clone)]
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(secret: &str, issuer: &str) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::EmptySecret);
        }

        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Validate a token and return the user id it was issued for
    pub fn validate(&self, token: &str) -> Result<Uuid, JwtError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            }
        })?;

        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| JwtError::InvalidSubject(data.claims.sub.clone()))
    }
}

// ============================================================================
// Token Generation
// ============================================================================

/// Sign an access token for `user_id`.
///
/// The service itself only validates tokens; this exists for the login side
/// of the system and for tests.
pub fn make_token(
    user_id: Uuid,
    secret: &str,
    issuer: &str,
    expires_in: Duration,
) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::EmptySecret);
    }

    let now = Utc::now();
    let claims = Claims {
        iss: issuer.to_string(),
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + expires_in).timestamp(),
    };

    encode(
        &Header::new(JWT_ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::Encode(e.to_string()))
}
