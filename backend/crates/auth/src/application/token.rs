//! Token Service
//!
//! Signs and verifies the two classes of bearer tokens. Each class has
//! its own secret and TTL; a token signed for one class never verifies
//! under the other. Verification is a pure function of token + secret +
//! clock and holds no state.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// The two token classes issued by this service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived, authorizes protected requests
    Access,
    /// Long-lived, only mints new access tokens
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Signed token payload (JWT registered claim names)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id the token is bound to
    pub sub: String,
    /// Display name
    pub name: String,
    /// Email
    pub email: String,
    /// Issued-at, Unix seconds
    pub iat: i64,
    /// Expiry, Unix seconds; always `iat + TTL(kind)`
    pub exp: i64,
}

/// Why a token was rejected. Callers collapse all three into a single
/// externally visible outcome; the distinction exists for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token has expired")]
    Expired,
    #[error("token signature mismatch")]
    InvalidSignature,
}

struct ClassKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl ClassKeys {
    fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }
}

/// HS256 signer/verifier for both token classes
pub struct TokenService {
    access: ClassKeys,
    refresh: ClassKeys,
    validation: Validation,
}

impl TokenService {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            access: ClassKeys::new(
                &config.access_token_secret,
                config.access_token_ttl_secs(),
            ),
            refresh: ClassKeys::new(
                &config.refresh_token_secret,
                config.refresh_token_ttl_secs(),
            ),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    fn keys(&self, kind: TokenKind) -> &ClassKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Sign a token for the given identity.
    ///
    /// `iat` is the current clock reading, `exp = iat + TTL(kind)`.
    pub fn issue(
        &self,
        sub: &str,
        name: &str,
        email: &str,
        kind: TokenKind,
    ) -> AuthResult<String> {
        let iat = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: sub.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            iat,
            exp: iat + self.keys(kind).ttl_secs,
        };
        self.sign_claims(&claims, kind)
    }

    /// Sign caller-supplied claims verbatim. Tests use this to fabricate
    /// tokens with arbitrary issue/expiry instants.
    pub(crate) fn sign_claims(&self, claims: &TokenClaims, kind: TokenKind) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.keys(kind).encoding).map_err(|e| {
            AuthError::Internal(format!("Failed to sign {} token: {e}", kind.as_str()))
        })
    }

    /// Verify signature and expiry against the class-bound secret.
    ///
    /// There is no partial-trust mode: any failure rejects the token.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.keys(kind).decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(map_token_error)
    }
}

fn map_token_error(error: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}
