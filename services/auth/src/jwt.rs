//! JWT service for bearer token generation and validation
//!
//! Tokens are signed with HS256 using a server-held secret. Validation only
//! accepts HS256, so a token whose header names any other algorithm is
//! rejected before its signature is considered.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default token lifetime: 72 hours
pub const DEFAULT_TOKEN_EXPIRY: u64 = 72 * 60 * 60;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC signing secret
    pub secret: String,
    /// Token expiration time in seconds
    pub expiry_seconds: u64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[redacted]")
            .field("expiry_seconds", &self.expiry_seconds)
            .finish()
    }
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: HMAC signing secret (required)
    /// - `JWT_EXPIRY_SECONDS`: Token expiry in seconds (default: 259200)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        let expiry_seconds = std::env::var("JWT_EXPIRY_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_EXPIRY);

        Ok(JwtConfig {
            secret,
            expiry_seconds,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Not valid before
    pub nbf: u64,
    /// Expiration time
    pub exp: u64,
}

/// A freshly signed token together with its claims
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry_seconds: u64,
}

fn now() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
        .as_secs())
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self> {
        if config.secret.is_empty() {
            anyhow::bail!("JWT secret must not be empty");
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

        Ok(JwtService {
            encoding_key,
            decoding_key,
            validation,
            expiry_seconds: config.expiry_seconds,
        })
    }

    /// Generate a bearer token for a user
    pub fn generate_token(&self, user_id: Uuid) -> Result<IssuedToken> {
        self.generate_token_at(user_id, now()?)
    }

    pub(crate) fn generate_token_at(&self, user_id: Uuid, issued_at: u64) -> Result<IssuedToken> {
        let exp = issued_at
            .checked_add(self.expiry_seconds)
            .ok_or_else(|| anyhow::anyhow!("Token expiry of {}s overflows", self.expiry_seconds))?;

        let claims = Claims {
            sub: user_id,
            iat: issued_at,
            nbf: issued_at,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(IssuedToken { token, claims })
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Get the token expiry time in seconds
    pub fn expiry_seconds(&self) -> u64 {
        self.expiry_seconds
    }
}
