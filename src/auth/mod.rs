//! Authentication - password hashing and the stateless JWT session pair.
//!
//! Passwords are stored as Argon2id hashes in PHC string format with the
//! salt embedded. Sessions are two signed tokens: a short-lived access
//! token presented on every API call and a longer-lived refresh token that
//! mints replacement access tokens. Each token carries which of the two
//! kinds it is, so one kind can never stand in for the other.

use crate::{
    config::AppConfig,
    core::users,
    errors::{Error, Result},
};
use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

/// The two kinds of token this service issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    /// Message returned when a token of this kind fails verification.
    const fn rejection_reason(self) -> &'static str {
        match self {
            Self::Access => "Given token not valid for any token type",
            Self::Refresh => "Token is invalid or expired",
        }
    }

    const fn lifetime_minutes(self, config: &AppConfig) -> i64 {
        match self {
            Self::Access => config.access_token_minutes,
            Self::Refresh => config.refresh_token_minutes,
        }
    }
}

/// Claims carried by every token this service signs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Id of the authenticated user.
    pub sub: i64,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
    /// Issue time as a Unix timestamp.
    pub iat: i64,
    pub token_type: TokenType,
}

/// Fresh refresh/access pair returned by a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

/// Hashes a password for storage.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| Error::PasswordHash {
            message: err.to_string(),
        })?;
    Ok(hash.to_string())
}

/// Checks a password against a stored hash.
///
/// A mismatch is `Ok(false)`; only a malformed hash or a hashing failure
/// is an error.
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|err| Error::PasswordHash {
        message: err.to_string(),
    })?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(Error::PasswordHash {
            message: err.to_string(),
        }),
    }
}

/// Verifies credentials and issues a fresh token pair.
pub async fn login(
    db: &DatabaseConnection,
    config: &AppConfig,
    username: &str,
    password: &str,
) -> Result<TokenPair> {
    let user = users::get_user_by_username(db, username)
        .await?
        .ok_or(Error::InvalidCredentials)?;
    if !verify_password(password, &user.password_hash)? {
        return Err(Error::InvalidCredentials);
    }
    issue_pair(config, user.id)
}

/// Issues a refresh/access pair for a user.
pub fn issue_pair(config: &AppConfig, user_id: i64) -> Result<TokenPair> {
    Ok(TokenPair {
        refresh: sign(config, user_id, TokenType::Refresh)?,
        access: sign(config, user_id, TokenType::Access)?,
    })
}

/// Trades a valid refresh token for a new access token.
pub fn refresh_access(config: &AppConfig, refresh_token: &str) -> Result<String> {
    let claims = verify_token(config, refresh_token, TokenType::Refresh)?;
    sign(config, claims.sub, TokenType::Access)
}

/// Decodes a token and checks it is of the expected kind.
///
/// Every failure mode, bad signature, expiry or a token of the other
/// kind, collapses into the same per-kind rejection so callers cannot
/// probe which check failed.
pub fn verify_token(config: &AppConfig, token: &str, expected: TokenType) -> Result<Claims> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    // No clock drift allowance; expiry is exact.
    validation.leeway = 0;

    let rejection = || Error::AuthenticationRequired {
        reason: expected.rejection_reason().to_string(),
    };
    let data =
        jsonwebtoken::decode::<Claims>(token, &key, &validation).map_err(|_| rejection())?;
    if data.claims.token_type != expected {
        return Err(rejection());
    }
    Ok(data.claims)
}

fn sign(config: &AppConfig, user_id: i64, token_type: TokenType) -> Result<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        exp: now + token_type.lifetime_minutes(config) * 60,
        iat: now,
        token_type,
    };
    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key).map_err(Into::into)
}
