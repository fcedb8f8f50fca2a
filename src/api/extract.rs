//! Request extractors - authentication and validated JSON bodies.
//!
//! `CurrentUser` resolves the caller from the `Authorization` header and is
//! the only place bearer tokens are inspected. `ValidatedJson` mirrors
//! `axum::Json` but renders deserialization failures as the API's standard
//! validation error body instead of a plain text response.

use crate::{
    api::AppState,
    auth::{self, TokenType},
    core::users,
    entities::user,
    errors::{Error, Result},
};
use axum::{
    Json, async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts},
};

const MISSING_CREDENTIALS: &str = "Authentication credentials were not provided.";

/// The authenticated caller, resolved from a bearer access token.
pub struct CurrentUser(pub user::Model);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let missing = || Error::AuthenticationRequired {
            reason: MISSING_CREDENTIALS.to_string(),
        };

        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(missing)?;
        // Any scheme other than Bearer is treated as no credentials at all.
        let token = header.strip_prefix("Bearer ").ok_or_else(missing)?;

        let claims = auth::verify_token(&state.config, token, TokenType::Access)?;
        let user = users::get_user(&state.db, claims.sub)
            .await?
            .ok_or_else(|| Error::AuthenticationRequired {
                reason: "User not found".to_string(),
            })?;
        Ok(Self(user))
    }
}

/// JSON body extractor whose rejection is a 400 validation error.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| Error::Validation {
                message: rejection.body_text(),
            })?;
        Ok(Self(value))
    }
}
