//! Login and token refresh endpoints. Neither requires authentication.

use crate::{
    api::{AppState, extract::ValidatedJson},
    auth::{self, TokenPair},
    errors::Result,
};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Body returned by a successful token refresh.
#[derive(Debug, Serialize)]
pub struct AccessBody {
    pub access: String,
}

/// `POST /auth/login/`
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenPair>> {
    let pair = auth::login(&state.db, &state.config, &body.username, &body.password).await?;
    Ok(Json(pair))
}

/// `POST /auth/token/refresh`
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RefreshRequest>,
) -> Result<Json<AccessBody>> {
    let access = auth::refresh_access(&state.config, &body.refresh)?;
    Ok(Json(AccessBody { access }))
}
