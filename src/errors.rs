//! Unified error types and result handling.
//!
//! Every failure the business rules can produce is a variant here, and the
//! [`IntoResponse`] impl is the single place where variants are rendered as
//! HTTP status codes and JSON bodies. Nothing in this crate panics on a
//! request path; errors bubble up with `?` and are rendered at the boundary.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No usable credentials on the request, or the token failed to verify.
    #[error("authentication required: {reason}")]
    AuthenticationRequired { reason: String },

    /// Login attempt with an unknown username or a wrong password.
    #[error("invalid login credentials")]
    InvalidCredentials,

    /// The caller's groups do not grant the capability for this operation.
    #[error("missing capability: {capability}")]
    MissingCapability { capability: &'static str },

    /// The caller may not act on this particular record, typically because
    /// they do not own it. Rendered with the same body as
    /// [`Error::MissingCapability`].
    #[error("permission denied for this record")]
    ObjectPermissionDenied,

    /// The caller holds the capability but does not own the restaurant named
    /// in the request payload. Rendered distinctly from
    /// [`Error::MissingCapability`].
    #[error("caller does not own the target restaurant")]
    NotOwner,

    #[error("validation failed: {message}")]
    Validation { message: String },

    /// A menu for this restaurant already exists in today's day bucket.
    #[error("menu already published today")]
    DuplicateMenu,

    /// The vote targets a menu whose day bucket is not today's.
    #[error("menu was not published today")]
    NotTodaysMenu,

    /// The caller already has a vote in today's day bucket.
    #[error("already voted today")]
    AlreadyVoted,

    /// Delete rejected because dependent rows still reference the record.
    #[error("{entity} is still referenced by other records")]
    InUse { entity: &'static str },

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// No votes in today's day bucket. A normal empty-result signal for the
    /// winner endpoint rather than a fault.
    #[error("no votes have been cast today")]
    NoVotes,

    /// A role exists without its mirrored permission group. The mirror is
    /// maintained transactionally, so this indicates outside interference
    /// with the store.
    #[error("no permission group mirrors role {role}")]
    MissingGroupMirror { role: String },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("password hashing error: {message}")]
    PasswordHash { message: String },

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Error::AuthenticationRequired { reason } => {
                (StatusCode::UNAUTHORIZED, json!({ "detail": reason }))
            }
            Error::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "detail": "No active account found with the given credentials" }),
            ),
            Error::MissingCapability { .. } | Error::ObjectPermissionDenied => (
                StatusCode::FORBIDDEN,
                json!({ "detail": "You do not have permission to perform this action." }),
            ),
            Error::NotOwner => (
                StatusCode::FORBIDDEN,
                json!({ "error": "Permission denied" }),
            ),
            Error::Validation { message } => (
                StatusCode::BAD_REQUEST,
                json!({ "validation_error": message }),
            ),
            Error::DuplicateMenu => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Cannot upload more than one menu" }),
            ),
            Error::NotTodaysMenu => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Please select today's menu" }),
            ),
            Error::AlreadyVoted => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Already voted" }),
            ),
            Error::InUse { entity } => (
                StatusCode::BAD_REQUEST,
                json!({ "message": format!("Cannot delete {entity}: still referenced by other records") }),
            ),
            Error::NotFound { .. } => (StatusCode::NOT_FOUND, json!({ "detail": "Not found." })),
            Error::NoVotes => (StatusCode::NOT_FOUND, json!({ "message": "No votes" })),
            Error::MissingGroupMirror { .. }
            | Error::Config { .. }
            | Error::PasswordHash { .. }
            | Error::Token(_)
            | Error::Database(_)
            | Error::Io(_) => {
                tracing::error!(error = %self, "internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
