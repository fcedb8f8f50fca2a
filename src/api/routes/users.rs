//! User endpoints: registration, directory listing and profile admin.
//!
//! Registration is not self-service. It sits behind `add_user`, which only
//! the admin role holds, so accounts are provisioned rather than signed up.

use crate::{
    api::{
        AppState,
        extract::{CurrentUser, ValidatedJson},
        routes::ListResponse,
    },
    core::{
        authorize,
        capabilities::{Action, Subject, capability},
        listing::{self, ListParams},
        users::{self, NewUser, UserChanges},
    },
    entities::{User, user},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::{EntityTrait, Order};
use serde::Serialize;

const SEARCH: &[user::Column] = &[
    user::Column::FirstName,
    user::Column::LastName,
    user::Column::Email,
];
const SORTABLE: &[(&str, user::Column)] = &[
    ("id", user::Column::Id),
    ("first_name", user::Column::FirstName),
    ("last_name", user::Column::LastName),
    ("email", user::Column::Email),
];

/// Profile as served over the wire. The password hash never leaves the
/// database layer.
#[derive(Debug, Serialize)]
pub struct UserBody {
    pub id: i64,
    pub role: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<user::Model> for UserBody {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            role: model.role_id,
            email: model.email,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
        }
    }
}

/// `POST /users/register/`
pub async fn register(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(body): ValidatedJson<NewUser>,
) -> Result<(StatusCode, Json<UserBody>)> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::Add, Subject::User),
    )
    .await?;

    let user = users::register_user(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `GET /users/`
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<UserBody>>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::List, Subject::User),
    )
    .await?;

    let page = listing::run_listing(
        &state.db,
        User::find(),
        &params,
        SEARCH,
        SORTABLE,
        (user::Column::Id, Order::Asc),
    )
    .await?;
    Ok(Json(ListResponse::from_page(page, UserBody::from)))
}

/// `GET /users/:id/`
pub async fn retrieve(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(user_id): Path<i64>,
) -> Result<Json<UserBody>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::View, Subject::User),
    )
    .await?;

    let user = users::get_user(&state.db, user_id)
        .await?
        .ok_or(Error::NotFound { entity: "user" })?;
    Ok(Json(user.into()))
}

/// `PUT /users/:id/`
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(user_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<UserChanges>,
) -> Result<Json<UserBody>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::Change, Subject::User),
    )
    .await?;

    let user = users::update_user(&state.db, user_id, body).await?;
    Ok(Json(user.into()))
}

/// `DELETE /users/:id/`
pub async fn destroy(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(user_id): Path<i64>,
) -> Result<StatusCode> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::Delete, Subject::User),
    )
    .await?;

    users::delete_user(&state.db, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
