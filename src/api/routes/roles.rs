//! Role endpoints. Roles are administrator territory: the seeded grants
//! give only the admin role any of the role capabilities.

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
        roles,
    },
    entities::{Role, role},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::{EntityTrait, Order};
use serde::{Deserialize, Serialize};

const SEARCH: &[role::Column] = &[role::Column::Name];
const SORTABLE: &[(&str, role::Column)] = &[
    ("id", role::Column::Id),
    ("name", role::Column::Name),
];

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct RoleBody {
    pub id: i64,
    pub name: String,
}

impl From<role::Model> for RoleBody {
    fn from(model: role::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// `GET /roles/`
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<RoleBody>>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::List, Subject::Role),
    )
    .await?;

    let page = listing::run_listing(
        &state.db,
        Role::find(),
        &params,
        SEARCH,
        SORTABLE,
        (role::Column::Id, Order::Asc),
    )
    .await?;
    Ok(Json(ListResponse::from_page(page, RoleBody::from)))
}

/// `POST /roles/`
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(body): ValidatedJson<RoleRequest>,
) -> Result<(StatusCode, Json<RoleBody>)> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::Add, Subject::Role),
    )
    .await?;

    let role = roles::create_role(&state.db, &body.name).await?;
    Ok((StatusCode::CREATED, Json(role.into())))
}

/// `GET /roles/:id/`
pub async fn retrieve(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(role_id): Path<i64>,
) -> Result<Json<RoleBody>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::View, Subject::Role),
    )
    .await?;

    let role = roles::get_role(&state.db, role_id)
        .await?
        .ok_or(Error::NotFound { entity: "role" })?;
    Ok(Json(role.into()))
}

/// `PUT /roles/:id/`
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(role_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<RoleRequest>,
) -> Result<Json<RoleBody>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::Change, Subject::Role),
    )
    .await?;

    let role = roles::update_role(&state.db, role_id, &body.name).await?;
    Ok(Json(role.into()))
}

/// `DELETE /roles/:id/`
pub async fn destroy(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(role_id): Path<i64>,
) -> Result<StatusCode> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::Delete, Subject::Role),
    )
    .await?;

    roles::delete_role(&state.db, role_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
