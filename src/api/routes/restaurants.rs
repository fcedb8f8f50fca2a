//! Restaurant endpoints.
//!
//! Single-record access is owner-only even for readers: holding
//! `view_restaurant` opens the listing, but retrieving, renaming or
//! deleting a specific restaurant additionally requires owning it. No
//! capability bypasses that check, the admin role included.

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
        restaurants,
    },
    entities::{Restaurant, User, restaurant, user},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const SEARCH: &[restaurant::Column] = &[restaurant::Column::Name];
const SORTABLE: &[(&str, restaurant::Column)] = &[
    ("id", restaurant::Column::Id),
    ("name", restaurant::Column::Name),
];

#[derive(Debug, Deserialize)]
pub struct RestaurantRequest {
    pub name: String,
}

/// Restaurant as served over the wire; `owner` is the owning username.
#[derive(Debug, Serialize)]
pub struct RestaurantBody {
    pub id: i64,
    pub name: String,
    pub owner: String,
}

impl RestaurantBody {
    fn new(model: restaurant::Model, owner: String) -> Self {
        Self {
            id: model.id,
            name: model.name,
            owner,
        }
    }
}

/// Maps the owners of `rows` onto their usernames in one query.
async fn owner_usernames<C>(db: &C, rows: &[restaurant::Model]) -> Result<HashMap<i64, String>>
where
    C: ConnectionTrait,
{
    let ids: HashSet<i64> = rows.iter().map(|row| row.owner_id).collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let owners = User::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(owners
        .into_iter()
        .map(|owner| (owner.id, owner.username))
        .collect())
}

/// `GET /restaurant/`
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<RestaurantBody>>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::List, Subject::Restaurant),
    )
    .await?;

    let page = listing::run_listing(
        &state.db,
        Restaurant::find(),
        &params,
        SEARCH,
        SORTABLE,
        (restaurant::Column::Id, Order::Desc),
    )
    .await?;

    let owners = owner_usernames(&state.db, &page.rows).await?;
    Ok(Json(ListResponse::from_page(page, |model| {
        let owner = owners.get(&model.owner_id).cloned().unwrap_or_default();
        RestaurantBody::new(model, owner)
    })))
}

/// `POST /restaurant/`
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(body): ValidatedJson<RestaurantRequest>,
) -> Result<(StatusCode, Json<RestaurantBody>)> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::Add, Subject::Restaurant),
    )
    .await?;

    let restaurant = restaurants::create_restaurant(&state.db, caller.id, &body.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(RestaurantBody::new(restaurant, caller.username)),
    ))
}

/// `GET /restaurant/:id/`
pub async fn retrieve(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(restaurant_id): Path<i64>,
) -> Result<Json<RestaurantBody>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::View, Subject::Restaurant),
    )
    .await?;

    let restaurant = restaurants::get_restaurant(&state.db, restaurant_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "restaurant",
        })?;
    authorize::require_record_restaurant_owner(&restaurant, caller.id)?;

    // The ownership check just proved the caller is the owner
    Ok(Json(RestaurantBody::new(restaurant, caller.username)))
}

/// `PUT /restaurant/:id/`
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(restaurant_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<RestaurantRequest>,
) -> Result<Json<RestaurantBody>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::Change, Subject::Restaurant),
    )
    .await?;

    let restaurant = restaurants::get_restaurant(&state.db, restaurant_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "restaurant",
        })?;
    authorize::require_record_restaurant_owner(&restaurant, caller.id)?;

    let restaurant = restaurants::update_restaurant(&state.db, restaurant_id, &body.name).await?;
    Ok(Json(RestaurantBody::new(restaurant, caller.username)))
}

/// `DELETE /restaurant/:id/`
pub async fn destroy(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(restaurant_id): Path<i64>,
) -> Result<StatusCode> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::Delete, Subject::Restaurant),
    )
    .await?;

    let restaurant = restaurants::get_restaurant(&state.db, restaurant_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "restaurant",
        })?;
    authorize::require_record_restaurant_owner(&restaurant, caller.id)?;

    restaurants::delete_restaurant(&state.db, restaurant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
