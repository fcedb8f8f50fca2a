//! Menu endpoints, nested under `/restaurant/menu/`.
//!
//! `current-day/` is the employee-facing view: the same search, ordering
//! and pagination grammar as the full listing, applied after the day
//! filter. Menus are never deleted through the API.

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
        menus::{self, MenuInput, MenuWithItems},
        restaurants,
    },
    entities::{DayOfWeek, Menu, menu},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, Select};
use serde::Serialize;

const SEARCH: &[menu::Column] = &[menu::Column::Day];
const SORTABLE: &[(&str, menu::Column)] = &[
    ("id", menu::Column::Id),
    ("day", menu::Column::Day),
];

/// Menu as served over the wire; `food_item` holds attached item ids.
#[derive(Debug, Serialize)]
pub struct MenuBody {
    pub id: i64,
    pub day: DayOfWeek,
    pub restaurant: i64,
    pub food_item: Vec<i64>,
    pub date_time: DateTime<Utc>,
}

impl MenuBody {
    fn new(model: menu::Model, food_item: Vec<i64>) -> Self {
        Self {
            id: model.id,
            day: model.day,
            restaurant: model.restaurant_id,
            food_item,
            date_time: model.date_time,
        }
    }
}

impl From<MenuWithItems> for MenuBody {
    fn from(published: MenuWithItems) -> Self {
        Self::new(published.menu, published.food_item)
    }
}

/// Runs the listing facade over `base` and shapes rows with their
/// attachments, fetched in one batch query.
async fn listed_menus<C>(
    db: &C,
    base: Select<Menu>,
    params: &ListParams,
    default_order: (menu::Column, Order),
) -> Result<ListResponse<MenuBody>>
where
    C: ConnectionTrait,
{
    let page = listing::run_listing(db, base, params, SEARCH, SORTABLE, default_order).await?;

    let menu_ids: Vec<i64> = page.rows.iter().map(|row| row.id).collect();
    let mut attachments = menus::item_ids_for_menus(db, &menu_ids).await?;

    Ok(ListResponse::from_page(page, |model| {
        let food_item = attachments.remove(&model.id).unwrap_or_default();
        MenuBody::new(model, food_item)
    }))
}

/// `GET /restaurant/menu/`
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<MenuBody>>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::List, Subject::Menu),
    )
    .await?;

    let response = listed_menus(
        &state.db,
        Menu::find(),
        &params,
        (menu::Column::Id, Order::Desc),
    )
    .await?;
    Ok(Json(response))
}

/// `POST /restaurant/menu/`
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(body): ValidatedJson<MenuInput>,
) -> Result<(StatusCode, Json<MenuBody>)> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::Add, Subject::Menu),
    )
    .await?;

    let published = menus::publish_menu(&state.db, caller.id, body).await?;
    Ok((StatusCode::CREATED, Json(published.into())))
}

/// `GET /restaurant/menu/:id/`
pub async fn retrieve(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(menu_id): Path<i64>,
) -> Result<Json<MenuBody>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::View, Subject::Menu),
    )
    .await?;

    let menu = menus::get_menu(&state.db, menu_id)
        .await?
        .ok_or(Error::NotFound { entity: "menu" })?;
    let restaurant = restaurants::get_restaurant(&state.db, menu.restaurant_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "restaurant",
        })?;
    authorize::require_record_restaurant_owner(&restaurant, caller.id)?;

    let food_item = menus::item_ids_for_menu(&state.db, menu.id).await?;
    Ok(Json(MenuBody::new(menu, food_item)))
}

/// `PUT /restaurant/menu/:id/`
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(menu_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<MenuInput>,
) -> Result<Json<MenuBody>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::Change, Subject::Menu),
    )
    .await?;

    let updated = menus::update_menu(&state.db, caller.id, menu_id, body).await?;
    Ok(Json(updated.into()))
}

/// `GET /restaurant/menu/current-day/`
pub async fn current_day(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<MenuBody>>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::List, Subject::Menu),
    )
    .await?;

    let today = menus::day_bucket(Utc::now());
    let response = listed_menus(
        &state.db,
        Menu::find().filter(menu::Column::DayBucket.eq(today)),
        &params,
        (menu::Column::Id, Order::Asc),
    )
    .await?;
    Ok(Json(response))
}
