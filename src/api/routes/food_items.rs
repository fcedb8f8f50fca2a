//! Food item endpoints, nested under `/restaurant/food-item/`.
//!
//! The collection is browsable by anyone holding `list_fooditem`, but a
//! single item can only be retrieved or edited by the owner of its
//! restaurant. There is no delete endpoint; items disappear with their
//! restaurant or live on for menu history.

use crate::{
    api::{
        AppState,
        extract::{CurrentUser, ValidatedJson},
        routes::ListResponse,
    },
    core::{
        authorize,
        capabilities::{Action, Subject, capability},
        food_items::{self, FoodItemInput},
        listing::{self, ListParams},
        restaurants,
    },
    entities::{FoodItem, FoodType, food_item},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::{EntityTrait, Order};
use serde::Serialize;

const SEARCH: &[food_item::Column] = &[food_item::Column::Name];
const SORTABLE: &[(&str, food_item::Column)] = &[
    ("id", food_item::Column::Id),
    ("name", food_item::Column::Name),
];

/// Food item as served over the wire; `restaurant` is the owning id.
#[derive(Debug, Serialize)]
pub struct FoodItemBody {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub food_type: FoodType,
    pub restaurant: i64,
}

impl From<food_item::Model> for FoodItemBody {
    fn from(model: food_item::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            food_type: model.food_type,
            restaurant: model.restaurant_id,
        }
    }
}

/// `GET /restaurant/food-item/`
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<FoodItemBody>>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::List, Subject::FoodItem),
    )
    .await?;

    let page = listing::run_listing(
        &state.db,
        FoodItem::find(),
        &params,
        SEARCH,
        SORTABLE,
        (food_item::Column::Id, Order::Desc),
    )
    .await?;
    Ok(Json(ListResponse::from_page(page, FoodItemBody::from)))
}

/// `POST /restaurant/food-item/`
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(body): ValidatedJson<FoodItemInput>,
) -> Result<(StatusCode, Json<FoodItemBody>)> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::Add, Subject::FoodItem),
    )
    .await?;

    let item = food_items::create_food_item(&state.db, caller.id, body).await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// `GET /restaurant/food-item/:id/`
pub async fn retrieve(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(item_id): Path<i64>,
) -> Result<Json<FoodItemBody>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::View, Subject::FoodItem),
    )
    .await?;

    let item = food_items::get_food_item(&state.db, item_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "food item",
        })?;
    let restaurant = restaurants::get_restaurant(&state.db, item.restaurant_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "restaurant",
        })?;
    authorize::require_record_restaurant_owner(&restaurant, caller.id)?;

    Ok(Json(item.into()))
}

/// `PUT /restaurant/food-item/:id/`
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(item_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<FoodItemInput>,
) -> Result<Json<FoodItemBody>> {
    authorize::require_capability(
        &state.db,
        caller.id,
        capability(Action::Change, Subject::FoodItem),
    )
    .await?;

    let item = food_items::update_food_item(&state.db, caller.id, item_id, body).await?;
    Ok(Json(item.into()))
}
