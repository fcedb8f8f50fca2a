//! Menu business logic - daily publication and food item attachment.
//!
//! A restaurant may publish at most one menu per day bucket. Buckets are
//! keyed by day of month only, so the 5th of March and the 5th of April
//! share a bucket. The application pre-checks for an existing menu, and the
//! unique index on `(restaurant_id, day_bucket)` settles any race the
//! pre-check misses.
//!
//! Food item ids supplied with a publish or update are filtered to items
//! that exist and belong to the target restaurant; everything else is
//! silently dropped rather than rejected.

use crate::{
    core::{authorize, restaurants},
    entities::{DayOfWeek, FoodItem, Menu, MenuFoodItem, food_item, menu, menu_food_item},
    errors::{Error, Result},
};
use chrono::{DateTime, Datelike, Utc};
use sea_orm::{QueryOrder, Set, SqlErr, TransactionTrait, prelude::*};
use serde::Deserialize;
use std::collections::HashMap;

/// Create and update payload for a menu.
///
/// `food_item` is optional on update: when absent, existing attachments are
/// left untouched; when present, they are replaced by the filtered set.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuInput {
    pub day: DayOfWeek,
    /// Id of the restaurant publishing this menu.
    pub restaurant: i64,
    #[serde(default)]
    pub food_item: Option<Vec<i64>>,
}

/// A menu together with the ids of its attached food items.
#[derive(Debug, Clone)]
pub struct MenuWithItems {
    pub menu: menu::Model,
    pub food_item: Vec<i64>,
}

/// Maps a timestamp to its day bucket.
#[must_use]
pub fn day_bucket(at: DateTime<Utc>) -> i32 {
    // day() is always within 1..=31
    i32::try_from(at.day()).unwrap_or_default()
}

/// Finds a menu by id.
pub async fn get_menu<C>(db: &C, menu_id: i64) -> Result<Option<menu::Model>>
where
    C: ConnectionTrait,
{
    Menu::find_by_id(menu_id).one(db).await.map_err(Into::into)
}

/// Publishes today's menu for a restaurant the caller owns.
///
/// Fails with [`Error::DuplicateMenu`] when the restaurant already has a
/// menu in today's bucket.
pub async fn publish_menu(
    db: &DatabaseConnection,
    caller_id: i64,
    input: MenuInput,
) -> Result<MenuWithItems> {
    let restaurant = restaurants::get_restaurant(db, input.restaurant)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("invalid restaurant id {}", input.restaurant),
        })?;
    authorize::require_payload_restaurant_owner(&restaurant, caller_id)?;

    let now = Utc::now();
    let today = day_bucket(now);

    let txn = db.begin().await?;

    let existing = Menu::find()
        .filter(menu::Column::RestaurantId.eq(restaurant.id))
        .filter(menu::Column::DayBucket.eq(today))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(Error::DuplicateMenu);
    }

    let menu = menu::ActiveModel {
        restaurant_id: Set(restaurant.id),
        day: Set(input.day),
        date_time: Set(now),
        day_bucket: Set(today),
        ..Default::default()
    };
    let menu = match menu.insert(&txn).await {
        Ok(model) => model,
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => return Err(Error::DuplicateMenu),
            _ => return Err(err.into()),
        },
    };

    let requested = input.food_item.unwrap_or_default();
    let food_item = attach_items(&txn, menu.id, restaurant.id, &requested).await?;

    txn.commit().await?;
    Ok(MenuWithItems { menu, food_item })
}

/// Updates a menu's day, restaurant, and (optionally) attached items.
///
/// The caller must own the restaurant the menu currently belongs to and the
/// restaurant named in the payload. The publication timestamp and day
/// bucket are fixed at publish time and never change here, so moving a menu
/// onto a restaurant that already published in the same bucket fails with
/// [`Error::DuplicateMenu`].
pub async fn update_menu(
    db: &DatabaseConnection,
    caller_id: i64,
    menu_id: i64,
    input: MenuInput,
) -> Result<MenuWithItems> {
    let menu = get_menu(db, menu_id)
        .await?
        .ok_or(Error::NotFound { entity: "menu" })?;

    let current_restaurant = restaurants::get_restaurant(db, menu.restaurant_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "restaurant",
        })?;
    authorize::require_record_restaurant_owner(&current_restaurant, caller_id)?;

    let target = restaurants::get_restaurant(db, input.restaurant)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("invalid restaurant id {}", input.restaurant),
        })?;
    authorize::require_payload_restaurant_owner(&target, caller_id)?;

    let txn = db.begin().await?;

    if let Some(requested) = &input.food_item {
        MenuFoodItem::delete_many()
            .filter(menu_food_item::Column::MenuId.eq(menu.id))
            .exec(&txn)
            .await?;
        attach_items(&txn, menu.id, target.id, requested).await?;
    }

    let mut menu: menu::ActiveModel = menu.into();
    menu.day = Set(input.day);
    menu.restaurant_id = Set(target.id);
    let menu = match menu.update(&txn).await {
        Ok(model) => model,
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => return Err(Error::DuplicateMenu),
            _ => return Err(err.into()),
        },
    };

    let food_item = item_ids_for_menu(&txn, menu.id).await?;

    txn.commit().await?;
    Ok(MenuWithItems { menu, food_item })
}

/// Lists the menus published in today's day bucket.
pub async fn current_day_menus<C>(db: &C) -> Result<Vec<menu::Model>>
where
    C: ConnectionTrait,
{
    let today = day_bucket(Utc::now());
    Menu::find()
        .filter(menu::Column::DayBucket.eq(today))
        .order_by_asc(menu::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the attached food item ids for one menu, ascending.
pub async fn item_ids_for_menu<C>(db: &C, menu_id: i64) -> Result<Vec<i64>>
where
    C: ConnectionTrait,
{
    let links = MenuFoodItem::find()
        .filter(menu_food_item::Column::MenuId.eq(menu_id))
        .order_by_asc(menu_food_item::Column::FoodItemId)
        .all(db)
        .await?;
    Ok(links.into_iter().map(|link| link.food_item_id).collect())
}

/// Returns the attached food item ids for many menus in one query.
pub async fn item_ids_for_menus<C>(db: &C, menu_ids: &[i64]) -> Result<HashMap<i64, Vec<i64>>>
where
    C: ConnectionTrait,
{
    if menu_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let links = MenuFoodItem::find()
        .filter(menu_food_item::Column::MenuId.is_in(menu_ids.to_vec()))
        .order_by_asc(menu_food_item::Column::FoodItemId)
        .all(db)
        .await?;

    let mut by_menu: HashMap<i64, Vec<i64>> = HashMap::new();
    for link in links {
        by_menu.entry(link.menu_id).or_default().push(link.food_item_id);
    }
    Ok(by_menu)
}

/// Attaches the requested items that exist under the given restaurant.
///
/// Ids that match nothing, or match an item of another restaurant, are
/// skipped without error. Returns the ids actually attached, ascending.
async fn attach_items<C>(
    db: &C,
    menu_id: i64,
    restaurant_id: i64,
    requested: &[i64],
) -> Result<Vec<i64>>
where
    C: ConnectionTrait,
{
    if requested.is_empty() {
        return Ok(Vec::new());
    }

    let items = FoodItem::find()
        .filter(food_item::Column::Id.is_in(requested.to_vec()))
        .filter(food_item::Column::RestaurantId.eq(restaurant_id))
        .order_by_asc(food_item::Column::Id)
        .all(db)
        .await?;

    let mut attached = Vec::with_capacity(items.len());
    for item in items {
        let link = menu_food_item::ActiveModel {
            menu_id: Set(menu_id),
            food_item_id: Set(item.id),
            ..Default::default()
        };
        link.insert(db).await?;
        attached.push(item.id);
    }
    Ok(attached)
}
