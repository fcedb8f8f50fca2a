//! Food item business logic - dishes offered by a restaurant.
//!
//! Creating a food item requires owning the restaurant named in the
//! payload. Updates require owning the restaurant the item currently
//! belongs to; the payload may then point the item at any existing
//! restaurant, which is how items move between a user's restaurants.

use crate::{
    core::{authorize, restaurants},
    entities::{FoodItem, FoodType, food_item},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use serde::Deserialize;

/// Create and update payload for a food item.
#[derive(Debug, Clone, Deserialize)]
pub struct FoodItemInput {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub food_type: FoodType,
    /// Id of the restaurant offering this item.
    pub restaurant: i64,
}

/// Finds a food item by id.
pub async fn get_food_item<C>(db: &C, item_id: i64) -> Result<Option<food_item::Model>>
where
    C: ConnectionTrait,
{
    FoodItem::find_by_id(item_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a food item under a restaurant the caller owns.
pub async fn create_food_item<C>(
    db: &C,
    caller_id: i64,
    input: FoodItemInput,
) -> Result<food_item::Model>
where
    C: ConnectionTrait,
{
    let name = validated_name(&input.name)?;
    validate_price(input.price)?;

    let restaurant = restaurants::get_restaurant(db, input.restaurant)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("invalid restaurant id {}", input.restaurant),
        })?;
    authorize::require_payload_restaurant_owner(&restaurant, caller_id)?;

    let item = food_item::ActiveModel {
        name: Set(name),
        description: Set(input.description),
        price: Set(input.price),
        food_type: Set(input.food_type),
        restaurant_id: Set(restaurant.id),
        ..Default::default()
    };
    item.insert(db).await.map_err(Into::into)
}

/// Updates a food item the caller's restaurant currently holds.
pub async fn update_food_item<C>(
    db: &C,
    caller_id: i64,
    item_id: i64,
    input: FoodItemInput,
) -> Result<food_item::Model>
where
    C: ConnectionTrait,
{
    let name = validated_name(&input.name)?;
    validate_price(input.price)?;

    let item = get_food_item(db, item_id).await?.ok_or(Error::NotFound {
        entity: "food item",
    })?;

    let current_restaurant = restaurants::get_restaurant(db, item.restaurant_id)
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

    let mut item: food_item::ActiveModel = item.into();
    item.name = Set(name);
    item.description = Set(input.description);
    item.price = Set(input.price);
    item.food_type = Set(input.food_type);
    item.restaurant_id = Set(target.id);
    item.update(db).await.map_err(Into::into)
}

fn validated_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "name may not be blank".to_string(),
        });
    }
    Ok(name.to_string())
}

/// Rejects negative prices; NaN fails the comparison and is rejected too.
fn validate_price(price: f64) -> Result<()> {
    if price >= 0.0 {
        Ok(())
    } else {
        Err(Error::Validation {
            message: "price must be non-negative".to_string(),
        })
    }
}
