//! Food item entity - A dish offered by a restaurant.
//!
//! Items referenced by a menu cannot be deleted; menus may only link items
//! belonging to their own restaurant.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed set of dish categories
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(12))")]
#[serde(rename_all = "lowercase")]
pub enum FoodType {
    #[sea_orm(string_value = "appetizer")]
    Appetizer,
    #[sea_orm(string_value = "entree")]
    Entree,
    #[sea_orm(string_value = "dessert")]
    Dessert,
}

/// Food item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "food_items")]
pub struct Model {
    /// Unique identifier for the food item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Dish name, e.g. "Paneer"
    pub name: String,
    /// Short free-form description
    pub description: String,
    /// Price in the restaurant's currency, non-negative
    pub price: f64,
    /// Dish category
    pub food_type: FoodType,
    /// Restaurant offering this dish
    pub restaurant_id: i64,
}

/// Defines relationships between `FoodItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one restaurant; restaurants with items cannot be deleted
    #[sea_orm(
        belongs_to = "super::restaurant::Entity",
        from = "Column::RestaurantId",
        to = "super::restaurant::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Restaurant,
    /// Menu links referencing this item
    #[sea_orm(has_many = "super::menu_food_item::Entity")]
    MenuLinks,
}

impl Related<super::restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl Related<super::menu_food_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
