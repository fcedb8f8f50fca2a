//! Menu food item entity - Join row linking a menu to one of its dishes.
//!
//! Deleting all rows for a menu and re-inserting is how a menu's item set
//! is replaced on update.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Menu/food-item link database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu_food_items")]
pub struct Model {
    /// Unique identifier for the link
    #[sea_orm(primary_key)]
    pub id: i64,
    pub menu_id: i64,
    pub food_item_id: i64,
}

/// Defines relationships between `MenuFoodItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::menu::Entity",
        from = "Column::MenuId",
        to = "super::menu::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Menu,
    /// Food items referenced by a link cannot be deleted
    #[sea_orm(
        belongs_to = "super::food_item::Entity",
        from = "Column::FoodItemId",
        to = "super::food_item::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    FoodItem,
}

impl Related<super::menu::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Menu.def()
    }
}

impl Related<super::food_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoodItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
