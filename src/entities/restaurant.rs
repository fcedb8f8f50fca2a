//! Restaurant entity - A venue that publishes daily menus.
//!
//! The owning user is the only principal allowed to mutate the restaurant,
//! its food items, and its menus (enforced by `core::authorize`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Restaurant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurants")]
pub struct Model {
    /// Unique identifier for the restaurant
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, e.g. "TGT"
    pub name: String,
    /// User who owns this restaurant
    pub owner_id: i64,
}

/// Defines relationships between Restaurant and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each restaurant is owned by one user; owners in use cannot be deleted
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "NoAction"
    )]
    Owner,
    /// Food items curated by this restaurant
    #[sea_orm(has_many = "super::food_item::Entity")]
    FoodItems,
    /// Menus published by this restaurant
    #[sea_orm(has_many = "super::menu::Entity")]
    Menus,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::food_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoodItems.def()
    }
}

impl Related<super::menu::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Menus.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
