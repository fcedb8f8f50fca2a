//! Menu entity - One restaurant's offering for one day.
//!
//! `date_time` is stamped at publication and never modified; `day_bucket`
//! holds its day-of-month component and, together with `restaurant_id`,
//! carries the one-menu-per-restaurant-per-day unique index (created in
//! `config::database`). The `day` label is informational only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed set of weekday labels carried on a menu
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum DayOfWeek {
    #[sea_orm(string_value = "Monday")]
    Monday,
    #[sea_orm(string_value = "Tuesday")]
    Tuesday,
    #[sea_orm(string_value = "Wednesday")]
    Wednesday,
    #[sea_orm(string_value = "Thursday")]
    Thursday,
    #[sea_orm(string_value = "Friday")]
    Friday,
    #[sea_orm(string_value = "Saturday")]
    Saturday,
    #[sea_orm(string_value = "Sunday")]
    Sunday,
}

/// Menu database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menus")]
pub struct Model {
    /// Unique identifier for the menu
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Restaurant that published this menu
    pub restaurant_id: i64,
    /// Weekday label supplied by the publisher
    pub day: DayOfWeek,
    /// Publication timestamp, set once at creation
    pub date_time: DateTimeUtc,
    /// Day-of-month of `date_time`, the uniqueness and "today" key
    pub day_bucket: i32,
}

/// Defines relationships between Menu and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each menu belongs to one restaurant
    #[sea_orm(
        belongs_to = "super::restaurant::Entity",
        from = "Column::RestaurantId",
        to = "super::restaurant::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Restaurant,
    /// Links to the curated food items
    #[sea_orm(has_many = "super::menu_food_item::Entity")]
    FoodLinks,
    /// Votes cast for this menu; menus with votes cannot be deleted
    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,
}

impl Related<super::restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl Related<super::menu_food_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoodLinks.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

/// Menus reach food items through the `menu_food_items` join table
impl Related<super::food_item::Entity> for Entity {
    fn to() -> RelationDef {
        super::menu_food_item::Relation::FoodItem.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::menu_food_item::Relation::Menu.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
