//! Vote entity - One user's vote for one menu.
//!
//! `date_time` is stamped when the vote is cast and never modified;
//! `day_bucket` holds its day-of-month component and, together with
//! `user_id`, carries the one-vote-per-user-per-day unique index.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Vote database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "votes")]
pub struct Model {
    /// Unique identifier for the vote
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User who cast the vote
    pub user_id: i64,
    /// Menu the vote is for
    pub menu_id: i64,
    /// Cast timestamp, set once at creation
    pub date_time: DateTimeUtc,
    /// Day-of-month of `date_time`, the uniqueness and "today" key
    pub day_bucket: i32,
}

/// Defines relationships between Vote and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::menu::Entity",
        from = "Column::MenuId",
        to = "super::menu::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Menu,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::menu::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Menu.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
