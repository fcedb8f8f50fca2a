//! User entity - Every principal in the system, employee and owner alike.
//!
//! A user holds exactly one role. Group membership is derived from that
//! role and reset by `core::directory::sync_user_group` whenever the user
//! is created or the role changes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name
    #[sea_orm(unique)]
    pub username: String,
    /// Contact address, also unique
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC-format password hash, never serialized to API responses
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    /// The single role this user holds
    pub role_id: i64,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each user holds one role; roles in use cannot be deleted
    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Role,
    /// Derived group memberships, reset on every role change
    #[sea_orm(has_many = "super::user_group::Entity")]
    Groups,
    /// Restaurants owned by this user
    #[sea_orm(has_many = "super::restaurant::Entity")]
    Restaurants,
    /// Votes cast by this user
    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl Related<super::user_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurants.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
