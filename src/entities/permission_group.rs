//! Permission group entity - The capability-bearing mirror of a role.
//!
//! Groups exist so that permission checks can stay generic: a user's
//! effective capability set is the union of the grants on the groups the
//! user belongs to. Group names track role names 1:1.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Permission group database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "permission_groups")]
pub struct Model {
    /// Unique identifier for the group
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Group name, always equal to the name of the role it mirrors
    #[sea_orm(unique)]
    pub name: String,
}

/// Defines relationships between `PermissionGroup` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Capabilities granted to this group; they die with the group
    #[sea_orm(has_many = "super::group_capability::Entity")]
    Capabilities,
    /// Membership rows linking users to this group
    #[sea_orm(has_many = "super::user_group::Entity")]
    Members,
}

impl Related<super::group_capability::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Capabilities.def()
    }
}

impl Related<super::user_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
