//! Group capability entity - A single capability granted to a permission group.
//!
//! Capability strings come from the static table in `core::capabilities`
//! (e.g., `"add_restaurant"`, `"list_uservote"`). The pair
//! `(group_id, capability)` is unique (index created in `config::database`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Group capability database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group_capabilities")]
pub struct Model {
    /// Unique identifier for the grant
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Group receiving the capability
    pub group_id: i64,
    /// Capability name, e.g. `"change_menu"`
    pub capability: String,
}

/// Defines relationships between `GroupCapability` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each grant belongs to one group and is removed with it
    #[sea_orm(
        belongs_to = "super::permission_group::Entity",
        from = "Column::GroupId",
        to = "super::permission_group::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Group,
}

impl Related<super::permission_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
