//! Authorization business logic - capability gates and ownership checks.
//!
//! Capabilities reach a user exclusively through group membership: the
//! user's groups are loaded, then the capabilities granted to those groups.
//! Users and roles never hold grants directly. Ownership of a restaurant is
//! a separate, stricter check that no capability bypasses, not even a full
//! administrative grant.

use crate::{
    entities::{GroupCapability, UserGroup, group_capability, restaurant, user_group},
    errors::{Error, Result},
};
use sea_orm::prelude::*;
use std::collections::HashSet;

/// Loads every capability name granted to a user through their groups.
///
/// Returns an empty set for users without memberships; absence of grants is
/// an authorization outcome, not an error.
pub async fn capabilities_for_user<C>(db: &C, user_id: i64) -> Result<HashSet<String>>
where
    C: ConnectionTrait,
{
    let group_ids: Vec<i64> = UserGroup::find()
        .filter(user_group::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|membership| membership.group_id)
        .collect();

    if group_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let grants = GroupCapability::find()
        .filter(group_capability::Column::GroupId.is_in(group_ids))
        .all(db)
        .await?;

    Ok(grants.into_iter().map(|grant| grant.capability).collect())
}

/// Checks whether any of the user's groups grants the capability.
pub async fn has_capability<C>(db: &C, user_id: i64, capability: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    let capabilities = capabilities_for_user(db, user_id).await?;
    Ok(capabilities.contains(capability))
}

/// Requires a capability, failing with [`Error::MissingCapability`] when the
/// user's groups do not grant it.
pub async fn require_capability<C>(db: &C, user_id: i64, capability: &'static str) -> Result<()>
where
    C: ConnectionTrait,
{
    if has_capability(db, user_id, capability).await? {
        Ok(())
    } else {
        Err(Error::MissingCapability { capability })
    }
}

/// Requires that the user owns the restaurant named in a request payload.
///
/// Used where a write targets a restaurant chosen by the caller; the
/// distinct [`Error::NotOwner`] rendering separates this from a capability
/// failure.
pub fn require_payload_restaurant_owner(
    restaurant: &restaurant::Model,
    user_id: i64,
) -> Result<()> {
    if restaurant.owner_id == user_id {
        Ok(())
    } else {
        Err(Error::NotOwner)
    }
}

/// Requires that the user owns the restaurant behind an existing record.
///
/// Used on retrieve and update of a record reached by id; failures render
/// the generic permission body via [`Error::ObjectPermissionDenied`].
pub fn require_record_restaurant_owner(
    restaurant: &restaurant::Model,
    user_id: i64,
) -> Result<()> {
    if restaurant.owner_id == user_id {
        Ok(())
    } else {
        Err(Error::ObjectPermissionDenied)
    }
}
