//! Directory business logic - permission groups, grants, and memberships.
//!
//! Every role is mirrored by a permission group of the same name, and that
//! mirror is the only path from a role to capabilities: roles carry no
//! grants themselves. The functions here are building blocks called inside
//! the role and user transactions so the mirror can never drift under
//! concurrent writers.

use crate::{
    entities::{GroupCapability, PermissionGroup, UserGroup, group_capability, permission_group, user_group},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Finds a permission group by its exact name.
pub async fn group_by_name<C>(db: &C, name: &str) -> Result<Option<permission_group::Model>>
where
    C: ConnectionTrait,
{
    PermissionGroup::find()
        .filter(permission_group::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Ensures a permission group with this name exists, creating it if needed.
pub async fn ensure_group<C>(db: &C, name: &str) -> Result<permission_group::Model>
where
    C: ConnectionTrait,
{
    if let Some(group) = group_by_name(db, name).await? {
        return Ok(group);
    }

    let group = permission_group::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };
    group.insert(db).await.map_err(Into::into)
}

/// Renames the permission group mirroring a role.
///
/// The old name must resolve to a group; a missing mirror means the store
/// was modified outside this crate and is surfaced as
/// [`Error::MissingGroupMirror`].
pub async fn rename_group<C>(db: &C, old_name: &str, new_name: &str) -> Result<permission_group::Model>
where
    C: ConnectionTrait,
{
    let group = group_by_name(db, old_name)
        .await?
        .ok_or_else(|| Error::MissingGroupMirror {
            role: old_name.to_string(),
        })?;

    let mut group: permission_group::ActiveModel = group.into();
    group.name = Set(new_name.to_string());
    group.update(db).await.map_err(Into::into)
}

/// Removes the permission group with this name, if it exists.
///
/// Deleting a group cascades to its grants and memberships. A missing group
/// is not an error here: role deletion must succeed even when the mirror
/// was already gone.
pub async fn remove_group<C>(db: &C, name: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    PermissionGroup::delete_many()
        .filter(permission_group::Column::Name.eq(name))
        .exec(db)
        .await?;
    Ok(())
}

/// Grants a capability to a group by name, idempotently.
pub async fn grant_capability<C>(db: &C, group_name: &str, capability: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let group = group_by_name(db, group_name)
        .await?
        .ok_or_else(|| Error::MissingGroupMirror {
            role: group_name.to_string(),
        })?;

    let existing = GroupCapability::find()
        .filter(group_capability::Column::GroupId.eq(group.id))
        .filter(group_capability::Column::Capability.eq(capability))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let grant = group_capability::ActiveModel {
        group_id: Set(group.id),
        capability: Set(capability.to_string()),
        ..Default::default()
    };
    grant.insert(db).await?;
    Ok(())
}

/// Resets a user's memberships to exactly the group named after their role.
///
/// Called when a user is created and again whenever their role changes, so
/// stale memberships never survive a role switch.
pub async fn sync_user_membership<C>(db: &C, user_id: i64, role_name: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let group = group_by_name(db, role_name)
        .await?
        .ok_or_else(|| Error::MissingGroupMirror {
            role: role_name.to_string(),
        })?;

    UserGroup::delete_many()
        .filter(user_group::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    let membership = user_group::ActiveModel {
        user_id: Set(user_id),
        group_id: Set(group.id),
        ..Default::default()
    };
    membership.insert(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_ensure_group_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        let first = ensure_group(&db, "employee").await?;
        let second = ensure_group(&db, "employee").await?;
        assert_eq!(first.id, second.id);

        let count = PermissionGroup::find().count(&db).await?;
        assert_eq!(count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_rename_group_requires_existing_mirror() -> Result<()> {
        let db = setup_test_db().await?;

        ensure_group(&db, "waiter").await?;
        let renamed = rename_group(&db, "waiter", "server").await?;
        assert_eq!(renamed.name, "server");
        assert!(group_by_name(&db, "waiter").await?.is_none());

        let missing = rename_group(&db, "ghost", "anything").await;
        assert!(matches!(
            missing.unwrap_err(),
            Error::MissingGroupMirror { role } if role == "ghost"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_group_tolerates_absent_group() -> Result<()> {
        let db = setup_test_db().await?;

        ensure_group(&db, "temp").await?;
        remove_group(&db, "temp").await?;
        assert!(group_by_name(&db, "temp").await?.is_none());

        // Second removal is a no-op, not an error
        remove_group(&db, "temp").await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_grant_capability_deduplicates() -> Result<()> {
        let db = setup_test_db().await?;

        ensure_group(&db, "employee").await?;
        grant_capability(&db, "employee", "list_menu").await?;
        grant_capability(&db, "employee", "list_menu").await?;

        let count = GroupCapability::find().count(&db).await?;
        assert_eq!(count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_sync_user_membership_replaces_old_groups() -> Result<()> {
        let db = setup_test_db().await?;
        let waiter = create_test_role(&db, "waiter").await?;
        let _chef = create_test_role(&db, "chef").await?;
        let user = create_test_user(&db, "alice", waiter.id).await?;

        // Creation already synced membership to the waiter group
        let memberships = UserGroup::find()
            .filter(user_group::Column::UserId.eq(user.id))
            .all(&db)
            .await?;
        assert_eq!(memberships.len(), 1);

        sync_user_membership(&db, user.id, "chef").await?;

        let memberships = UserGroup::find()
            .filter(user_group::Column::UserId.eq(user.id))
            .all(&db)
            .await?;
        assert_eq!(memberships.len(), 1);
        let chef_group = group_by_name(&db, "chef").await?.unwrap();
        assert_eq!(memberships[0].group_id, chef_group.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_sync_user_membership_missing_mirror() -> Result<()> {
        let db = setup_test_db().await?;
        let role = create_test_role(&db, "waiter").await?;
        let user = create_test_user(&db, "alice", role.id).await?;

        let result = sync_user_membership(&db, user.id, "nonexistent").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::MissingGroupMirror { role } if role == "nonexistent"
        ));

        Ok(())
    }
}
