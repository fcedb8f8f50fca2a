//! Role business logic - role records and their mirrored permission groups.
//!
//! Creating, renaming, and deleting a role keeps the same-named permission
//! group in step inside one transaction, so observers never see a role
//! without its mirror. Grants always live on the group, never on the role.

use crate::{
    core::directory,
    entities::{Role, role},
    errors::{Error, Result},
};
use sea_orm::{Set, SqlErr, TransactionTrait, prelude::*};

/// Finds a role by id.
pub async fn get_role<C>(db: &C, role_id: i64) -> Result<Option<role::Model>>
where
    C: ConnectionTrait,
{
    Role::find_by_id(role_id).one(db).await.map_err(Into::into)
}

/// Finds a role by its exact name.
pub async fn get_role_by_name<C>(db: &C, name: &str) -> Result<Option<role::Model>>
where
    C: ConnectionTrait,
{
    Role::find()
        .filter(role::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a role together with its mirrored permission group.
///
/// The group is created in the same transaction; if it already exists (for
/// example after a role was deleted while its group was recreated by hand)
/// it is adopted rather than duplicated.
pub async fn create_role(db: &DatabaseConnection, name: &str) -> Result<role::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "name may not be blank".to_string(),
        });
    }

    let txn = db.begin().await?;

    if get_role_by_name(&txn, name).await?.is_some() {
        return Err(Error::Validation {
            message: "role with this name already exists".to_string(),
        });
    }

    let role = role::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };
    let role = match role.insert(&txn).await {
        Ok(model) => model,
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                return Err(Error::Validation {
                    message: "role with this name already exists".to_string(),
                });
            }
            _ => return Err(err.into()),
        },
    };

    directory::ensure_group(&txn, name).await?;

    txn.commit().await?;
    Ok(role)
}

/// Renames a role and its mirrored permission group in one transaction.
pub async fn update_role(db: &DatabaseConnection, role_id: i64, name: &str) -> Result<role::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "name may not be blank".to_string(),
        });
    }

    let txn = db.begin().await?;

    let role = get_role(&txn, role_id)
        .await?
        .ok_or(Error::NotFound { entity: "role" })?;

    let clash = get_role_by_name(&txn, name).await?;
    if clash.as_ref().is_some_and(|other| other.id != role.id) {
        return Err(Error::Validation {
            message: "role with this name already exists".to_string(),
        });
    }

    directory::rename_group(&txn, &role.name, name).await?;

    let mut role: role::ActiveModel = role.into();
    role.name = Set(name.to_string());
    let role = role.update(&txn).await?;

    txn.commit().await?;
    Ok(role)
}

/// Deletes a role and its mirrored permission group.
///
/// Fails with [`Error::InUse`] while any user still holds the role; the
/// group and its grants are only removed once the role row is gone.
pub async fn delete_role(db: &DatabaseConnection, role_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let role = get_role(&txn, role_id)
        .await?
        .ok_or(Error::NotFound { entity: "role" })?;

    let name = role.name.clone();
    let role: role::ActiveModel = role.into();
    if let Err(err) = role.delete(&txn).await {
        return match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                Err(Error::InUse { entity: "role" })
            }
            _ => Err(err.into()),
        };
    }

    directory::remove_group(&txn, &name).await?;

    txn.commit().await?;
    Ok(())
}
