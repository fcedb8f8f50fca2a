//! User business logic - registration, profile updates, and removal.
//!
//! A user always holds exactly one role, and their group membership is
//! derived from it: registration adds the user to the role's mirrored
//! group, and every later role change resets memberships to the new role's
//! group inside the same transaction as the profile write.

use crate::{
    auth,
    core::{directory, roles},
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{Set, SqlErr, TransactionTrait, prelude::*};
use serde::Deserialize;

/// Registration payload.
///
/// `password` and `confirm_password` must match; the password is stored
/// only as an Argon2 hash.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub role: i64,
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Profile update payload. Passwords are not updatable through this path.
#[derive(Debug, Clone, Deserialize)]
pub struct UserChanges {
    pub role: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Finds a user by id.
pub async fn get_user<C>(db: &C, user_id: i64) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by their login name.
pub async fn get_user_by_username<C>(db: &C, username: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Registers a new user and joins them to their role's group.
pub async fn register_user(db: &DatabaseConnection, new_user: NewUser) -> Result<user::Model> {
    if new_user.password != new_user.confirm_password {
        return Err(Error::Validation {
            message: "Password and Confirm Password doesn't match".to_string(),
        });
    }
    let username = new_user.username.trim();
    if username.is_empty() {
        return Err(Error::Validation {
            message: "username may not be blank".to_string(),
        });
    }

    // Hash outside the transaction; key derivation is deliberately slow
    let password_hash = auth::hash_password(&new_user.password)?;

    let txn = db.begin().await?;

    let role = roles::get_role(&txn, new_user.role)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("invalid role id {}", new_user.role),
        })?;

    ensure_username_free(&txn, username, None).await?;
    ensure_email_free(&txn, &new_user.email, None).await?;

    let user = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(new_user.email.clone()),
        password_hash: Set(password_hash),
        first_name: Set(new_user.first_name.clone()),
        last_name: Set(new_user.last_name.clone()),
        role_id: Set(role.id),
        ..Default::default()
    };
    let user = match user.insert(&txn).await {
        Ok(model) => model,
        Err(err) => return Err(translate_unique_violation(err)),
    };

    directory::sync_user_membership(&txn, user.id, &role.name).await?;

    txn.commit().await?;
    Ok(user)
}

/// Applies a profile update and resets group membership to the new role.
///
/// Membership is resynced even when the role is unchanged, so a user whose
/// memberships were tampered with returns to the derived state on their
/// next update.
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: i64,
    changes: UserChanges,
) -> Result<user::Model> {
    let username = changes.username.trim();
    if username.is_empty() {
        return Err(Error::Validation {
            message: "username may not be blank".to_string(),
        });
    }

    let txn = db.begin().await?;

    let user = get_user(&txn, user_id)
        .await?
        .ok_or(Error::NotFound { entity: "user" })?;

    let role = roles::get_role(&txn, changes.role)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("invalid role id {}", changes.role),
        })?;

    ensure_username_free(&txn, username, Some(user.id)).await?;
    ensure_email_free(&txn, &changes.email, Some(user.id)).await?;

    let mut user: user::ActiveModel = user.into();
    user.username = Set(username.to_string());
    user.email = Set(changes.email.clone());
    user.first_name = Set(changes.first_name.clone());
    user.last_name = Set(changes.last_name.clone());
    user.role_id = Set(role.id);
    let user = match user.update(&txn).await {
        Ok(model) => model,
        Err(err) => return Err(translate_unique_violation(err)),
    };

    directory::sync_user_membership(&txn, user.id, &role.name).await?;

    txn.commit().await?;
    Ok(user)
}

/// Deletes a user.
///
/// Fails with [`Error::InUse`] while restaurants or votes still reference
/// them; group memberships are removed with the row.
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let user = get_user(db, user_id)
        .await?
        .ok_or(Error::NotFound { entity: "user" })?;

    let user: user::ActiveModel = user.into();
    match user.delete(db).await {
        Ok(_) => Ok(()),
        Err(err) => match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                Err(Error::InUse { entity: "user" })
            }
            _ => Err(err.into()),
        },
    }
}

async fn ensure_username_free<C>(db: &C, username: &str, exclude: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = get_user_by_username(db, username).await?;
    if existing.is_some_and(|other| Some(other.id) != exclude) {
        return Err(Error::Validation {
            message: "A user with that username already exists".to_string(),
        });
    }
    Ok(())
}

async fn ensure_email_free<C>(db: &C, email: &str, exclude: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?;
    if existing.is_some_and(|other| Some(other.id) != exclude) {
        return Err(Error::Validation {
            message: "user with this email already exists".to_string(),
        });
    }
    Ok(())
}

/// Maps a unique-index violation raced past the pre-checks onto the same
/// validation error the pre-checks produce.
fn translate_unique_violation(err: DbErr) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => {
            if message.contains("email") {
                Error::Validation {
                    message: "user with this email already exists".to_string(),
                }
            } else {
                Error::Validation {
                    message: "A user with that username already exists".to_string(),
                }
            }
        }
        _ => err.into(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::directory::group_by_name;
    use crate::entities::{UserGroup, user_group};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_register_user_hashes_password_and_joins_group() -> Result<()> {
        let db = setup_test_db().await?;
        let role = create_test_role(&db, "employee").await?;

        let user = register_user(&db, new_user_payload("alice", role.id)).await?;

        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "password123");
        assert!(user.password_hash.starts_with("$argon2"));

        let group = group_by_name(&db, "employee").await?.unwrap();
        let memberships = UserGroup::find()
            .filter(user_group::Column::UserId.eq(user.id))
            .all(&db)
            .await?;
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].group_id, group.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_register_user_password_mismatch() -> Result<()> {
        let db = setup_test_db().await?;
        let role = create_test_role(&db, "employee").await?;

        let mut payload = new_user_payload("alice", role.id);
        payload.confirm_password = "different".to_string();

        let result = register_user(&db, payload).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message } if message == "Password and Confirm Password doesn't match"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_user_duplicate_username_and_email() -> Result<()> {
        let db = setup_test_db().await?;
        let role = create_test_role(&db, "employee").await?;

        register_user(&db, new_user_payload("alice", role.id)).await?;

        let duplicate = register_user(&db, new_user_payload("alice", role.id)).await;
        assert!(matches!(
            duplicate.unwrap_err(),
            Error::Validation { message } if message.contains("username")
        ));

        let mut same_email = new_user_payload("bob", role.id);
        same_email.email = "alice@example.com".to_string();
        let duplicate = register_user(&db, same_email).await;
        assert!(matches!(
            duplicate.unwrap_err(),
            Error::Validation { message } if message.contains("email")
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_user_invalid_role() -> Result<()> {
        let db = setup_test_db().await?;

        let result = register_user(&db, new_user_payload("alice", 999)).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_switches_group_membership() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_test_role(&db, "employee").await?;
        let owner = create_test_role(&db, "restaurant_owner").await?;
        let user = create_test_user(&db, "alice", employee.id).await?;

        let updated = update_user(
            &db,
            user.id,
            UserChanges {
                role: owner.id,
                email: user.email.clone(),
                username: user.username.clone(),
                first_name: "Alice".to_string(),
                last_name: "Smith".to_string(),
            },
        )
        .await?;

        assert_eq!(updated.role_id, owner.id);
        assert_eq!(updated.first_name, "Alice");

        let owner_group = group_by_name(&db, "restaurant_owner").await?.unwrap();
        let memberships = UserGroup::find()
            .filter(user_group::Column::UserId.eq(user.id))
            .all(&db)
            .await?;
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].group_id, owner_group.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_rejects_taken_username() -> Result<()> {
        let db = setup_test_db().await?;
        let role = create_test_role(&db, "employee").await?;
        let _alice = create_test_user(&db, "alice", role.id).await?;
        let bob = create_test_user(&db, "bob", role.id).await?;

        let result = update_user(
            &db,
            bob.id,
            UserChanges {
                role: role.id,
                email: bob.email.clone(),
                username: "alice".to_string(),
                first_name: bob.first_name.clone(),
                last_name: bob.last_name.clone(),
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user_blocked_by_owned_restaurant() -> Result<()> {
        let db = setup_test_db().await?;
        let role = create_test_role(&db, "restaurant_owner").await?;
        let user = create_test_user(&db, "alice", role.id).await?;
        create_test_restaurant(&db, "TGT", user.id).await?;

        let result = delete_user(&db, user.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InUse { entity: "user" }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user_clears_memberships() -> Result<()> {
        let db = setup_test_db().await?;
        let role = create_test_role(&db, "employee").await?;
        let user = create_test_user(&db, "alice", role.id).await?;

        delete_user(&db, user.id).await?;

        assert!(get_user(&db, user.id).await?.is_none());
        let memberships = UserGroup::find()
            .filter(user_group::Column::UserId.eq(user.id))
            .all(&db)
            .await?;
        assert!(memberships.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user_missing() -> Result<()> {
        let db = setup_test_db().await?;

        let result = delete_user(&db, 999).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "user" }
        ));

        Ok(())
    }
}
