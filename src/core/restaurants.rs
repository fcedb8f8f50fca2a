//! Restaurant business logic - creation, updates, and guarded deletion.
//!
//! A restaurant is always owned by the user who created it; ownership never
//! transfers through the update path. Deletion is blocked while menus or
//! food items still reference the restaurant.

use crate::{
    entities::{Restaurant, restaurant},
    errors::{Error, Result},
};
use sea_orm::{Set, SqlErr, prelude::*};

/// Finds a restaurant by id.
pub async fn get_restaurant<C>(db: &C, restaurant_id: i64) -> Result<Option<restaurant::Model>>
where
    C: ConnectionTrait,
{
    Restaurant::find_by_id(restaurant_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a restaurant owned by the calling user.
pub async fn create_restaurant<C>(db: &C, owner_id: i64, name: &str) -> Result<restaurant::Model>
where
    C: ConnectionTrait,
{
    let name = validated_name(name)?;

    let restaurant = restaurant::ActiveModel {
        name: Set(name),
        owner_id: Set(owner_id),
        ..Default::default()
    };
    restaurant.insert(db).await.map_err(Into::into)
}

/// Renames a restaurant. The owner is fixed at creation and not updatable.
pub async fn update_restaurant<C>(
    db: &C,
    restaurant_id: i64,
    name: &str,
) -> Result<restaurant::Model>
where
    C: ConnectionTrait,
{
    let name = validated_name(name)?;

    let restaurant = get_restaurant(db, restaurant_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "restaurant",
        })?;

    let mut restaurant: restaurant::ActiveModel = restaurant.into();
    restaurant.name = Set(name);
    restaurant.update(db).await.map_err(Into::into)
}

/// Deletes a restaurant unless menus or food items still reference it.
pub async fn delete_restaurant<C>(db: &C, restaurant_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let restaurant = get_restaurant(db, restaurant_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "restaurant",
        })?;

    let restaurant: restaurant::ActiveModel = restaurant.into();
    match restaurant.delete(db).await {
        Ok(_) => Ok(()),
        Err(err) => match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => Err(Error::InUse {
                entity: "restaurant",
            }),
            _ => Err(err.into()),
        },
    }
}

fn validated_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "name may not be blank".to_string(),
        });
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_restaurant_sets_owner() -> Result<()> {
        let db = setup_test_db().await?;
        let role = create_test_role(&db, "restaurant_owner").await?;
        let owner = create_test_user(&db, "alice", role.id).await?;

        let restaurant = create_restaurant(&db, owner.id, "TGT").await?;
        assert_eq!(restaurant.name, "TGT");
        assert_eq!(restaurant.owner_id, owner.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_restaurant_rejects_blank_name() -> Result<()> {
        let db = setup_test_db().await?;
        let role = create_test_role(&db, "restaurant_owner").await?;
        let owner = create_test_user(&db, "alice", role.id).await?;

        let result = create_restaurant(&db, owner.id, "  ").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_restaurant_keeps_owner() -> Result<()> {
        let db = setup_test_db().await?;
        let role = create_test_role(&db, "restaurant_owner").await?;
        let owner = create_test_user(&db, "alice", role.id).await?;
        let restaurant = create_restaurant(&db, owner.id, "TGT").await?;

        let updated = update_restaurant(&db, restaurant.id, "TGT Deluxe").await?;
        assert_eq!(updated.name, "TGT Deluxe");
        assert_eq!(updated.owner_id, owner.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_restaurant_blocked_by_food_items() -> Result<()> {
        let db = setup_test_db().await?;
        let role = create_test_role(&db, "restaurant_owner").await?;
        let owner = create_test_user(&db, "alice", role.id).await?;
        let restaurant = create_restaurant(&db, owner.id, "TGT").await?;
        create_test_food_item(&db, restaurant.id, "Soup").await?;

        let result = delete_restaurant(&db, restaurant.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InUse {
                entity: "restaurant"
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_restaurant_without_dependents() -> Result<()> {
        let db = setup_test_db().await?;
        let role = create_test_role(&db, "restaurant_owner").await?;
        let owner = create_test_user(&db, "alice", role.id).await?;
        let restaurant = create_restaurant(&db, owner.id, "TGT").await?;

        delete_restaurant(&db, restaurant.id).await?;
        assert!(get_restaurant(&db, restaurant.id).await?.is_none());

        let missing = delete_restaurant(&db, restaurant.id).await;
        assert!(matches!(
            missing.unwrap_err(),
            Error::NotFound {
                entity: "restaurant"
            }
        ));

        Ok(())
    }
}
