//! Database connection and schema management.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust struct definitions without manual SQL. The composite unique
//! indexes that back the per-day publication and voting rules are created
//! here as well, since they span columns and cannot be derived from a single
//! entity attribute.

use crate::entities::{
    FoodItem, GroupCapability, Menu, MenuFoodItem, PermissionGroup, Restaurant, Role, User,
    UserGroup, Vote, food_item, group_capability, menu, vote,
};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the `SQLite` database using the
/// `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is
/// set; `mode=rwc` lets the first boot create the file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/lunchvote.sqlite?mode=rwc".to_string());

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all database tables and indexes from the entity definitions.
///
/// Safe to call on every boot; existing tables and indexes are left alone.
/// Creation order respects the foreign keys between tables.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut role_table = schema.create_table_from_entity(Role);
    let mut group_table = schema.create_table_from_entity(PermissionGroup);
    let mut user_table = schema.create_table_from_entity(User);
    let mut grant_table = schema.create_table_from_entity(GroupCapability);
    let mut membership_table = schema.create_table_from_entity(UserGroup);
    let mut restaurant_table = schema.create_table_from_entity(Restaurant);
    let mut food_item_table = schema.create_table_from_entity(FoodItem);
    let mut menu_table = schema.create_table_from_entity(Menu);
    let mut menu_item_table = schema.create_table_from_entity(MenuFoodItem);
    let mut vote_table = schema.create_table_from_entity(Vote);

    for table in [
        &mut role_table,
        &mut group_table,
        &mut user_table,
        &mut grant_table,
        &mut membership_table,
        &mut restaurant_table,
        &mut food_item_table,
        &mut menu_table,
        &mut menu_item_table,
        &mut vote_table,
    ] {
        table.if_not_exists();
        db.execute(builder.build(&*table)).await?;
    }

    for index in [
        one_menu_per_restaurant_per_day(),
        one_vote_per_user_per_day(),
        one_grant_per_group_per_capability(),
        food_item_restaurant_lookup(),
    ] {
        db.execute(builder.build(&index)).await?;
    }

    Ok(())
}

/// Unique index enforcing at most one menu per restaurant per day bucket.
fn one_menu_per_restaurant_per_day() -> IndexCreateStatement {
    Index::create()
        .name("idx-menus-restaurant-day-bucket")
        .table(Menu)
        .col(menu::Column::RestaurantId)
        .col(menu::Column::DayBucket)
        .unique()
        .if_not_exists()
        .to_owned()
}

/// Unique index enforcing at most one vote per user per day bucket.
fn one_vote_per_user_per_day() -> IndexCreateStatement {
    Index::create()
        .name("idx-votes-user-day-bucket")
        .table(Vote)
        .col(vote::Column::UserId)
        .col(vote::Column::DayBucket)
        .unique()
        .if_not_exists()
        .to_owned()
}

/// Unique index deduplicating capability grants within a group.
fn one_grant_per_group_per_capability() -> IndexCreateStatement {
    Index::create()
        .name("idx-group-capabilities-group-capability")
        .table(GroupCapability)
        .col(group_capability::Column::GroupId)
        .col(group_capability::Column::Capability)
        .unique()
        .if_not_exists()
        .to_owned()
}

/// Plain index speeding up the per-restaurant food item scoping queries.
fn food_item_restaurant_lookup() -> IndexCreateStatement {
    Index::create()
        .name("idx-food-items-restaurant")
        .table(FoodItem)
        .col(food_item::Column::RestaurantId)
        .if_not_exists()
        .to_owned()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{
        FoodItemModel, MenuModel, RestaurantModel, RoleModel, UserModel, VoteModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Tables exist if these queries run at all
        let _: Vec<RoleModel> = Role::find().limit(1).all(&db).await?;
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<RestaurantModel> = Restaurant::find().limit(1).all(&db).await?;
        let _: Vec<FoodItemModel> = FoodItem::find().limit(1).all(&db).await?;
        let _: Vec<MenuModel> = Menu::find().limit(1).all(&db).await?;
        let _: Vec<VoteModel> = Vote::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let _: Vec<RoleModel> = Role::find().limit(1).all(&db).await?;
        Ok(())
    }
}
