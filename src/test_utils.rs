//! Shared test utilities for the lunch vote service.
//!
//! Fixtures go through the same core functions production code uses, so
//! every test entity satisfies the invariants the schema enforces.

use crate::{
    api::{AppState, build_router},
    config::AppConfig,
    core::{
        bootstrap,
        food_items::{self, FoodItemInput},
        menus::{self, MenuInput},
        restaurants, roles,
        users::{self, NewUser},
    },
    entities::{self, DayOfWeek, FoodType},
    errors::{Error, Result},
};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Application configuration with fixed values for tests.
pub fn test_app_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        jwt_secret: "test-secret".to_string(),
        access_token_minutes: 5,
        refresh_token_minutes: 24 * 60,
        admin_password: "admin".to_string(),
    }
}

/// Builds a router over a fresh seeded database.
///
/// Returns the router plus the state it serves from, so tests can both
/// fire requests and inspect or prepare rows directly.
pub async fn setup_test_app() -> Result<(axum::Router, AppState)> {
    let db = setup_test_db().await?;
    let config = test_app_config();
    bootstrap::seed(&db, &config).await?;
    let state = AppState { db, config };
    Ok((build_router(state.clone()), state))
}

/// Creates a role together with its mirrored permission group.
pub async fn create_test_role(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::role::Model> {
    roles::create_role(db, name).await
}

/// Registration payload with sensible defaults.
///
/// # Defaults
/// * `email`: `{username}@example.com`
/// * `password`: "password123"
pub fn new_user_payload(username: &str, role_id: i64) -> NewUser {
    NewUser {
        role: role_id,
        email: format!("{username}@example.com"),
        username: username.to_string(),
        password: "password123".to_string(),
        confirm_password: "password123".to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
    }
}

/// Registers a user through the real registration flow.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    role_id: i64,
) -> Result<entities::user::Model> {
    users::register_user(db, new_user_payload(username, role_id)).await
}

/// Creates a restaurant owned by the given user.
pub async fn create_test_restaurant(
    db: &DatabaseConnection,
    name: &str,
    owner_id: i64,
) -> Result<entities::restaurant::Model> {
    restaurants::create_restaurant(db, owner_id, name).await
}

/// Creates a food item under a restaurant, acting as its owner.
///
/// # Defaults
/// * `description`: "Test dish"
/// * `price`: 9.5
/// * `food_type`: entree
pub async fn create_test_food_item(
    db: &DatabaseConnection,
    restaurant_id: i64,
    name: &str,
) -> Result<entities::food_item::Model> {
    let restaurant = restaurants::get_restaurant(db, restaurant_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "restaurant",
        })?;
    food_items::create_food_item(
        db,
        restaurant.owner_id,
        FoodItemInput {
            name: name.to_string(),
            description: "Test dish".to_string(),
            price: 9.5,
            food_type: FoodType::Entree,
            restaurant: restaurant_id,
        },
    )
    .await
}

/// Publishes an empty menu into today's bucket on the owner's behalf.
pub async fn publish_test_menu(
    db: &DatabaseConnection,
    caller_id: i64,
    restaurant_id: i64,
    day: DayOfWeek,
) -> Result<entities::menu::Model> {
    let published = menus::publish_menu(
        db,
        caller_id,
        MenuInput {
            day,
            restaurant: restaurant_id,
            food_item: None,
        },
    )
    .await?;
    Ok(published.menu)
}

/// Everything seeded by [`seed_restaurant_with_menu`].
pub struct MenuFixture {
    pub role: entities::role::Model,
    pub owner: entities::user::Model,
    pub restaurant: entities::restaurant::Model,
    pub menu: entities::menu::Model,
}

/// Seeds an owner with a restaurant and a menu published today.
///
/// Reuses the `restaurant_owner` role when a previous fixture or the boot
/// seed already created it, so it works on bare and seeded databases alike.
pub async fn seed_restaurant_with_menu(db: &DatabaseConnection) -> Result<MenuFixture> {
    let role = match roles::get_role_by_name(db, "restaurant_owner").await? {
        Some(role) => role,
        None => create_test_role(db, "restaurant_owner").await?,
    };
    let owner = create_test_user(db, "owner", role.id).await?;
    let restaurant = create_test_restaurant(db, "TGT", owner.id).await?;
    let menu = publish_test_menu(db, owner.id, restaurant.id, DayOfWeek::Monday).await?;
    Ok(MenuFixture {
        role,
        owner,
        restaurant,
        menu,
    })
}

/// Registers a user into one of the seeded roles and returns the user
/// together with a valid access token.
pub async fn seeded_user_with_token(
    state: &AppState,
    username: &str,
    role_name: &str,
) -> Result<(entities::user::Model, String)> {
    let role = roles::get_role_by_name(&state.db, role_name)
        .await?
        .ok_or(Error::NotFound { entity: "role" })?;
    let user = create_test_user(&state.db, username, role.id).await?;
    let token = crate::auth::issue_pair(&state.config, user.id)?.access;
    Ok((user, token))
}

/// Access token for the admin account created by seeding.
pub async fn admin_token(state: &AppState) -> Result<String> {
    let admin = users::get_user_by_username(&state.db, "admin")
        .await?
        .ok_or(Error::NotFound { entity: "user" })?;
    Ok(crate::auth::issue_pair(&state.config, admin.id)?.access)
}

/// Builds a request with an optional bearer token and JSON body.
#[allow(clippy::unwrap_used)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Fires one request at the router and returns the status plus the parsed
/// JSON body. Empty bodies parse as `null`.
#[allow(clippy::unwrap_used)]
pub async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
