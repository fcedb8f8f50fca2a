//! Startup seeding: built-in roles, their capability grants and the
//! administrator account.
//!
//! Seeding runs on every boot and is idempotent, so a fresh database and a
//! long-lived one end up with the same baseline. Existing rows are left
//! alone; only missing roles, grants and the admin user are created.

use crate::{
    config::AppConfig,
    core::{
        capabilities::{Action, Subject, all_capabilities, capability},
        directory, roles,
        users::{self, NewUser},
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Role holding every capability.
pub const ADMIN_ROLE: &str = "admin";
/// Role for users who run restaurants and publish menus.
pub const RESTAURANT_OWNER_ROLE: &str = "restaurant_owner";
/// Role for users who browse menus and vote.
pub const EMPLOYEE_ROLE: &str = "employee";

const ADMIN_USERNAME: &str = "admin";
const ADMIN_EMAIL: &str = "admin@gmail.com";

/// Restaurant owners manage their own restaurants, food items and menus.
/// Menus deliberately cannot be deleted once published, so `delete_menu`
/// is granted to nobody but the admin.
const RESTAURANT_OWNER_GRANTS: [&str; 14] = [
    capability(Action::View, Subject::Restaurant),
    capability(Action::List, Subject::Restaurant),
    capability(Action::Add, Subject::Restaurant),
    capability(Action::Change, Subject::Restaurant),
    capability(Action::Delete, Subject::Restaurant),
    capability(Action::View, Subject::FoodItem),
    capability(Action::List, Subject::FoodItem),
    capability(Action::Add, Subject::FoodItem),
    capability(Action::Change, Subject::FoodItem),
    capability(Action::Delete, Subject::FoodItem),
    capability(Action::View, Subject::Menu),
    capability(Action::List, Subject::Menu),
    capability(Action::Add, Subject::Menu),
    capability(Action::Change, Subject::Menu),
];

/// Employees browse what is on offer and cast votes.
const EMPLOYEE_GRANTS: [&str; 6] = [
    capability(Action::View, Subject::FoodItem),
    capability(Action::List, Subject::FoodItem),
    capability(Action::View, Subject::Menu),
    capability(Action::List, Subject::Menu),
    capability(Action::Add, Subject::UserVote),
    capability(Action::List, Subject::UserVote),
];

/// Seeds the built-in roles, their grants and the admin account.
pub async fn seed(db: &DatabaseConnection, config: &AppConfig) -> Result<()> {
    let admin_role = ensure_role(db, ADMIN_ROLE).await?;
    ensure_role(db, RESTAURANT_OWNER_ROLE).await?;
    ensure_role(db, EMPLOYEE_ROLE).await?;

    for capability in all_capabilities() {
        directory::grant_capability(db, ADMIN_ROLE, capability).await?;
    }
    for capability in RESTAURANT_OWNER_GRANTS {
        directory::grant_capability(db, RESTAURANT_OWNER_ROLE, capability).await?;
    }
    for capability in EMPLOYEE_GRANTS {
        directory::grant_capability(db, EMPLOYEE_ROLE, capability).await?;
    }

    if users::get_user_by_username(db, ADMIN_USERNAME)
        .await?
        .is_none()
    {
        users::register_user(
            db,
            NewUser {
                role: admin_role.id,
                email: ADMIN_EMAIL.to_string(),
                username: ADMIN_USERNAME.to_string(),
                password: config.admin_password.clone(),
                confirm_password: config.admin_password.clone(),
                first_name: String::new(),
                last_name: String::new(),
            },
        )
        .await?;
        tracing::info!(username = ADMIN_USERNAME, "created admin account");
    }

    Ok(())
}

async fn ensure_role(
    db: &DatabaseConnection,
    name: &str,
) -> Result<crate::entities::role::Model> {
    if let Some(role) = roles::get_role_by_name(db, name).await? {
        return Ok(role);
    }
    let role = roles::create_role(db, name).await?;
    tracing::info!(role = name, "created built-in role");
    Ok(role)
}
