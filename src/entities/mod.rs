//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod food_item;
pub mod group_capability;
pub mod menu;
pub mod menu_food_item;
pub mod permission_group;
pub mod restaurant;
pub mod role;
pub mod user;
pub mod user_group;
pub mod vote;

// Re-export specific types to avoid conflicts
pub use food_item::{Entity as FoodItem, FoodType, Model as FoodItemModel};
pub use group_capability::{Entity as GroupCapability, Model as GroupCapabilityModel};
pub use menu::{DayOfWeek, Entity as Menu, Model as MenuModel};
pub use menu_food_item::{Entity as MenuFoodItem, Model as MenuFoodItemModel};
pub use permission_group::{Entity as PermissionGroup, Model as PermissionGroupModel};
pub use restaurant::{Entity as Restaurant, Model as RestaurantModel};
pub use role::{Entity as Role, Model as RoleModel};
pub use user::{Entity as User, Model as UserModel};
pub use user_group::{Entity as UserGroup, Model as UserGroupModel};
pub use vote::{Entity as Vote, Model as VoteModel};
