//! Core business logic - framework-agnostic operations over the vote
//! service's entities.
//!
//! Functions here take a database connection (or anything implementing
//! `ConnectionTrait` when they do not manage transactions themselves) and
//! return domain results. Nothing in this tree knows about HTTP.

/// Capability checks and restaurant ownership gates
pub mod authorize;
/// Startup seeding of roles, grants and the admin account
pub mod bootstrap;
/// The fixed action-by-subject capability vocabulary
pub mod capabilities;
/// Permission groups: role mirrors, grants and memberships
pub mod directory;
/// Food items offered by restaurants
pub mod food_items;
/// Shared search, ordering and pagination for collection queries
pub mod listing;
/// Daily menus and their food item links
pub mod menus;
/// Restaurant records and ownership
pub mod restaurants;
/// Roles and their group mirrors
pub mod roles;
/// User registration and profile management
pub mod users;
/// Vote casting, tallying and the daily winner
pub mod votes;
