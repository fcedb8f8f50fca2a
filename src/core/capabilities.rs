//! Capability vocabulary shared by authorization, seeding, and the HTTP layer.
//!
//! A capability is a fixed string of the form `{action}_{subject}`, for
//! example `add_restaurant` or `list_uservote`. The full vocabulary is a
//! static table so that authorization checks compare interned `&'static str`
//! values and never build strings at request time. Listing a collection is
//! deliberately a different capability from viewing a single record.

/// The verbs a capability can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Retrieve a single record by id.
    View,
    /// Enumerate a collection.
    List,
    Add,
    Change,
    Delete,
}

impl Action {
    /// Every action, in the order the seeded grants are written.
    pub const ALL: [Self; 5] = [
        Self::View,
        Self::List,
        Self::Add,
        Self::Change,
        Self::Delete,
    ];
}

/// The record kinds capabilities are scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Restaurant,
    FoodItem,
    Menu,
    Role,
    User,
    UserVote,
}

impl Subject {
    /// Every subject in the vocabulary.
    pub const ALL: [Self; 6] = [
        Self::Restaurant,
        Self::FoodItem,
        Self::Menu,
        Self::Role,
        Self::User,
        Self::UserVote,
    ];
}

/// Returns the capability name for an action on a subject.
///
/// The names are fixed at compile time; `capability(Action::List,
/// Subject::FoodItem)` is `"list_fooditem"`.
#[must_use]
pub const fn capability(action: Action, subject: Subject) -> &'static str {
    match (action, subject) {
        (Action::View, Subject::Restaurant) => "view_restaurant",
        (Action::List, Subject::Restaurant) => "list_restaurant",
        (Action::Add, Subject::Restaurant) => "add_restaurant",
        (Action::Change, Subject::Restaurant) => "change_restaurant",
        (Action::Delete, Subject::Restaurant) => "delete_restaurant",

        (Action::View, Subject::FoodItem) => "view_fooditem",
        (Action::List, Subject::FoodItem) => "list_fooditem",
        (Action::Add, Subject::FoodItem) => "add_fooditem",
        (Action::Change, Subject::FoodItem) => "change_fooditem",
        (Action::Delete, Subject::FoodItem) => "delete_fooditem",

        (Action::View, Subject::Menu) => "view_menu",
        (Action::List, Subject::Menu) => "list_menu",
        (Action::Add, Subject::Menu) => "add_menu",
        (Action::Change, Subject::Menu) => "change_menu",
        (Action::Delete, Subject::Menu) => "delete_menu",

        (Action::View, Subject::Role) => "view_role",
        (Action::List, Subject::Role) => "list_role",
        (Action::Add, Subject::Role) => "add_role",
        (Action::Change, Subject::Role) => "change_role",
        (Action::Delete, Subject::Role) => "delete_role",

        (Action::View, Subject::User) => "view_user",
        (Action::List, Subject::User) => "list_user",
        (Action::Add, Subject::User) => "add_user",
        (Action::Change, Subject::User) => "change_user",
        (Action::Delete, Subject::User) => "delete_user",

        (Action::View, Subject::UserVote) => "view_uservote",
        (Action::List, Subject::UserVote) => "list_uservote",
        (Action::Add, Subject::UserVote) => "add_uservote",
        (Action::Change, Subject::UserVote) => "change_uservote",
        (Action::Delete, Subject::UserVote) => "delete_uservote",
    }
}

/// Iterates over every capability name in the vocabulary.
pub fn all_capabilities() -> impl Iterator<Item = &'static str> {
    Subject::ALL
        .iter()
        .flat_map(|subject| Action::ALL.iter().map(|action| capability(*action, *subject)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_capability_names_follow_action_subject_convention() {
        assert_eq!(capability(Action::Add, Subject::Restaurant), "add_restaurant");
        assert_eq!(capability(Action::List, Subject::FoodItem), "list_fooditem");
        assert_eq!(capability(Action::View, Subject::Menu), "view_menu");
        assert_eq!(capability(Action::Add, Subject::UserVote), "add_uservote");
        assert_eq!(capability(Action::Delete, Subject::Role), "delete_role");
    }

    #[test]
    fn test_list_and_view_are_distinct_capabilities() {
        for subject in Subject::ALL {
            assert_ne!(
                capability(Action::List, subject),
                capability(Action::View, subject)
            );
        }
    }

    #[test]
    fn test_vocabulary_covers_every_action_subject_pair_once() {
        let names: HashSet<&'static str> = all_capabilities().collect();
        assert_eq!(names.len(), Action::ALL.len() * Subject::ALL.len());
    }
}
