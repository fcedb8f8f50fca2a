//! Request handlers grouped by resource.
//!
//! Each submodule owns the wire types for one resource and the handlers
//! the router mounts for it.

/// Login and token refresh
pub mod auth;
/// Food item collection and records
pub mod food_items;
/// Menu publication, updates and the current-day listing
pub mod menus;
/// Restaurant collection and records
pub mod restaurants;
/// Role collection and records
pub mod roles;
/// Registration and user administration
pub mod users;
/// Vote casting, tally and winner
pub mod votes;

use crate::core::listing::Page;
use serde::Serialize;

/// Collection response: a plain array, or the count/results envelope when
/// the client asked for a page.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Plain(Vec<T>),
    Paginated { count: u64, results: Vec<T> },
}

impl<T> ListResponse<T> {
    /// Wraps rows already shaped for the wire, keeping the pagination
    /// decision made when the page was fetched.
    pub fn new(rows: Vec<T>, total: Option<u64>) -> Self {
        match total {
            Some(count) => Self::Paginated {
                count,
                results: rows,
            },
            None => Self::Plain(rows),
        }
    }

    /// Shapes a page of models into a collection response.
    pub fn from_page<M>(page: Page<M>, shape: impl FnMut(M) -> T) -> Self {
        let rows = page.rows.into_iter().map(shape).collect();
        Self::new(rows, page.total)
    }
}
