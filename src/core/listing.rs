//! Shared listing facade: substring search, client-chosen ordering and
//! opt-in pagination over any entity select.
//!
//! Every collection endpoint funnels through [`run_listing`] so the query
//! grammar stays uniform. Callers declare which columns are searchable and
//! sortable; anything else a client asks for falls back to the default
//! ordering instead of erroring.

use crate::errors::Result;
use sea_orm::{
    Condition, ConnectionTrait, EntityTrait, FromQueryResult, Order, PaginatorTrait, QueryFilter,
    QueryOrder, Select, prelude::*,
};
use serde::Deserialize;

/// Page size used when a client paginates without saying how much.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Query-string parameters accepted by every collection endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Case-insensitive substring matched against the endpoint's search
    /// columns, any of them.
    pub search: Option<String>,
    /// Column name to sort by, prefixed with `-` for descending.
    pub ordering: Option<String>,
    /// 1-based page number. Its presence switches the response to the
    /// paginated envelope.
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// Result of a listing query.
#[derive(Debug, Clone)]
pub struct Page<M> {
    pub rows: Vec<M>,
    /// Total matching rows across all pages. `None` when the client did
    /// not paginate.
    pub total: Option<u64>,
}

/// Applies search, ordering and pagination to `base` and runs it.
pub async fn run_listing<E, C>(
    db: &C,
    base: Select<E>,
    params: &ListParams,
    search_columns: &[E::Column],
    sortable: &[(&str, E::Column)],
    default_order: (E::Column, Order),
) -> Result<Page<E::Model>>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Sized + Send + Sync,
    C: ConnectionTrait,
{
    let mut query = base;

    if let Some(term) = params.search.as_deref().filter(|term| !term.is_empty()) {
        let mut any_column = Condition::any();
        for column in search_columns {
            any_column = any_column.add(column.contains(term));
        }
        query = query.filter(any_column);
    }

    let (column, order) = resolve_ordering(params.ordering.as_deref(), sortable, default_order);
    query = query.order_by(column, order);

    if let Some(page) = params.page {
        let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let paginator = query.paginate(db, page_size);
        let total = paginator.num_items().await?;
        // Clients count pages from 1, the paginator from 0.
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        return Ok(Page {
            rows,
            total: Some(total),
        });
    }

    let rows = query.all(db).await?;
    Ok(Page { rows, total: None })
}

/// Maps a requested ordering onto the endpoint's sortable columns,
/// falling back to the default when the name is unknown.
fn resolve_ordering<Col: Copy>(
    requested: Option<&str>,
    sortable: &[(&str, Col)],
    default: (Col, Order),
) -> (Col, Order) {
    let Some(raw) = requested.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return default;
    };
    let (name, order) = match raw.strip_prefix('-') {
        Some(rest) => (rest, Order::Desc),
        None => (raw, Order::Asc),
    };
    sortable
        .iter()
        .find(|(key, _)| *key == name)
        .map_or(default, |(_, column)| (*column, order))
}
