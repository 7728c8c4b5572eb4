//! Order-aware paging
//!
//! `skip`/`take` over an unordered source gives page contents that can change
//! between calls. Before paging, a query without any ordering operator gets
//! a default `order_by` appended.

use serde::Serialize;

use super::entity::Entity;
use super::errors::{RepositoryError, RepositoryResult};
use super::repository::Repository;
use crate::observability::{log_event_with_fields, Event};
use crate::query::{is_ordered, Query};

/// Sort key used when a query has no ordering
pub const DEFAULT_ORDER_KEY: &str = "id";

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served
    pub page: usize,
    pub page_count: usize,
    /// Results across all pages
    pub result_count: usize,
}

impl<T> Page<T> {
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_count: self.page_count,
            result_count: self.result_count,
        }
    }
}

/// Number of pages needed for `result_count` results
pub fn page_count(result_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    result_count.div_ceil(page_size)
}

/// Returns `query` unchanged if it is ordered, else ordered by `default_key`
pub fn ensure_ordered<T>(query: &Query<T>, default_key: &str) -> RepositoryResult<Query<T>> {
    if is_ordered(Some(query))? {
        return Ok(query.clone());
    }
    log_event_with_fields(
        Event::DefaultOrderApplied,
        &[("key", default_key), ("query", &query.explain())],
    );
    Ok(query.order_by(default_key))
}

/// Fetch one page of `query`.
///
/// Pages are 1-based; a page below 1 is served as page 1. `page_size` must be
/// at least 1.
pub fn paginate<T, R>(
    repo: &R,
    query: &Query<T>,
    page: usize,
    page_size: usize,
    default_key: &str,
) -> RepositoryResult<Page<T>>
where
    T: Entity,
    R: Repository<T> + ?Sized,
{
    if page_size == 0 {
        return Err(RepositoryError::InvalidArgument(
            "page size must be at least 1".to_string(),
        ));
    }
    let page = page.max(1);

    let result_count = repo.count(query)?;
    let ordered = ensure_ordered(query, default_key)?;
    let offset = (page - 1).saturating_mul(page_size);
    let items = repo.fetch(&ordered.skip(offset).take(page_size))?;

    Ok(Page {
        items,
        page,
        page_count: page_count(result_count, page_size),
        result_count,
    })
}
