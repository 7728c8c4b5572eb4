//! # Data Access
//!
//! Entities, the document store, the generic repository and paging.

pub mod entity;
pub mod errors;
pub mod item;
pub mod paging;
pub mod repository;
pub mod store;

pub use entity::{Entity, EntityMeta, ANONYMOUS_USER_ID};
pub use errors::{RepositoryError, RepositoryResult, StoreError, StoreResult};
pub use item::Item;
pub use paging::{ensure_ordered, page_count, paginate, Page, DEFAULT_ORDER_KEY};
pub use repository::{Repository, StoreRepository};
pub use store::Store;
