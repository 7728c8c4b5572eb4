//! # Item Service
//!
//! Business operations behind the HTTP endpoints: validation, DTO mapping,
//! search and paging.

pub mod dto;
pub mod errors;
pub mod item_service;

pub use dto::{CreateItemDto, GetItemsPageDto, ItemViewModel, ItemsPageViewModel, UpdateItemDto};
pub use errors::{ServiceError, ServiceResult};
pub use item_service::{DefaultItemService, ItemService, PageLimits};
