//! Request DTOs and response view models

use serde::{Deserialize, Serialize};

use crate::data::{Item, Page};

/// Body of a create request
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemDto {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Body of an update request
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemDto {
    /// May be omitted when the id is carried by the request path
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Query string of a page request
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetItemsPageDto {
    /// Case-insensitive text matched against name and description
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default = "default_page")]
    pub page: usize,
    /// Falls back to the configured default when absent or zero
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub descending: bool,
}

fn default_page() -> usize {
    1
}

impl Default for GetItemsPageDto {
    fn default() -> Self {
        Self {
            query: None,
            page: default_page(),
            page_size: None,
            descending: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemViewModel {
    pub id: i64,
    pub name: String,
    pub description: String,
}

impl From<Item> for ItemViewModel {
    fn from(item: Item) -> Self {
        Self {
            id: item.meta.id,
            name: item.name,
            description: item.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsPageViewModel {
    pub items: Vec<ItemViewModel>,
    pub page: usize,
    pub page_count: usize,
    pub result_count: usize,
}

impl From<Page<Item>> for ItemsPageViewModel {
    fn from(page: Page<Item>) -> Self {
        let page = page.map(ItemViewModel::from);
        Self {
            items: page.items,
            page: page.page,
            page_count: page.page_count,
            result_count: page.result_count,
        }
    }
}
