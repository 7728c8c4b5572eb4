//! Item business operations

use super::dto::{CreateItemDto, ItemViewModel, ItemsPageViewModel, UpdateItemDto};
use super::errors::{ServiceError, ServiceResult};
use crate::data::{paginate, Item, Repository, DEFAULT_ORDER_KEY};
use crate::observability::{log_event_with_fields, Event};
use crate::query::Predicate;

/// Page size bounds applied to page requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

pub trait ItemService: Send + Sync {
    fn create_item(&self, item: CreateItemDto, user_id: i64) -> ServiceResult<ItemViewModel>;

    fn get_item(&self, id: i64) -> ServiceResult<ItemViewModel>;

    /// A page of items whose name or description contains `query`, sorted
    /// by name
    fn get_items_page(
        &self,
        query: Option<&str>,
        page: usize,
        page_size: Option<usize>,
        descending: bool,
    ) -> ServiceResult<ItemsPageViewModel>;

    fn update_item(&self, item: UpdateItemDto, user_id: i64) -> ServiceResult<()>;

    fn delete_item(&self, id: i64) -> ServiceResult<()>;
}

pub struct DefaultItemService<R: Repository<Item>> {
    repo: R,
    limits: PageLimits,
}

impl<R: Repository<Item>> DefaultItemService<R> {
    pub fn new(repo: R, limits: PageLimits) -> Self {
        Self { repo, limits }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn resolve_page_size(&self, requested: Option<usize>) -> ServiceResult<usize> {
        match requested {
            None | Some(0) => Ok(self.limits.default_page_size),
            Some(n) if n > self.limits.max_page_size => Err(ServiceError::InvalidArgument(format!(
                "Page size {} exceeds maximum {}",
                n, self.limits.max_page_size
            ))),
            Some(n) => Ok(n),
        }
    }
}

fn validate_name(name: &str) -> ServiceResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidArgument(
            "Item name is required".to_string(),
        ));
    }
    Ok(name.to_string())
}

impl<R: Repository<Item>> ItemService for DefaultItemService<R> {
    fn create_item(&self, item: CreateItemDto, user_id: i64) -> ServiceResult<ItemViewModel> {
        let name = validate_name(&item.name)?;
        let created = self.repo.create(Item::new(name, item.description), user_id)?;

        log_event_with_fields(
            Event::ItemCreated,
            &[
                ("item_id", &created.meta.id.to_string()),
                ("user_id", &user_id.to_string()),
            ],
        );
        Ok(created.into())
    }

    fn get_item(&self, id: i64) -> ServiceResult<ItemViewModel> {
        self.repo
            .get_by_id(id)?
            .map(ItemViewModel::from)
            .ok_or(ServiceError::NotFound(id))
    }

    fn get_items_page(
        &self,
        query: Option<&str>,
        page: usize,
        page_size: Option<usize>,
        descending: bool,
    ) -> ServiceResult<ItemsPageViewModel> {
        let page_size = self.resolve_page_size(page_size)?;

        let mut items = self.repo.get();
        if let Some(text) = query.map(str::trim).filter(|t| !t.is_empty()) {
            items = items.filter(
                Predicate::contains("name", text).or(Predicate::contains("description", text)),
            );
        }
        items = if descending {
            items.order_by_descending("name")
        } else {
            items.order_by("name")
        };

        log_event_with_fields(
            Event::PageRequested,
            &[
                ("page", &page.to_string()),
                ("page_size", &page_size.to_string()),
                ("query", &items.explain()),
            ],
        );

        let page = paginate(&self.repo, &items, page, page_size, DEFAULT_ORDER_KEY)?;
        Ok(page.into())
    }

    fn update_item(&self, item: UpdateItemDto, user_id: i64) -> ServiceResult<()> {
        let name = validate_name(&item.name)?;
        let mut existing = self
            .repo
            .get_by_id(item.id)?
            .ok_or(ServiceError::NotFound(item.id))?;

        existing.name = name;
        existing.description = item.description;
        self.repo.update(existing, user_id)?;

        log_event_with_fields(
            Event::ItemUpdated,
            &[
                ("item_id", &item.id.to_string()),
                ("user_id", &user_id.to_string()),
            ],
        );
        Ok(())
    }

    fn delete_item(&self, id: i64) -> ServiceResult<()> {
        self.repo.delete(id)?;
        log_event_with_fields(Event::ItemDeleted, &[("item_id", &id.to_string())]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Store, StoreRepository};
    use std::sync::Arc;

    fn service() -> DefaultItemService<StoreRepository<Item>> {
        let repo = StoreRepository::new(Arc::new(Store::in_memory()));
        DefaultItemService::new(repo, PageLimits::default())
    }

    fn create(svc: &DefaultItemService<StoreRepository<Item>>, name: &str, description: &str) -> ItemViewModel {
        svc.create_item(
            CreateItemDto {
                name: name.to_string(),
                description: description.to_string(),
            },
            123,
        )
        .unwrap()
    }

    #[test]
    fn test_create_item() {
        let svc = service();
        let vm = create(&svc, "Name", "Description");
        assert_eq!(vm.id, 1);
        assert_eq!(vm.name, "Name");
        assert_eq!(vm.description, "Description");

        let stored = svc.repository().get_by_id(1).unwrap().unwrap();
        assert_eq!(stored.meta.created_by_user_id, 123);
    }

    #[test]
    fn test_create_requires_name() {
        let svc = service();
        let result = svc.create_item(
            CreateItemDto {
                name: "   ".to_string(),
                description: String::new(),
            },
            1,
        );
        assert!(matches!(result, Err(ServiceError::InvalidArgument(_))));
    }

    #[test]
    fn test_get_items_page_filters_and_sorts() {
        let svc = service();
        create(&svc, "Banana", "yellow fruit");
        create(&svc, "Apple", "red fruit");
        create(&svc, "Carrot", "vegetable");
        create(&svc, "Cherry", "Red and small");

        let page = svc.get_items_page(Some("red"), 1, Some(10), false).unwrap();
        let names: Vec<&str> = page.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "Cherry"]);
        assert_eq!(page.result_count, 2);
        assert_eq!(page.page_count, 1);

        let page = svc.get_items_page(None, 1, Some(3), true).unwrap();
        let names: Vec<&str> = page.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Cherry", "Carrot", "Banana"]);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.result_count, 4);
    }

    #[test]
    fn test_page_size_limits() {
        let svc = service();
        for i in 0..12 {
            create(&svc, &format!("Name {:02}", i), "");
        }
        let page = svc.get_items_page(None, 1, None, false).unwrap();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.page_count, 2);

        let result = svc.get_items_page(None, 1, Some(101), false);
        assert!(matches!(result, Err(ServiceError::InvalidArgument(_))));
    }

    #[test]
    fn test_update_item() {
        let svc = service();
        let vm = create(&svc, "Item", "Old");
        svc.update_item(
            UpdateItemDto {
                id: vm.id,
                name: "Edited Item".to_string(),
                description: "This item was edited".to_string(),
            },
            234,
        )
        .unwrap();

        let updated = svc.get_item(vm.id).unwrap();
        assert_eq!(updated.name, "Edited Item");
        assert_eq!(updated.description, "This item was edited");
        let stored = svc.repository().get_by_id(vm.id).unwrap().unwrap();
        assert_eq!(stored.meta.updated_by_user_id, 234);
        assert_eq!(stored.meta.created_by_user_id, 123);
    }

    #[test]
    fn test_update_unknown_item() {
        let svc = service();
        let result = svc.update_item(
            UpdateItemDto {
                id: 77,
                name: "x".to_string(),
                description: String::new(),
            },
            1,
        );
        assert!(matches!(result, Err(ServiceError::NotFound(77))));
    }

    #[test]
    fn test_delete_item() {
        let svc = service();
        let vm = create(&svc, "Gone", "");
        svc.delete_item(vm.id).unwrap();
        assert!(matches!(svc.get_item(vm.id), Err(ServiceError::NotFound(_))));
        svc.delete_item(vm.id).unwrap();
    }
}
