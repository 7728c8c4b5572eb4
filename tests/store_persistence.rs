//! Store Persistence Tests
//!
//! Items written through the service survive a reopen of the data file,
//! including audit fields and the id sequence.

use std::sync::Arc;

use itemsvc::data::{Item, Repository, Store, StoreRepository};
use itemsvc::service::{CreateItemDto, DefaultItemService, ItemService, PageLimits, UpdateItemDto};
use tempfile::TempDir;

fn service_at(path: &std::path::Path) -> DefaultItemService<StoreRepository<Item>> {
    let store = Arc::new(Store::open(path).unwrap());
    DefaultItemService::new(StoreRepository::new(store), PageLimits::default())
}

fn dto(name: &str) -> CreateItemDto {
    CreateItemDto {
        name: name.to_string(),
        description: format!("{} description", name),
    }
}

#[test]
fn test_items_survive_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("items.json");

    {
        let service = service_at(&path);
        service.create_item(dto("Charlie"), 5).unwrap();
        service.create_item(dto("Alpha"), 5).unwrap();
        service.create_item(dto("Bravo"), 5).unwrap();
        service
            .update_item(
                UpdateItemDto {
                    id: 2,
                    name: "Alpha Prime".to_string(),
                    description: String::new(),
                },
                9,
            )
            .unwrap();
        service.delete_item(3).unwrap();
    }

    let service = service_at(&path);
    let page = service.get_items_page(None, 1, None, false).unwrap();
    let names: Vec<&str> = page.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha Prime", "Charlie"]);
    assert_eq!(page.result_count, 2);

    let stored = service.repository().get_by_id(2).unwrap().unwrap();
    assert_eq!(stored.meta.created_by_user_id, 5);
    assert_eq!(stored.meta.updated_by_user_id, 9);
    assert!(stored.meta.updated_at >= stored.meta.created_at);
}

#[test]
fn test_id_sequence_continues_after_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("items.json");

    {
        let service = service_at(&path);
        service.create_item(dto("One"), 1).unwrap();
        service.create_item(dto("Two"), 1).unwrap();
        service.delete_item(2).unwrap();
    }

    let service = service_at(&path);
    let created = service.create_item(dto("Three"), 1).unwrap();
    assert_eq!(created.id, 3);
}
