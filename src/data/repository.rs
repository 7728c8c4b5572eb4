//! Generic entity repository
//!
//! Data access for any `Entity` over the shared `Store`. Reads return
//! deferred `Query<T>` values that callers compose before executing them
//! through `fetch`/`count`.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use super::entity::Entity;
use super::errors::{RepositoryError, RepositoryResult};
use super::store::Store;
use crate::query::{Query, QueryEngine};

/// Common data access operations for entities of type `T`
pub trait Repository<T: Entity>: Send + Sync {
    /// Every entity, ordered by id
    fn get_all(&self) -> RepositoryResult<Vec<T>>;

    /// An unexecuted query over the whole collection
    fn get(&self) -> Query<T>;

    fn get_by_id(&self, id: i64) -> RepositoryResult<Option<T>>;

    /// Store a new entity, stamping audit fields with `user_id`
    fn create(&self, entity: T, user_id: i64) -> RepositoryResult<T>;

    /// Overwrite an existing entity, stamping update audit fields
    fn update(&self, entity: T, user_id: i64) -> RepositoryResult<T>;

    /// Remove an entity; a missing id is not an error
    fn delete(&self, id: i64) -> RepositoryResult<()>;

    /// Execute a query and decode its results
    fn fetch(&self, query: &Query<T>) -> RepositoryResult<Vec<T>>;

    /// Execute a (possibly projected) query and return raw documents
    fn fetch_documents<U>(&self, query: &Query<U>) -> RepositoryResult<Vec<Value>>
    where
        Self: Sized;

    /// Number of results `query` produces
    fn count(&self, query: &Query<T>) -> RepositoryResult<usize>;
}

/// `Repository` implementation backed by the document store
pub struct StoreRepository<T: Entity> {
    store: Arc<Store>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> StoreRepository<T> {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    fn decode(doc: Value) -> RepositoryResult<T> {
        serde_json::from_value(doc).map_err(|e| RepositoryError::Decode {
            collection: T::COLLECTION,
            message: e.to_string(),
        })
    }

    fn encode(entity: &T) -> RepositoryResult<Value> {
        serde_json::to_value(entity).map_err(|e| RepositoryError::Decode {
            collection: T::COLLECTION,
            message: e.to_string(),
        })
    }

    fn decode_all(docs: Vec<Value>) -> RepositoryResult<Vec<T>> {
        docs.into_iter().map(Self::decode).collect()
    }
}

impl<T: Entity> Repository<T> for StoreRepository<T> {
    fn get_all(&self) -> RepositoryResult<Vec<T>> {
        Self::decode_all(self.store.all(T::COLLECTION)?)
    }

    fn get(&self) -> Query<T> {
        Query::from_collection(T::COLLECTION)
    }

    fn get_by_id(&self, id: i64) -> RepositoryResult<Option<T>> {
        self.store
            .get(T::COLLECTION, id)?
            .map(Self::decode)
            .transpose()
    }

    fn create(&self, mut entity: T, user_id: i64) -> RepositoryResult<T> {
        entity.meta_mut().mark_created(user_id);
        let mut doc = Self::encode(&entity)?;

        let doc = self.store.insert_with(T::COLLECTION, |id| {
            if let Some(obj) = doc.as_object_mut() {
                obj.insert("id".to_string(), Value::from(id));
            }
            doc
        })?;
        Self::decode(doc)
    }

    fn update(&self, mut entity: T, user_id: i64) -> RepositoryResult<T> {
        entity.meta_mut().mark_updated(user_id);
        let id = entity.id();
        let doc = Self::encode(&entity)?;

        if !self.store.replace(T::COLLECTION, id, doc)? {
            return Err(RepositoryError::NotFound {
                collection: T::COLLECTION,
                id,
            });
        }
        Ok(entity)
    }

    fn delete(&self, id: i64) -> RepositoryResult<()> {
        self.store.remove(T::COLLECTION, id)?;
        Ok(())
    }

    fn fetch(&self, query: &Query<T>) -> RepositoryResult<Vec<T>> {
        Self::decode_all(self.fetch_documents(query)?)
    }

    fn fetch_documents<U>(&self, query: &Query<U>) -> RepositoryResult<Vec<Value>> {
        let engine = QueryEngine::new(self.store.as_ref());
        Ok(engine.execute(query.expr())?)
    }

    fn count(&self, query: &Query<T>) -> RepositoryResult<usize> {
        let engine = QueryEngine::new(self.store.as_ref());
        Ok(engine.count(query.expr())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::entity::ANONYMOUS_USER_ID;
    use crate::data::item::Item;
    use crate::query::Predicate;
    use serde_json::json;

    fn repo() -> StoreRepository<Item> {
        StoreRepository::new(Arc::new(Store::in_memory()))
    }

    #[test]
    fn test_create_stamps_audit_fields() {
        let repo = repo();
        let item = repo.create(Item::new("Name", "Description"), 123).unwrap();
        assert_eq!(item.id(), 1);
        assert_eq!(item.meta.created_by_user_id, 123);
        assert_eq!(item.meta.updated_by_user_id, 123);
        assert_eq!(repo.get_by_id(1).unwrap(), Some(item));
    }

    #[test]
    fn test_update() {
        let repo = repo();
        let mut item = repo.create(Item::new("Old", ""), 1).unwrap();
        item.name = "New".to_string();
        let updated = repo.update(item, 2).unwrap();

        let stored = repo.get_by_id(updated.id()).unwrap().unwrap();
        assert_eq!(stored.name, "New");
        assert_eq!(stored.meta.created_by_user_id, 1);
        assert_eq!(stored.meta.updated_by_user_id, 2);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let repo = repo();
        let mut item = Item::new("Ghost", "");
        item.meta.id = 42;
        let result = repo.update(item, ANONYMOUS_USER_ID);
        assert!(matches!(result, Err(RepositoryError::NotFound { id: 42, .. })));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let repo = repo();
        repo.create(Item::new("Keep", ""), 1).unwrap();
        repo.delete(99).unwrap();
        assert_eq!(repo.get_all().unwrap().len(), 1);
        repo.delete(1).unwrap();
        assert!(repo.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_query_is_deferred() {
        let repo = repo();
        let query = repo.get().filter(Predicate::gt("id", json!(1)));
        for i in 0..3 {
            repo.create(Item::new(format!("Name {}", i), ""), 1).unwrap();
        }
        assert_eq!(repo.count(&query).unwrap(), 2);
        let names: Vec<String> = repo
            .fetch(&query.order_by_descending("id"))
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Name 2", "Name 1"]);
    }

    #[test]
    fn test_fetch_documents_projection() {
        let repo = repo();
        repo.create(Item::new("Only", "x"), 1).unwrap();
        let docs = repo.fetch_documents(&repo.get().select(["name"])).unwrap();
        assert_eq!(docs, vec![json!({"name": "Only"})]);
    }
}
