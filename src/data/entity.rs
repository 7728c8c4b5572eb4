//! Base entity
//!
//! Every stored record carries the same identity and audit fields. Entities
//! embed `EntityMeta` with `#[serde(flatten)]`, so the fields sit at the top
//! level of the stored document.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// User id recorded when no user is known
pub const ANONYMOUS_USER_ID: i64 = -1;

/// Identity and audit fields shared by all entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMeta {
    /// Primary key, assigned by the store on create
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub created_by_user_id: i64,
    pub updated_at: DateTime<Utc>,
    pub updated_by_user_id: i64,
}

impl Default for EntityMeta {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            created_at: now,
            created_by_user_id: ANONYMOUS_USER_ID,
            updated_at: now,
            updated_by_user_id: ANONYMOUS_USER_ID,
        }
    }
}

impl EntityMeta {
    /// Stamp creation audit fields
    pub fn mark_created(&mut self, user_id: i64) {
        let now = Utc::now();
        self.created_at = now;
        self.updated_at = now;
        self.created_by_user_id = user_id;
        self.updated_by_user_id = user_id;
    }

    /// Stamp update audit fields
    pub fn mark_updated(&mut self, user_id: i64) {
        self.updated_at = Utc::now();
        self.updated_by_user_id = user_id;
    }
}

/// A record type managed by a repository.
///
/// Implementors serialize to a JSON object with the `EntityMeta` fields
/// flattened in, so `id` is a top-level key of the stored document.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Store collection holding this entity
    const COLLECTION: &'static str;

    fn meta(&self) -> &EntityMeta;

    fn meta_mut(&mut self) -> &mut EntityMeta;

    fn id(&self) -> i64 {
        self.meta().id
    }
}
