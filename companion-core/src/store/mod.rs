use crate::CoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod memory;

/// One stored document of a collection.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

/// Remote document database, addressed by collection path
/// (e.g. `users/<uid>/timetable`).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents of `path` in insertion order. Unknown paths are empty.
    async fn list(&self, path: &str) -> Result<Vec<Document>, CoreError>;

    /// Creates or replaces the document `id`.
    async fn put(&self, path: &str, id: &str, payload: &Value) -> Result<(), CoreError>;

    /// Stores `payload` under a store-assigned id and timestamp.
    async fn append(&self, path: &str, payload: &Value) -> Result<Document, CoreError>;

    async fn delete(&self, path: &str, id: &str) -> Result<(), CoreError>;
}
