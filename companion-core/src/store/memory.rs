use crate::store::{Document, DocumentStore};
use crate::CoreError;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, path: &str) -> Result<Vec<Document>, CoreError> {
        Ok(self
            .collections
            .read()
            .get(path)
            .cloned()
            .unwrap_or_default())
    }

    async fn put(&self, path: &str, id: &str, payload: &Value) -> Result<(), CoreError> {
        let mut m = self.collections.write();
        let docs = m.entry(path.to_string()).or_default();
        if let Some(doc) = docs.iter_mut().find(|d| d.id == id) {
            doc.payload = payload.clone();
        } else {
            docs.push(Document {
                id: id.to_string(),
                payload: payload.clone(),
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn append(&self, path: &str, payload: &Value) -> Result<Document, CoreError> {
        let doc = Document {
            id: Uuid::new_v4().to_string(),
            payload: payload.clone(),
            created_at: Utc::now(),
        };
        self.collections
            .write()
            .entry(path.to_string())
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    async fn delete(&self, path: &str, id: &str) -> Result<(), CoreError> {
        let mut m = self.collections.write();
        let docs = m.get_mut(path).ok_or(CoreError::NotFound("document"))?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Err(CoreError::NotFound("document"));
        }
        Ok(())
    }
}
