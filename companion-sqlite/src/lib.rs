use chrono::{DateTime, Utc};
use companion_core::{CoreError, Document, DocumentStore};
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let url = format!("sqlite://{}?mode=rwc", path.as_ref().to_string_lossy());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        let store = Self { pool };
        store.ensure_schema().await?;
        debug!(path = %path.as_ref().display(), "sqlite store opened");
        Ok(store)
    }

    /// Every pooled connection to `:memory:` is its own database, so this
    /// pool holds exactly one.
    pub async fn open_memory() -> Result<Self, CoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), CoreError> {
        const STMT: &str = r#"
        CREATE TABLE IF NOT EXISTS documents (
          seq         INTEGER PRIMARY KEY AUTOINCREMENT,
          collection  TEXT NOT NULL,
          id          TEXT NOT NULL,
          payload     TEXT NOT NULL,
          created_at  TEXT NOT NULL,
          UNIQUE (collection, id)
        );

        CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents (collection, seq);
        "#;

        for chunk in STMT.split(';') {
            let sql = chunk.trim();
            if sql.is_empty() {
                continue;
            }
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|_| CoreError::Storage("sqlite schema"))?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentStore for SqliteStore {
    async fn list(&self, path: &str) -> Result<Vec<Document>, CoreError> {
        let rows = sqlx::query(
            "SELECT id,payload,created_at FROM documents WHERE collection=? ORDER BY seq",
        )
        .bind(path)
        .fetch_all(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("read documents"))?;

        rows.into_iter()
            .map(|r| {
                let payload: String = r.get("payload");
                Ok(Document {
                    id: r.get("id"),
                    payload: serde_json::from_str(&payload)
                        .map_err(|_| CoreError::Storage("decode document"))?,
                    created_at: dt_from_str(r.get("created_at"))?,
                })
            })
            .collect()
    }

    async fn put(&self, path: &str, id: &str, payload: &Value) -> Result<(), CoreError> {
        sqlx::query(
            "INSERT INTO documents (collection,id,payload,created_at) VALUES (?,?,?,?)
             ON CONFLICT(collection,id) DO UPDATE SET payload=excluded.payload",
        )
        .bind(path)
        .bind(id)
        .bind(payload.to_string())
        .bind(dt_to_str(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("write document"))?;
        Ok(())
    }

    async fn append(&self, path: &str, payload: &Value) -> Result<Document, CoreError> {
        let doc = Document {
            id: Uuid::new_v4().to_string(),
            payload: payload.clone(),
            created_at: Utc::now(),
        };
        sqlx::query("INSERT INTO documents (collection,id,payload,created_at) VALUES (?,?,?,?)")
            .bind(path)
            .bind(&doc.id)
            .bind(doc.payload.to_string())
            .bind(dt_to_str(doc.created_at))
            .execute(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("insert document"))?;
        Ok(doc)
    }

    async fn delete(&self, path: &str, id: &str) -> Result<(), CoreError> {
        let res = sqlx::query("DELETE FROM documents WHERE collection=? AND id=?")
            .bind(path)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("delete document"))?;
        if res.rows_affected() == 0 {
            return Err(CoreError::NotFound("document"));
        }
        Ok(())
    }
}

fn dt_to_str(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn dt_from_str(s: String) -> Result<DateTime<Utc>, CoreError> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map_err(|_| CoreError::Storage("datetime"))
        .map(|dt| dt.with_timezone(&Utc))
}
