use async_trait::async_trait;
use chrono::{DateTime, Utc};
use companion_core::{CoreError, Document, DocumentStore};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tokio::task;
use tracing::{debug, warn};
use uuid::Uuid;

pub mod paths;

const FILE_VERSION: u32 = 1;

/// On-disk shape: every collection path with its documents in insertion order.
#[derive(Clone, Serialize, Deserialize)]
struct FileImage {
    version: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    collections: BTreeMap<String, Vec<Document>>,
}

#[derive(Clone)]
struct State {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    collections: BTreeMap<String, Vec<Document>>,
}

impl State {
    fn new_empty() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            collections: BTreeMap::new(),
        }
    }

    fn to_image(&self) -> FileImage {
        FileImage {
            version: FILE_VERSION,
            created_at: self.created_at,
            updated_at: self.updated_at,
            collections: self.collections.clone(),
        }
    }

    fn from_image(img: FileImage) -> Self {
        Self {
            created_at: img.created_at,
            updated_at: img.updated_at,
            collections: img.collections,
        }
    }
}

pub struct JsonStore {
    path: PathBuf,
    backups_dir: PathBuf,
    max_backups: usize,
    state: RwLock<State>,
    writer: Mutex<()>,
}

impl JsonStore {
    pub async fn open_default() -> Result<Self, CoreError> {
        let (file, backups) = paths::default_store_file();
        Self::open_with(file, backups, 10).await
    }

    pub async fn open_with(
        path: PathBuf,
        backups_dir: PathBuf,
        max_backups: usize,
    ) -> Result<Self, CoreError> {
        ensure_parent_dirs(&path)?;
        ensure_dir(&backups_dir)?;
        let state = load_or_init(&path, &backups_dir).await?;
        debug!(path = %path.display(), "json store opened");
        Ok(Self {
            path,
            backups_dir,
            max_backups: max_backups.max(1),
            state: RwLock::new(state),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the state, writes it, and only then
    /// makes it visible. A failed write leaves the store untouched.
    async fn commit<T>(
        &self,
        change: impl FnOnce(&mut State) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let _writer = self.writer.lock().await;
        let mut next = self.state.read().clone();
        let out = change(&mut next)?;
        next.updated_at = Utc::now();
        self.save(next.to_image()).await?;
        *self.state.write() = next;
        Ok(out)
    }

    async fn save(&self, snapshot: FileImage) -> Result<(), CoreError> {
        let path = self.path.clone();
        let backups = self.backups_dir.clone();
        let keep = self.max_backups;

        task::spawn_blocking(move || write_with_backup(&path, &backups, keep, &snapshot))
            .await
            .map_err(|_| CoreError::Storage("io"))?
            .map_err(|e| {
                warn!(error = %e, "json store write failed");
                CoreError::Storage("io")
            })
    }
}

fn ensure_parent_dirs(path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

fn ensure_dir(path: &Path) -> Result<(), CoreError> {
    fs::create_dir_all(path).map_err(|_| CoreError::Storage("io"))
}

async fn load_or_init(path: &Path, backups_dir: &Path) -> Result<State, CoreError> {
    if path.exists() {
        let p = path.to_path_buf();
        let img: FileImage = task::spawn_blocking(move || {
            let mut f = fs::File::open(&p)?;
            let mut buf = String::new();
            f.read_to_string(&mut buf)?;
            let v = serde_json::from_str::<FileImage>(&buf)?;
            Ok::<FileImage, std::io::Error>(v)
        })
        .await
        .map_err(|_| CoreError::Storage("io"))
        .and_then(|r| r.map_err(|_| CoreError::Storage("corrupt store file")))?;
        if img.version != FILE_VERSION {
            return Err(CoreError::Storage("unsupported store file version"));
        }
        Ok(State::from_image(img))
    } else {
        let st = State::new_empty();
        let img = st.to_image();
        write_with_backup(path, backups_dir, 1, &img)
            .map_err(|_| CoreError::Storage("io"))?;
        Ok(st)
    }
}

fn write_with_backup(
    path: &Path,
    backups_dir: &Path,
    max_backups: usize,
    img: &FileImage,
) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::create_dir_all(backups_dir)?;

    let json = serde_json::to_vec_pretty(img)?;
    let mut tmp = NamedTempFile::new_in(path.parent().unwrap_or_else(|| Path::new(".")))?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.persist(path)?;

    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let backup_path = backups_dir.join(format!("classcompanion-{ts}.json"));
    let mut btmp = NamedTempFile::new_in(backups_dir)?;
    btmp.write_all(&json)?;
    btmp.flush()?;
    btmp.persist(&backup_path)?;

    rotate_backups(backups_dir, max_backups)
}

fn rotate_backups(dir: &Path, keep: usize) -> Result<(), std::io::Error> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    entries.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());
    if entries.len() > keep {
        for e in &entries[0..entries.len() - keep] {
            let _ = fs::remove_file(e.path());
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for JsonStore {
    async fn list(&self, path: &str) -> Result<Vec<Document>, CoreError> {
        let s = self.state.read();
        Ok(s.collections.get(path).cloned().unwrap_or_default())
    }

    async fn put(&self, path: &str, id: &str, payload: &Value) -> Result<(), CoreError> {
        self.commit(|s| {
            let docs = s.collections.entry(path.to_string()).or_default();
            match docs.iter_mut().find(|d| d.id == id) {
                Some(doc) => doc.payload = payload.clone(),
                None => docs.push(Document {
                    id: id.to_string(),
                    payload: payload.clone(),
                    created_at: Utc::now(),
                }),
            }
            Ok(())
        })
        .await
    }

    async fn append(&self, path: &str, payload: &Value) -> Result<Document, CoreError> {
        let doc = Document {
            id: Uuid::new_v4().to_string(),
            payload: payload.clone(),
            created_at: Utc::now(),
        };
        self.commit(|s| {
            s.collections
                .entry(path.to_string())
                .or_default()
                .push(doc.clone());
            Ok(())
        })
        .await?;
        Ok(doc)
    }

    async fn delete(&self, path: &str, id: &str) -> Result<(), CoreError> {
        self.commit(|s| {
            let docs = s
                .collections
                .get_mut(path)
                .ok_or(CoreError::NotFound("document"))?;
            let before = docs.len();
            docs.retain(|d| d.id != id);
            if docs.len() == before {
                return Err(CoreError::NotFound("document"));
            }
            Ok(())
        })
        .await
    }
}
