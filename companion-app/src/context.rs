use crate::cli::opts::{Cli, StoreKind};
use crate::config::AppConfig;
use anyhow::{anyhow, Result};
use companion_core::{
    Credentials, DisplayWindow, DocumentStore, MemoryAuth, Session, SessionContext,
    TimetableService,
};
use companion_json::paths::{default_config_file, default_sqlite_file};
use companion_json::JsonStore;
use companion_sqlite::SqliteStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a command needs once the user is signed in and the
/// timetable is loaded.
pub struct AppContext {
    pub config: AppConfig,
    pub window: DisplayWindow,
    pub store: Arc<dyn DocumentStore>,
    pub session: Arc<SessionContext>,
    pub timetable: Arc<TimetableService>,
    pub user: Session,
}

impl AppContext {
    pub async fn open(args: &Cli) -> Result<Self> {
        let config_path = args.config.clone().unwrap_or_else(default_config_file);
        let config = AppConfig::load_or_create(&config_path)?;
        let window = config.window()?;

        let store = open_store(&args.store, args.db_path.clone()).await?;

        let email = args
            .email
            .clone()
            .ok_or_else(|| anyhow!("pass --email or set COMPANION_EMAIL"))?;
        let password = args
            .password
            .clone()
            .ok_or_else(|| anyhow!("pass --password or set COMPANION_PASSWORD"))?;

        let session = Arc::new(SessionContext::new(Arc::new(MemoryAuth::offline())));
        let timetable = Arc::new(TimetableService::new(store.clone()));
        timetable.follow(&session);

        let user = session.sign_in(&Credentials::new(email, password)).await?;
        timetable.load(&user.user_id).await?;

        Ok(Self {
            config,
            window,
            store,
            session,
            timetable,
            user,
        })
    }

    pub fn row_height(&self) -> f32 {
        self.config.row_height as f32
    }
}

pub async fn open_store(store: &StoreKind, db_path: Option<PathBuf>) -> Result<Arc<dyn DocumentStore>> {
    match store {
        StoreKind::Json => {
            let s = JsonStore::open_default().await?;
            Ok(Arc::new(s))
        }
        StoreKind::Sqlite => {
            let p = db_path.unwrap_or_else(default_sqlite_file);
            if let Some(parent) = p.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            let s = SqliteStore::open_file(&p).await?;
            Ok(Arc::new(s))
        }
    }
}
