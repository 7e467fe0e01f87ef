use directories::ProjectDirs;
use std::path::PathBuf;

pub fn data_root() -> PathBuf {
    if let Some(pd) = ProjectDirs::from("com", "classcompanion", "ClassCompanion") {
        pd.data_dir().to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

/// `(store file, backups dir)` under the data root.
pub fn default_store_file() -> (PathBuf, PathBuf) {
    let root = data_root();
    (root.join("classcompanion.json"), root.join("backups"))
}

pub fn default_sqlite_file() -> PathBuf {
    data_root().join("classcompanion.sqlite")
}

pub fn default_config_file() -> PathBuf {
    data_root().join("config.json")
}
