use companion_core::{CoreError, DisplayWindow, WallTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const SCHEMA: u8 = 1;

/// `config.json` under the data directory. Created with defaults on first run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub schema: u8,
    pub display_start: WallTime,
    pub display_end: WallTime,
    pub row_height: u16,
    pub default_question_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggest_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_bank: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let window = DisplayWindow::default();
        Self {
            schema: SCHEMA,
            display_start: window.start,
            display_end: window.end,
            row_height: 2,
            default_question_count: 10,
            suggest_endpoint: None,
            question_bank: None,
        }
    }
}

impl AppConfig {
    pub fn load_or_create(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            let cfg = Self::default();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| CoreError::Config(e.to_string()))?;
            }
            let json = serde_json::to_string_pretty(&cfg)
                .map_err(|e| CoreError::Config(e.to_string()))?;
            fs::write(path, json).map_err(|e| CoreError::Config(e.to_string()))?;
            info!(path = %path.display(), "wrote default config");
            return Ok(cfg);
        }
        let raw = fs::read_to_string(path).map_err(|e| CoreError::Config(e.to_string()))?;
        let cfg: Self = serde_json::from_str(&raw)
            .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.schema != SCHEMA {
            return Err(CoreError::Config(format!(
                "unsupported config schema {} (expected {SCHEMA})",
                self.schema
            )));
        }
        if self.row_height == 0 {
            return Err(CoreError::Config("rowHeight must be positive".into()));
        }
        if self.default_question_count == 0 {
            return Err(CoreError::Config("defaultQuestionCount must be positive".into()));
        }
        self.window().map(|_| ())
    }

    pub fn window(&self) -> Result<DisplayWindow, CoreError> {
        DisplayWindow::new(self.display_start, self.display_end)
            .map_err(|e| CoreError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let cfg = AppConfig::load_or_create(&path).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert!(path.exists());

        let again = AppConfig::load_or_create(&path).unwrap();
        assert_eq!(again.window().unwrap(), DisplayWindow::default());
    }

    #[test]
    fn rejects_unknown_schema_and_bad_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        fs::write(&path, r#"{"schema":2,"displayStart":"08:00","displayEnd":"22:00","rowHeight":2,"defaultQuestionCount":10}"#).unwrap();
        assert!(matches!(AppConfig::load_or_create(&path), Err(CoreError::Config(_))));

        fs::write(&path, r#"{"schema":1,"displayStart":"18:00","displayEnd":"09:00","rowHeight":2,"defaultQuestionCount":10}"#).unwrap();
        assert!(matches!(AppConfig::load_or_create(&path), Err(CoreError::Config(_))));
    }
}
