// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::retention::prune_oldest;

const BACKUPS_KEPT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub stopwords: StopwordsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    /// Path to the pipeline artifact
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StopwordsConfig {
    /// Custom word list; the bundled English list is used when unset
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_cleaned_text: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { show_cleaned_text: true }
    }
}

fn default_true() -> bool { true }

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Use a specific file instead of `<dir>/config.json`
    pub fn with_file(config_file: PathBuf) -> Self {
        let config_dir = config_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("headline-detector"))
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), String> {
        fs::create_dir_all(&self.config_dir)
            .map_err(|e| format!("Failed to create config dir: {}", e))
    }

    /// Load configuration from file
    pub fn load(&self) -> Result<AppConfig, String> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), String> {
        self.ensure_dir()?;

        // Create backup if file exists
        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(&self.config_file, content)
            .map_err(|e| format!("Failed to write config: {}", e))
    }

    /// Create a backup of current config
    fn create_backup(&self) -> Result<(), String> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir)
            .map_err(|e| format!("Failed to create backup dir: {}", e))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%.3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file)
            .map_err(|e| format!("Failed to create backup: {}", e))?;

        prune_oldest(&backup_dir, BACKUPS_KEPT, |name| name.ends_with(".json"))
            .map_err(|e| format!("Failed to read backup dir: {}", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (ConfigStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("headline_cfg_{}", uuid::Uuid::new_v4()));
        (ConfigStore::new(dir.clone()), dir)
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.model.path.is_none());
        assert!(config.display.show_cleaned_text);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let (store, _dir) = temp_store();
        let config = store.load().unwrap();
        assert!(config.stopwords.path.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let parsed: AppConfig = serde_json::from_str(r#"{"model": {"path": "m.json"}}"#).unwrap();
        assert_eq!(parsed.model.path.as_deref(), Some("m.json"));
        assert!(parsed.display.show_cleaned_text);
    }

    #[test]
    fn test_save_load_and_backup() {
        let (store, dir) = temp_store();
        let mut config = AppConfig::default();
        config.model.path = Some("first.json".to_string());
        store.save(&config).unwrap();
        assert!(!dir.join("backups").exists());

        config.model.path = Some("second.json".to_string());
        config.stopwords.path = Some("words.txt".to_string());
        config.display.show_cleaned_text = false;
        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.model.path.as_deref(), Some("second.json"));
        assert_eq!(loaded.stopwords.path.as_deref(), Some("words.txt"));
        assert!(!loaded.display.show_cleaned_text);

        // the first save is what got backed up
        let backups: Vec<_> = fs::read_dir(dir.join("backups")).unwrap().filter_map(|e| e.ok()).collect();
        assert_eq!(backups.len(), 1);
        let backed_up: AppConfig =
            serde_json::from_str(&fs::read_to_string(backups[0].path()).unwrap()).unwrap();
        assert_eq!(backed_up.model.path.as_deref(), Some("first.json"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let (store, dir) = temp_store();
        store.ensure_dir().unwrap();
        fs::write(store.config_file(), "{ not json").unwrap();
        assert!(store.load().unwrap_err().contains("Failed to parse config"));
        let _ = fs::remove_dir_all(&dir);
    }
}
