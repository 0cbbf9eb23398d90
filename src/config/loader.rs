//! Configuration file loading and saving
//!
//! Loads the CLI configuration from `~/.desktoast.json`; a missing file
//! yields the defaults.

use crate::config::schema::AppConfig;
use crate::error::{NotifyError, Result};
use dirs::home_dir;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the default configuration file path
/// Returns ~/.desktoast.json
pub fn get_config_path() -> PathBuf {
    home_dir()
        .expect("Unable to determine home directory")
        .join(".desktoast.json")
}

/// Load configuration from the default path
/// If the file doesn't exist, returns a default configuration
pub fn load_config() -> Result<AppConfig> {
    load_config_from_path(&get_config_path())
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(default_config());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| NotifyError::Config(format!("Failed to read config file: {}", e)))?;

    let config: AppConfig = serde_json::from_str(&content)
        .map_err(|e| NotifyError::Config(format!("Failed to parse config JSON: {}", e)))?;

    Ok(config)
}

/// Save configuration to a specific path
pub fn save_config_to_path(config: &AppConfig, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| NotifyError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(path, content)
        .map_err(|e| NotifyError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

/// Create a default configuration
pub fn default_config() -> AppConfig {
    AppConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = default_config();
        assert_eq!(config.app_name, "desktoast");
        assert!(!config.debug);
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        let mut original = default_config();
        original.app_name = "Round Trip".to_string();
        original.timeout_ms = Some(1234);
        save_config_to_path(&original, &path).unwrap();

        let loaded = load_config_from_path(&path).unwrap();
        assert_eq!(loaded.app_name, "Round Trip");
        assert_eq!(loaded.timeout_ms, Some(1234));
    }

    #[test]
    fn test_load_nonexistent_config_returns_default() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();
        let _ = fs::remove_file(&path); // Delete the file

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.app_name, "desktoast");
    }

    #[test]
    fn test_load_invalid_json_is_config_error() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "{not json").unwrap();

        let result = load_config_from_path(temp_file.path());
        assert!(matches!(result, Err(NotifyError::Config(_))));
    }
}
