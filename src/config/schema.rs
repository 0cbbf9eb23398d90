//! Configuration schema for the desktoast CLI

use serde::{Deserialize, Serialize};

/// CLI configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Application name reported to the notification daemon
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Enable diagnostic output on stdout
    #[serde(default)]
    pub debug: bool,

    /// Default themed icon name or icon file path
    #[serde(default)]
    pub icon: Option<String>,

    /// Default expiry in milliseconds; the daemon decides when absent
    #[serde(default)]
    pub timeout_ms: Option<u32>,
}

fn default_app_name() -> String {
    "desktoast".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            debug: false,
            icon: None,
            timeout_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.app_name, "desktoast");
        assert!(!config.debug);
        assert!(config.icon.is_none());
        assert!(config.timeout_ms.is_none());
    }

    #[test]
    fn test_full_config() {
        let config: AppConfig = serde_json::from_value(json!({
            "app_name": "My App",
            "debug": true,
            "icon": "dialog-information",
            "timeout_ms": 2500
        }))
        .unwrap();

        assert_eq!(config.app_name, "My App");
        assert!(config.debug);
        assert_eq!(config.icon.as_deref(), Some("dialog-information"));
        assert_eq!(config.timeout_ms, Some(2500));
    }
}
