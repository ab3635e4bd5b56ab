use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GiftError, Result};

pub const DEFAULT_API_URL: &str = "https://api.siliconflow.cn/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "Pro/deepseek-ai/DeepSeek-V3.2";
pub const API_KEY_ENV: &str = "GIFT_API_KEY";
pub const CONFIG_DIR_NAME: &str = ".gift-assistant";
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Connection details for the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(rename = "api_url", default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_url() -> String {
    DEFAULT_API_URL.to_owned()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        EndpointConfig {
            url: default_url(),
            api_key: String::new(),
            model: default_model(),
        }
    }
}

impl EndpointConfig {
    /// Pre-flight check done before anything is sent over the network.
    pub fn ensure_api_key(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(GiftError::configuration("请先配置API Key"));
        }
        Ok(())
    }

    /// Replace the key for this process only, e.g. from `GIFT_API_KEY`.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api_key = key;
        }
        self
    }

    /// Key with everything but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.is_empty() {
            return "(not set)".to_owned();
        }
        let visible = chars.len().saturating_sub(4);
        chars
            .iter()
            .enumerate()
            .map(|(i, c)| if i < visible { '*' } else { *c })
            .collect()
    }
}

pub trait SettingsStore {
    fn load(&self) -> Result<Option<EndpointConfig>>;
    fn save(&self, config: &EndpointConfig) -> Result<()>;
}

/// Settings kept as YAML in a directory, `~/.gift-assistant/` by default.
pub struct YamlSettingsStore {
    dir: PathBuf,
}

impl YamlSettingsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        YamlSettingsStore { dir: dir.into() }
    }

    pub fn in_home() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| GiftError::configuration("无法确定用户主目录"))?;
        Ok(Self::new(home.join(CONFIG_DIR_NAME)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    /// Load `.env` from the settings directory, if there is one.
    pub fn load_env(&self) {
        let env_file = self.dir.join(".env");
        if env_file.exists() {
            if let Err(e) = dotenv::from_path(&env_file) {
                warn!("failed to load {}: {e}", env_file.display());
            }
        }
    }
}

impl SettingsStore for YamlSettingsStore {
    fn load(&self) -> Result<Option<EndpointConfig>> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)?;
        match serde_yaml::from_str::<EndpointConfig>(&text) {
            Ok(config) => {
                debug!("loaded settings from {}", path.display());
                Ok(Some(config))
            }
            Err(e) => {
                warn!("Failed to load API config from {}: {e}", path.display());
                Ok(None)
            }
        }
    }

    fn save(&self, config: &EndpointConfig) -> Result<()> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;
        }
        let text = serde_yaml::to_string(config)?;
        std::fs::write(self.config_path(), text)?;
        debug!("saved settings to {}", self.config_path().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let parsed: EndpointConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(parsed, EndpointConfig::default());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: EndpointConfig = serde_yaml::from_str("api_key: sk-1\n").unwrap();
        assert_eq!(parsed.url, DEFAULT_API_URL);
        assert_eq!(parsed.model, DEFAULT_MODEL);
        assert_eq!(parsed.api_key, "sk-1");
    }

    #[test]
    fn ensure_api_key_rejects_blank() {
        assert!(EndpointConfig::default().ensure_api_key().unwrap_err().is_configuration());
        let config = EndpointConfig::default().with_api_key_override(Some("sk".into()));
        assert!(config.ensure_api_key().is_ok());
    }

    #[test]
    fn blank_override_keeps_stored_key() {
        let config = EndpointConfig {
            api_key: "stored".into(),
            ..EndpointConfig::default()
        }
        .with_api_key_override(Some("  ".into()));
        assert_eq!(config.api_key, "stored");
    }

    #[test]
    fn masks_all_but_last_four() {
        let config = EndpointConfig {
            api_key: "sk-abcdef1234".into(),
            ..EndpointConfig::default()
        };
        assert_eq!(config.masked_api_key(), "*********1234");
        assert_eq!(EndpointConfig::default().masked_api_key(), "(not set)");
    }

    #[test]
    fn store_roundtrip_and_absent_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = YamlSettingsStore::new(dir.path().join("nested"));
        assert_eq!(store.load().unwrap(), None);

        let config = EndpointConfig {
            url: "http://localhost:8080/v1/chat/completions".into(),
            api_key: "sk-test".into(),
            model: "Qwen/Qwen3-8B".into(),
        };
        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), Some(config));
    }

    #[test]
    fn garbled_file_is_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = YamlSettingsStore::new(dir.path());
        std::fs::write(store.config_path(), "api_url: [unterminated").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
