//! Engine configuration, loaded from YAML with a home-directory fallback.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub enhancement: EnhancementConfig,
}

/// Settings for the optional LLM enhancement pass. Enhancement is a
/// quality improvement, never a correctness dependency, so it defaults
/// to off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancementConfig {
    pub enabled: bool,
    pub base_url: String,
    /// Environment variable holding the API key. The key itself never
    /// lives in the config file.
    pub api_key_env: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for EnhancementConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "SCENARIST_API_KEY".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1200,
            timeout_secs: 30,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from default locations:
    /// 1. ./scenarist.yaml
    /// 2. ~/.scenarist/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<EngineConfig, ConfigError> {
        let local_config = PathBuf::from("./scenarist.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".scenarist").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        Ok(EngineConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<EngineConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: EngineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_disable_enhancement() {
        let config = EngineConfig::default();
        assert!(!config.enhancement.enabled);
        assert_eq!(config.enhancement.timeout_secs, 30);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: EngineConfig =
            serde_yaml::from_str("enhancement:\n  enabled: true\n  model: test-model\n").unwrap();
        assert!(config.enhancement.enabled);
        assert_eq!(config.enhancement.model, "test-model");
        assert_eq!(config.enhancement.api_key_env, "SCENARIST_API_KEY");
    }
}
