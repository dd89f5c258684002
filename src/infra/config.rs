// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infra::errors::ProfessorError;
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub prompt: PromptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".into()
}

fn default_max_tokens() -> u32 {
    512
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".into()
}

fn default_base_url() -> String {
    "https://api.anthropic.com/v1/messages".into()
}

fn default_timeout() -> u64 {
    60
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one `<id>.json` file per session.
    pub sessions_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    pub system_prompt_file: Option<PathBuf>,
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> Result<Self, ProfessorError> {
        let path = paths::config_file_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ProfessorError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProfessorError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| ProfessorError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn sessions_dir(&self) -> Result<PathBuf, ProfessorError> {
        match self.storage.sessions_dir {
            Some(ref dir) => Ok(dir.clone()),
            None => paths::sessions_dir(),
        }
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String, ProfessorError> {
        match std::env::var(&self.provider.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ProfessorError::Config(format!(
                "{} is not set",
                self.provider.api_key_env
            ))),
        }
    }
}
