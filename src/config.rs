use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

const CONFIG_FILE: &str = "config.toml";
const DEFAULT_PORT: u16 = 3000;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Static credentials checked on every authenticated request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub api_key: Option<String>,
    pub admin_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/movies.json"),
        }
    }
}

impl AppConfig {
    /// Load `.env`, then `config.toml` if present, then environment overrides
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::from_file(Path::new(CONFIG_FILE))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(host) = var("HOST").filter(|h| !h.is_empty()) {
            self.server.host = host;
        }

        if let Some(port) = var("PORT") {
            self.server.port = match port.trim().parse::<u16>() {
                Ok(p) if p != 0 => p,
                _ => {
                    warn!(value = %port, "Invalid PORT, using {}", DEFAULT_PORT);
                    DEFAULT_PORT
                }
            };
        }

        if let Some(key) = var("API_KEY").filter(|k| !k.is_empty()) {
            self.auth.api_key = Some(key);
        }

        if let Some(ids) = var("ADMIN_IDS") {
            self.auth.admin_ids = parse_admin_ids(&ids);
        }
    }
}

/// Split a comma-separated id list, dropping blanks
pub fn parse_admin_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
