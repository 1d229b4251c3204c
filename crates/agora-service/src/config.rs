use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub storage: StorageSettings,
    pub cache: CacheSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// "memory" or "rocksdb".
    pub backend: String,
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty", "compact", or "json".
    pub format: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            storage: StorageSettings {
                backend: "memory".to_string(),
                data_dir: PathBuf::from("./data"),
            },
            cache: CacheSettings { enabled: true },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

impl ServiceConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(backend) = env::var("AGORA_STORAGE_BACKEND") {
            self.storage.backend = backend;
        }
        if let Ok(data_dir) = env::var("AGORA_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(enabled) = env::var("AGORA_CACHE_ENABLED") {
            if let Ok(enabled) = enabled.parse() {
                self.cache.enabled = enabled;
            }
        }
        if let Ok(level) = env::var("AGORA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = env::var("AGORA_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Resolve the storage engine configuration.
    pub fn storage_config(&self) -> Result<agora_storage::StorageConfig> {
        let backend_type = match self.storage.backend.as_str() {
            "memory" => agora_storage::BackendType::Memory,
            #[cfg(feature = "rocksdb")]
            "rocksdb" => agora_storage::BackendType::RocksDB {
                path: self
                    .storage
                    .data_dir
                    .join("storage")
                    .to_string_lossy()
                    .into_owned(),
            },
            other => bail!("unsupported storage backend: {}", other),
        };
        Ok(agora_storage::StorageConfig { backend_type })
    }
}
