//! CLI configuration management.
//!
//! Data directory, quorum seed values and logging defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KalinaConfig {
    /// Where the governance snapshot lives
    pub data_dir: PathBuf,
    /// Quorum threshold used when seeding a fresh ledger
    pub quorum_threshold: u64,
    /// Default tracing filter
    pub log_filter: String,
}

impl Default for KalinaConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".kalina")
                .join("data"),
            quorum_threshold: 1,
            log_filter: "info".to_string(),
        }
    }
}

impl KalinaConfig {
    /// Load configuration from file, creating a default one on first run.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: KalinaConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get configuration file path.
    pub fn config_path() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(home.join(".kalina").join("config.toml"))
    }
}
