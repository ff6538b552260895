//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Konto configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub knowledge_base: KnowledgeBaseConfig,
}

/// Knowledge-base settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    /// Path to the SQLite knowledge-base file. `None` selects the default
    /// location under the config directory.
    pub database_path: Option<PathBuf>,
    /// Email of the conversational principal. Every scoped query is
    /// restricted to records owned by this identity; set once at startup,
    /// immutable afterwards.
    pub principal: String,
    /// Optional path to a TOML schema artifact overriding the built-in
    /// banking schema.
    pub schema_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            knowledge_base: KnowledgeBaseConfig {
                database_path: None,
                principal: "mitchell.gillis@t-online.de".to_string(),
                schema_path: None,
            },
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("KONTO_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("konto")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            // Return default config without creating file
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.knowledge_base.principal.trim().is_empty() {
            return Err(anyhow!(
                "knowledge_base.principal must name the conversational principal"
            ));
        }
        Ok(())
    }

    /// Resolved path of the SQLite knowledge-base file
    pub fn database_path(&self) -> anyhow::Result<PathBuf> {
        match &self.knowledge_base.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("knowledge.db")),
        }
    }
}
