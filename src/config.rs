use dirs::home_dir;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::models::enums::DatabaseType;

/// File name of the JSON config inside the data directory
const CONFIG_FILE: &str = "config.json";

const DEFAULT_MAX_CONNECTIONS: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub database_type: DatabaseType,
    pub database_url: Option<String>,
    /// Schema (MySQL/PostgreSQL) or attached database (SQLite) to read views from
    pub schema: Option<String>,
    pub max_connections: u32,
    /// env_logger filter, e.g. `viewdef=debug`
    pub log_filter: Option<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            database_type: DatabaseType::default(),
            database_url: None,
            schema: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            log_filter: None,
        }
    }
}

impl ReaderConfig {
    /// Defaults, then `config.json` from the data directory, then `.env` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let path = get_data_dir().join(CONFIG_FILE);
        let mut config = if path.exists() {
            info!("Loading config from {}", path.display());
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Applies `VIEWDEF_*` variables (and the conventional `DATABASE_URL`) read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("VIEWDEF_DATABASE_URL").or_else(|| lookup("DATABASE_URL")) {
            self.database_url = Some(url);
        }
        if let Some(kind) = lookup("VIEWDEF_DATABASE_TYPE") {
            self.database_type = kind.parse()?;
        } else if let Some(url) = &self.database_url
            && let Some(kind) = database_type_from_url(url)
        {
            self.database_type = kind;
        }
        if let Some(schema) = lookup("VIEWDEF_SCHEMA") {
            self.schema = Some(schema);
        }
        if let Some(filter) = lookup("VIEWDEF_LOG") {
            self.log_filter = Some(filter);
        }
        Ok(())
    }
}

/// Infers the database type from a connection URL scheme.
pub fn database_type_from_url(url: &str) -> Option<DatabaseType> {
    let scheme = url.split_once(':')?.0;
    scheme.parse().ok()
}

pub fn get_data_dir() -> PathBuf {
    // Try to get custom data directory from environment variable first
    if let Ok(custom_dir) = std::env::var("VIEWDEF_DATA_DIR") {
        let path = PathBuf::from(custom_dir);
        if path.is_absolute() {
            return path;
        }
    }

    // Default to ~/.viewdef
    if let Some(mut hd) = home_dir() {
        hd.push(".viewdef");
        return hd;
    }
    PathBuf::from(".")
}
