//! Application configuration
//!
//! Config is resolved in layers:
//! 1. Explicit path (`--config`), if it exists
//! 2. Override in the data dir (~/.local/share/costbook/config/costbook.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Environment variables `COSTBOOK_CATEGORIES` and `COSTBOOK_TEAM` are applied
//! on top of whichever file was used.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::categories::CategoryRegistry;
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/costbook.toml");

/// Comma-separated category list, e.g. `food,rent,travel`
pub const CATEGORIES_ENV: &str = "COSTBOOK_CATEGORIES";

/// Comma-separated team list, e.g. `Dana Levi,Omer Katz`
pub const TEAM_ENV: &str = "COSTBOOK_TEAM";

/// A team member shown by the about endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub first_name: String,
    pub last_name: String,
}

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub categories: CategoryRegistry,
    pub team: Vec<TeamMember>,
    pub allowed_origins: Vec<String>,
    /// File the config was read from (None = embedded defaults)
    pub source: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            categories: CategoryRegistry::default(),
            team: Vec::new(),
            allowed_origins: Vec::new(),
            source: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    categories: Option<RawCategories>,
    server: Option<RawServer>,
    team: Option<Vec<TeamMember>>,
}

#[derive(Debug, Deserialize)]
struct RawCategories {
    names: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    allowed_origins: Option<Vec<String>>,
}

impl AppConfig {
    /// Load config from files and environment
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut config = load_file(override_path)?;
        config.apply_env(
            std::env::var(CATEGORIES_ENV).ok().as_deref(),
            std::env::var(TEAM_ENV).ok().as_deref(),
        )?;
        Ok(config)
    }

    /// Parse config from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(names) = raw.categories.and_then(|c| c.names) {
            config.categories = CategoryRegistry::new(names)?;
        }
        if let Some(origins) = raw.server.and_then(|s| s.allowed_origins) {
            config.allowed_origins = origins;
        }
        if let Some(team) = raw.team {
            config.team = team;
        }

        Ok(config)
    }

    fn apply_env(&mut self, categories: Option<&str>, team: Option<&str>) -> Result<()> {
        if let Some(list) = categories.filter(|s| !s.trim().is_empty()) {
            self.categories = CategoryRegistry::new(list.split(','))?;
            debug!(categories = %self.categories, "Categories overridden from environment");
        }

        if let Some(list) = team.filter(|s| !s.trim().is_empty()) {
            self.team = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|entry| {
                    let (first, last) = entry.split_once(' ').unwrap_or((entry, ""));
                    TeamMember {
                        first_name: first.to_string(),
                        last_name: last.trim().to_string(),
                    }
                })
                .collect();
        }

        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("costbook").join("config").join("costbook.toml"))
}

fn load_file(override_path: Option<&Path>) -> Result<AppConfig> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    match path.filter(|p| p.exists()) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
            let mut config = AppConfig::parse(&content)?;
            config.source = Some(path);
            Ok(config)
        }
        None => AppConfig::parse(DEFAULT_CONFIG),
    }
}
