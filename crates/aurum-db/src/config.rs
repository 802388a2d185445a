//! # Estimate Configuration
//!
//! Deployment settings for a counter: tax, history size, database location.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     AURUM_TAX_PERCENT=3                                                │
//! │     AURUM_HISTORY_LIMIT=50                                             │
//! │     AURUM_DB_PATH=/srv/aurum/aurum.db                                  │
//! │     AURUM_STORE_NAME="Sri Lakshmi Jewellers"                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/estimate/estimate.toml (Linux)                           │
//! │     ~/Library/Application Support/com.aurum.estimate/estimate.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     3% tax, 20 history entries, platform data dir database             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Sri Lakshmi Jewellers"
//! gstin = "33AAAAA0000A1Z5"
//!
//! [pricing]
//! tax_percent = "3"
//!
//! [history]
//! recent_limit = 20
//!
//! [database]
//! path = "/srv/aurum/aurum.db"
//! max_connections = 5
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use aurum_core::pricing::DEFAULT_TAX_PERCENT;
use aurum_core::validation::validate_tax_percent;
use aurum_core::{PricingConfig, DEFAULT_HISTORY_LIMIT};

use crate::pool::DbConfig;

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "estimate.toml";

/// Database file name inside the platform data directory.
pub const DB_FILE_NAME: &str = "aurum.db";

// =============================================================================
// Errors
// =============================================================================

/// Configuration load/save failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is present but unusable.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// No explicit path and the platform has no config directory.
    #[error("No config path available")]
    NoConfigPath,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// The shop printed on estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    /// GST registration number, if the shop has one.
    #[serde(default)]
    pub gstin: Option<String>,
}

fn default_store_name() -> String {
    "Aurum Jewellers".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            gstin: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Tax on each item's subtotal, in percent.
    #[serde(default = "default_tax_percent")]
    pub tax_percent: Decimal,
}

fn default_tax_percent() -> Decimal {
    DEFAULT_TAX_PERCENT
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            tax_percent: default_tax_percent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Finalized estimations kept in the counter's history list.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,
}

fn default_recent_limit() -> u32 {
    DEFAULT_HISTORY_LIMIT
}

impl Default for HistorySettings {
    fn default() -> Self {
        HistorySettings {
            recent_limit: default_recent_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Defaults to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete counter configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub history: HistorySettings,

    #[serde(default)]
    pub database: DatabaseSettings,
}

impl EstimateConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`estimate.toml`), if it exists
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading estimate config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load estimate config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file, creating its directory.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Estimate config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        validate_tax_percent(self.pricing.tax_percent)
            .map_err(|e| ConfigError::Invalid(format!("pricing.tax_percent: {}", e)))?;

        if self.history.recent_limit == 0 {
            return Err(ConfigError::Invalid(
                "history.recent_limit must be greater than 0".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `AURUM_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable values are skipped.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(tax) = lookup("AURUM_TAX_PERCENT") {
            match tax.trim().parse::<Decimal>() {
                Ok(t) => {
                    debug!(tax_percent = %t, "Overriding tax percent from environment");
                    self.pricing.tax_percent = t;
                }
                Err(_) => warn!(value = %tax, "Ignoring unparseable AURUM_TAX_PERCENT"),
            }
        }

        if let Some(limit) = lookup("AURUM_HISTORY_LIMIT") {
            match limit.trim().parse::<u32>() {
                Ok(l) => self.history.recent_limit = l,
                Err(_) => warn!(value = %limit, "Ignoring unparseable AURUM_HISTORY_LIMIT"),
            }
        }

        if let Some(path) = lookup("AURUM_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("AURUM_STORE_NAME") {
            self.store.name = name;
        }
    }

    /// `<config dir>/estimate.toml` for this platform.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "aurum", "estimate")
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Pricing knobs for the estimation store.
    pub fn pricing(&self) -> PricingConfig {
        PricingConfig::default()
            .with_tax_percent(self.pricing.tax_percent)
            .with_history_limit(self.history.recent_limit)
    }

    /// Configured database path, else `<data dir>/aurum.db`, else `./aurum.db`.
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .or_else(|| Self::project_dirs().map(|d| d.data_dir().join(DB_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME))
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path()).max_connections(self.database.max_connections)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
