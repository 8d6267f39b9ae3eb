//! # Order Service Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MERIDIAN_TENANT_ID, MERIDIAN_BRANCH_ID                             │
//! │     MERIDIAN_DB_PATH, MERIDIAN_INIT_TIMEOUT_MS                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/meridian-pos/orders.toml (Linux)                         │
//! │     ~/Library/Application Support/com.meridian.pos/orders.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # orders.toml
//! [tenant]
//! id = "00000000-0000-0000-0000-000000000001"
//! branch_id = "00000000-0000-0000-0000-000000000101"
//!
//! [database]
//! path = "/var/lib/meridian/meridian.db"
//! max_connections = 5
//!
//! [billing]
//! init_timeout_ms = 3000  # Bound on the startup latest-bill-number query
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use meridian_core::{DEFAULT_BRANCH_ID, DEFAULT_TENANT_ID};
use meridian_db::DbConfig;

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Tenant
// =============================================================================

/// Which tenant this process serves and the branch orders fall back to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    #[serde(default = "default_tenant_id")]
    pub id: String,

    /// Used when the caller carries no branch of its own.
    #[serde(default = "default_branch_id")]
    pub branch_id: String,
}

fn default_tenant_id() -> String {
    DEFAULT_TENANT_ID.to_string()
}

fn default_branch_id() -> String {
    DEFAULT_BRANCH_ID.to_string()
}

impl Default for TenantConfig {
    fn default() -> Self {
        TenantConfig {
            id: default_tenant_id(),
            branch_id: default_branch_id(),
        }
    }
}

// =============================================================================
// Database
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file holding the orders table.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("com", "meridian", "pos")
        .map(|dirs| dirs.data_dir().join("meridian.db"))
        .unwrap_or_else(|| PathBuf::from("meridian.db"))
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Billing
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingSettings {
    /// How long the bill counter waits for the latest stored bill number
    /// before starting from `001-000`.
    #[serde(default = "default_init_timeout")]
    pub init_timeout_ms: u64,
}

fn default_init_timeout() -> u64 {
    3000
}

impl Default for BillingSettings {
    fn default() -> Self {
        BillingSettings {
            init_timeout_ms: default_init_timeout(),
        }
    }
}

// =============================================================================
// Service Configuration
// =============================================================================

/// Complete configuration for the order service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub tenant: TenantConfig,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub billing: BillingSettings,
}

impl ServiceConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (orders.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading order service config from file");
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
            warn!("Failed to load order service config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Order service config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.tenant.id.trim().is_empty() {
            return Err(ConfigError::InvalidValue("tenant.id must not be empty".into()));
        }

        if self.tenant.branch_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "tenant.branch_id must not be empty".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.billing.init_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "billing.init_timeout_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup("MERIDIAN_TENANT_ID") {
            debug!(tenant_id = %id, "Overriding tenant ID from environment");
            self.tenant.id = id;
        }

        if let Some(id) = lookup("MERIDIAN_BRANCH_ID") {
            self.tenant.branch_id = id;
        }

        if let Some(path) = lookup("MERIDIAN_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(timeout) = lookup("MERIDIAN_INIT_TIMEOUT_MS") {
            match timeout.parse::<u64>() {
                Ok(ms) => self.billing.init_timeout_ms = ms,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric MERIDIAN_INIT_TIMEOUT_MS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "meridian", "pos")
            .map(|dirs| dirs.config_dir().join("orders.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn tenant_id(&self) -> &str {
        &self.tenant.id
    }

    pub fn branch_id(&self) -> &str {
        &self.tenant.branch_id
    }

    /// Bound on the bill counter's startup query.
    pub fn init_timeout(&self) -> Duration {
        Duration::from_millis(self.billing.init_timeout_ms)
    }

    /// Pool settings for the configured SQLite file.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database.path.clone()).max_connections(self.database.max_connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.tenant_id(), DEFAULT_TENANT_ID);
        assert_eq!(config.branch_id(), DEFAULT_BRANCH_ID);
        assert_eq!(config.init_timeout(), Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ServiceConfig::default();

        config.tenant.id = "  ".to_string();
        assert!(config.validate().is_err());

        config.tenant.id = "tenant-a".to_string();
        config.billing.init_timeout_ms = 0;
        assert!(config.validate().is_err());

        config.billing.init_timeout_ms = 500;
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        config.database.max_connections = 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [tenant]
            id = "tenant-a"

            [billing]
            init_timeout_ms = 750
            "#,
        )
        .unwrap();

        assert_eq!(config.tenant_id(), "tenant-a");
        assert_eq!(config.branch_id(), DEFAULT_BRANCH_ID);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.init_timeout(), Duration::from_millis(750));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MERIDIAN_TENANT_ID", "tenant-b"),
            ("MERIDIAN_DB_PATH", "/tmp/orders.db"),
            ("MERIDIAN_INIT_TIMEOUT_MS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = ServiceConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.tenant_id(), "tenant-b");
        assert_eq!(config.database.path, PathBuf::from("/tmp/orders.db"));
        // Unparseable values leave the previous setting in place
        assert_eq!(config.billing.init_timeout_ms, 3000);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("meridian-orders-{}.toml", uuid::Uuid::new_v4()));
        let mut config = ServiceConfig::default();
        config.tenant.id = "tenant-file".to_string();
        config.save(Some(path.clone())).unwrap();

        let loaded = ServiceConfig::load(Some(path.clone())).unwrap();
        assert_eq!(loaded.tenant.id, "tenant-file");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&ServiceConfig::default()).unwrap();
        assert!(toml_str.contains("[tenant]"));
        assert!(toml_str.contains("[billing]"));
    }
}
