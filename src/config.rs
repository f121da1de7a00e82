//! Application configuration.
//!
//! Sources, later overriding earlier:
//! 1. built-in defaults
//! 2. `bizdesk.toml` in the working directory (if present)
//! 3. the file named by `BIZDESK_CONFIG` (if set)
//! 4. `BIZDESK__*` environment variables, `__` separating nested keys

use serde::{Deserialize, Serialize};

use crate::error::AppResult;

pub const CONFIG_ENV_VAR: &str = "BIZDESK_CONFIG";
pub const CONFIG_ENV_PREFIX: &str = "BIZDESK";
const DEFAULT_CONFIG_FILE: &str = "bizdesk";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for DemoUser {
    fn default() -> Self {
        Self {
            name: "Demo User".to_string(),
            email: "demo@example.com".to_string(),
            password: "password".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// File name of the SQLite database inside the app data directory.
    pub database_file: String,
    /// Seed fixture customers, products and invoices into empty tables.
    pub seed_fixtures: bool,
    /// Fallback filter when `BIZDESK_LOG` is unset.
    pub log_filter: String,
    pub recent_invoice_limit: u32,
    pub bcrypt_cost: u32,
    pub demo_user: DemoUser,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_file: "bizdesk.db".to_string(),
            seed_fixtures: true,
            log_filter: "info".to_string(),
            recent_invoice_limit: 5,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            demo_user: DemoUser::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        use ::config::{Config, Environment, File, FileFormat};

        let mut builder = Config::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Toml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Toml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Defaults with the cheapest bcrypt cost so tests stay fast.
    pub fn for_test() -> Self {
        Self {
            bcrypt_cost: 4,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.database_file, "bizdesk.db");
        assert!(config.seed_fixtures);
        assert_eq!(config.recent_invoice_limit, 5);
        assert_eq!(config.demo_user.email, "demo@example.com");
    }

    #[test]
    fn test_config_for_test_uses_cheap_hashing() {
        assert_eq!(AppConfig::for_test().bcrypt_cost, 4);
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "database_file = \"shop.db\"\nseed_fixtures = false\n\n[demo_user]\nemail = \"owner@shop.in\""
        )
        .unwrap();

        let config = AppConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.database_file, "shop.db");
        assert!(!config.seed_fixtures);
        assert_eq!(config.demo_user.email, "owner@shop.in");
        // untouched keys keep defaults
        assert_eq!(config.demo_user.password, "password");
        assert_eq!(config.recent_invoice_limit, 5);
    }
}
