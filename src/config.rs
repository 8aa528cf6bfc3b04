//! # Configuration Module
//!
//! Process configuration read from the environment, and the catalog
//! scraping settings with their defaults.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

// Constants for catalog scraping
pub const DEFAULT_CATALOG_URL: &str = "https://aros.uz/uz";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const MAX_PRODUCTS: usize = 5;
pub const FALLBACK_TEXT: &str = "Noma'lum";
pub const DEFAULT_PORT: u16 = 8443;
pub const DEFAULT_DATABASE_PATH: &str = "products.db";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// CSS selectors describing the storefront markup
#[derive(Debug, Clone)]
pub struct CatalogSelectors {
    /// One match per product entry
    pub item: String,
    /// Name element inside an entry
    pub name: String,
    /// Price element inside an entry
    pub price: String,
    /// Anchor carrying the product link
    pub link: String,
}

impl Default for CatalogSelectors {
    fn default() -> Self {
        Self {
            item: ".product-item".to_string(),
            name: ".product-name".to_string(),
            price: ".product-price".to_string(),
            link: "a".to_string(),
        }
    }
}

/// Configuration structure for catalog synchronization
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Page listing the products; also the fallback product link
    pub url: String,
    /// Browser-like user agent sent with the fetch
    pub user_agent: String,
    /// Timeout for the whole fetch in seconds
    pub timeout_secs: u64,
    /// Number of entries kept from the page
    pub max_products: usize,
    /// Replacement for a missing name or price
    pub fallback_text: String,
    pub selectors: CatalogSelectors,
}

impl CatalogConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_products: MAX_PRODUCTS,
            fallback_text: FALLBACK_TEXT.to_string(),
            selectors: CatalogSelectors::default(),
        }
    }
}

/// Process configuration
#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    /// Public host name the webhook is registered under
    pub webhook_domain: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub log_file: Option<PathBuf>,
    pub catalog: CatalogConfig,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"[redacted]")
            .field("webhook_domain", &self.webhook_domain)
            .field("port", &self.port)
            .field("database_path", &self.database_path)
            .field("log_file", &self.log_file)
            .field("catalog", &self.catalog)
            .finish()
    }
}

impl BotConfig {
    /// Load configuration, reading a `.env` file first when present
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |var: &str| -> Result<String, ConfigError> {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
        };

        let bot_token = require("BOT_TOKEN")?;
        let webhook_domain = require("RAILWAY_PUBLIC_DOMAIN")?;

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidEnvVar {
                var: "PORT".to_string(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match lookup("CATALOG_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                var: "CATALOG_TIMEOUT_SECS".to_string(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: "CATALOG_TIMEOUT_SECS".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        let catalog = CatalogConfig {
            url: lookup("CATALOG_URL").unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
            timeout_secs,
            ..CatalogConfig::default()
        };

        Ok(Self {
            bot_token,
            webhook_domain,
            port,
            database_path: lookup("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            log_file: lookup("BOT_LOG_FILE").map(PathBuf::from),
            catalog,
        })
    }

    /// URL handed to Telegram's `setWebhook`
    pub fn webhook_url(&self) -> String {
        format!("https://{}/{}", self.webhook_domain, self.bot_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let result = BotConfig::from_lookup(lookup_from(&[("RAILWAY_PUBLIC_DOMAIN", "bot.example.com")]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingEnvVar("BOT_TOKEN".to_string()));
    }

    #[test]
    fn test_missing_domain_is_fatal() {
        let result = BotConfig::from_lookup(lookup_from(&[("BOT_TOKEN", "123:abc")]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingEnvVar("RAILWAY_PUBLIC_DOMAIN".to_string())
        );
    }

    #[test]
    fn test_blank_token_counts_as_missing() {
        let result = BotConfig::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "  "),
            ("RAILWAY_PUBLIC_DOMAIN", "bot.example.com"),
        ]));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }

    #[test]
    fn test_defaults_applied() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "123:abc"),
            ("RAILWAY_PUBLIC_DOMAIN", "bot.example.com"),
        ]))
        .unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_path, PathBuf::from("products.db"));
        assert!(config.log_file.is_none());
        assert_eq!(config.catalog.url, DEFAULT_CATALOG_URL);
        assert_eq!(config.catalog.timeout_secs, 10);
        assert_eq!(config.catalog.max_products, 5);
        assert_eq!(config.webhook_url(), "https://bot.example.com/123:abc");
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = BotConfig::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "123:abc"),
            ("RAILWAY_PUBLIC_DOMAIN", "bot.example.com"),
            ("PORT", "eighty"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PORT"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = BotConfig::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "123:abc"),
            ("RAILWAY_PUBLIC_DOMAIN", "bot.example.com"),
            ("CATALOG_TIMEOUT_SECS", "0"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "123:secret"),
            ("RAILWAY_PUBLIC_DOMAIN", "bot.example.com"),
        ]))
        .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[redacted]"));
    }
}
