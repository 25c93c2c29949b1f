//! Menu configuration loading from config.toml
//!
//! The menu is data: categories, their items and prices, the accepted payment
//! methods and the storage key orders are persisted under. A built-in default
//! mirrors the stock menu so the desk works without any file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_VAR: &str = "ORDER_DESK_CONFIG";

/// Configuration file used when [`CONFIG_PATH_VAR`] is not set
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Storage key used when the configuration does not name one
pub const DEFAULT_STORAGE_KEY: &str = "orders";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Key the serialized orders are stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Accepted payment methods; an explicit empty list accepts any non-empty value
    #[serde(default = "default_payment_methods")]
    pub payment_methods: Vec<String>,
    /// Item categories in display order
    pub categories: Vec<CategoryConfig>,
}

/// A category and the items it sells
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CategoryConfig {
    /// Category name (e.g. "Fast Food")
    pub name: String,
    /// Items in this category
    pub items: Vec<ItemConfig>,
}

/// A single menu item
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ItemConfig {
    /// Item name (e.g. "Burger")
    pub name: String,
    /// Whole-unit price
    pub price: u32,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_payment_methods() -> Vec<String> {
    vec!["Cash".to_string(), "Card".to_string(), "UPI".to_string()]
}

impl ItemConfig {
    fn new(name: &str, price: u32) -> Self {
        Self {
            name: name.to_string(),
            price,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            payment_methods: default_payment_methods(),
            categories: vec![
                CategoryConfig {
                    name: "Fast Food".to_string(),
                    items: vec![ItemConfig::new("Burger", 150), ItemConfig::new("Fries", 100)],
                },
                CategoryConfig {
                    name: "Italian".to_string(),
                    items: vec![ItemConfig::new("Pizza", 250), ItemConfig::new("Pasta", 200)],
                },
            ],
        }
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads the application configuration.
///
/// Reads `.env` (non-fatal), then the file named by `ORDER_DESK_CONFIG`. Without
/// that variable `./config.toml` is used if present, otherwise the built-in menu.
pub fn load_app_configuration() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    resolve_configuration(std::env::var(CONFIG_PATH_VAR).ok().as_deref())
}

/// Loads `explicit_path` if given (a missing file is an error), otherwise
/// `./config.toml` if present, otherwise the built-in menu.
pub fn resolve_configuration(explicit_path: Option<&str>) -> Result<AppConfig> {
    if let Some(path) = explicit_path {
        return load_config(path)
            .inspect(|_| tracing::info!("Loaded configuration from {}", path))
            .inspect_err(|e| tracing::error!("Failed to load configuration: {}", e));
    }

    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        load_config(DEFAULT_CONFIG_PATH)
    } else {
        tracing::info!("No {} found, using built-in menu", DEFAULT_CONFIG_PATH);
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_menu_config() {
        let toml_str = r#"
            storage_key = "bookings"
            payment_methods = ["Cash", "Card"]

            [[categories]]
            name = "Fast Food"
            items = [
                { name = "Burger", price = 150 },
                { name = "Fries", price = 100 },
            ]

            [[categories]]
            name = "Japanese"
            items = [{ name = "Sushi", price = 400 }]
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.storage_key, "bookings");
        assert_eq!(config.payment_methods, vec!["Cash", "Card"]);
        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.categories[0].items[1], ItemConfig::new("Fries", 100));
        assert_eq!(config.categories[1].name, "Japanese");
    }

    #[test]
    fn test_storage_key_and_payments_default() {
        let config = parse_config(
            r#"
            [[categories]]
            name = "Italian"
            items = [{ name = "Pizza", price = 250 }]
        "#,
        )
        .unwrap();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.payment_methods, AppConfig::default().payment_methods);
    }

    #[test]
    fn test_empty_payment_list_is_kept() {
        let config = parse_config(
            r#"
            payment_methods = []

            [[categories]]
            name = "Italian"
            items = [{ name = "Pizza", price = 250 }]
        "#,
        )
        .unwrap();
        assert!(config.payment_methods.is_empty());
    }

    #[test]
    fn test_resolve_explicit_path() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml");
        let config = resolve_configuration(Some(path)).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_resolve_missing_explicit_path_is_error() {
        let result = resolve_configuration(Some("definitely/not/here.toml"));
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }

    #[test]
    fn test_resolve_without_path_falls_back() {
        // Either ./config.toml or the built-in menu; both describe the same menu
        let config = resolve_configuration(None).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_negative_price_is_config_error() {
        let result = parse_config(
            r#"
            [[categories]]
            name = "Italian"
            items = [{ name = "Pizza", price = -5 }]
        "#,
        );
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }

    #[test]
    fn test_bundled_config_matches_default() {
        let bundled = parse_config(include_str!("../../config.toml")).unwrap();
        assert_eq!(bundled, AppConfig::default());
    }
}
