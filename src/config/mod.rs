/// Database connection and table creation
pub mod database;

/// Menu, payment method and storage key configuration from config.toml
pub mod menu;

pub use menu::{
    AppConfig, CategoryConfig, ItemConfig, load_app_configuration, resolve_configuration,
};
