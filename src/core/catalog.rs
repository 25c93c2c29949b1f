//! Menu lookup - Resolves item names to priced, categorized items.
//!
//! Each category is an [`OrderCatalog`]. The [`OrderFactory`] owns all catalogs
//! plus a lookup table from item name to the catalog selling it, so adding a
//! category or item is a configuration change with no dispatch code involved.

use crate::{
    config::AppConfig,
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A catalog entry: what was ordered, its price and category.
///
/// Serialized as `{"item": .., "price": .., "category": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Item name
    #[serde(rename = "item")]
    pub name: String,
    /// Whole-unit price
    pub price: u32,
    /// Category the item belongs to
    pub category: String,
}

/// The items of a single category.
#[derive(Debug, Clone)]
pub struct OrderCatalog {
    category: String,
    prices: HashMap<String, u32>,
}

impl OrderCatalog {
    /// Creates an empty catalog for `category`
    #[must_use]
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            prices: HashMap::new(),
        }
    }

    /// The category this catalog sells
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Adds or replaces an item
    pub fn insert(&mut self, name: impl Into<String>, price: u32) {
        self.prices.insert(name.into(), price);
    }

    /// Builds the item for `name`, or `None` if this catalog does not sell it.
    #[must_use]
    pub fn create_order(&self, name: &str) -> Option<Item> {
        self.prices.get(name).map(|&price| Item {
            name: name.to_string(),
            price,
            category: self.category.clone(),
        })
    }

    /// Number of items in the catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether the catalog has no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Picks the catalog for an item name and builds the [`Item`].
#[derive(Debug, Clone, Default)]
pub struct OrderFactory {
    catalogs: Vec<OrderCatalog>,
    by_item: HashMap<String, usize>,
}

impl OrderFactory {
    /// Creates a factory with no catalogs
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a catalog.
    ///
    /// # Errors
    /// Returns a configuration error if the category is already registered or
    /// one of its items is already sold by another catalog.
    pub fn register(&mut self, catalog: OrderCatalog) -> Result<()> {
        if self.catalog(catalog.category()).is_some() {
            return Err(Error::Config {
                message: format!("Duplicate category '{}'", catalog.category()),
            });
        }

        let index = self.catalogs.len();
        for name in catalog.prices.keys() {
            if let Some(&other) = self.by_item.get(name) {
                return Err(Error::Config {
                    message: format!(
                        "Item '{name}' is listed in both '{}' and '{}'",
                        self.catalogs[other].category(),
                        catalog.category()
                    ),
                });
            }
        }
        for name in catalog.prices.keys() {
            self.by_item.insert(name.clone(), index);
        }
        self.catalogs.push(catalog);
        Ok(())
    }

    /// Resolves an item name to its catalog entry.
    ///
    /// # Errors
    /// Returns [`Error::UnknownItem`] if no catalog sells `name`.
    pub fn create_order(&self, name: &str) -> Result<Item> {
        self.by_item
            .get(name)
            .and_then(|&index| self.catalogs[index].create_order(name))
            .ok_or_else(|| Error::UnknownItem {
                name: name.to_string(),
            })
    }

    /// Looks up a catalog by category name
    #[must_use]
    pub fn catalog(&self, category: &str) -> Option<&OrderCatalog> {
        self.catalogs.iter().find(|c| c.category() == category)
    }

    /// Category names in registration order
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.catalogs.iter().map(|c| c.category().to_string()).collect()
    }

    /// Every item across all catalogs, grouped by category in registration order
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.catalogs
            .iter()
            .flat_map(|catalog| {
                let mut names: Vec<&String> = catalog.prices.keys().collect();
                names.sort();
                names
                    .into_iter()
                    .filter_map(|name| catalog.create_order(name))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// The configured menu: item lookup plus accepted payment methods.
#[derive(Debug, Clone)]
pub struct Menu {
    factory: OrderFactory,
    payment_methods: Vec<String>,
}

impl Menu {
    /// Builds the menu from configuration.
    ///
    /// # Errors
    /// Returns a configuration error for empty category or item names, zero
    /// prices, duplicate categories, or items listed in more than one category.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut factory = OrderFactory::new();

        for category in &config.categories {
            let category_name = category.name.trim();
            if category_name.is_empty() {
                return Err(Error::Config {
                    message: "Category name cannot be empty".to_string(),
                });
            }

            let mut catalog = OrderCatalog::new(category_name);
            for item in &category.items {
                let item_name = item.name.trim();
                if item_name.is_empty() {
                    return Err(Error::Config {
                        message: format!("Item name in '{category_name}' cannot be empty"),
                    });
                }
                if item.price == 0 {
                    return Err(Error::Config {
                        message: format!("Item '{item_name}' must have a positive price"),
                    });
                }
                if catalog.create_order(item_name).is_some() {
                    return Err(Error::Config {
                        message: format!("Item '{item_name}' is listed twice in '{category_name}'"),
                    });
                }
                catalog.insert(item_name, item.price);
            }
            factory.register(catalog)?;
        }

        let payment_methods = config
            .payment_methods
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        tracing::debug!(
            categories = config.categories.len(),
            "Menu built from configuration"
        );

        Ok(Self {
            factory,
            payment_methods,
        })
    }

    /// Item lookup
    #[must_use]
    pub const fn factory(&self) -> &OrderFactory {
        &self.factory
    }

    /// Accepted payment methods; empty means any non-empty value is accepted
    #[must_use]
    pub fn payment_methods(&self) -> &[String] {
        &self.payment_methods
    }

    /// Whether `payment` is an accepted payment method
    #[must_use]
    pub fn accepts_payment(&self, payment: &str) -> bool {
        self.payment_methods.is_empty() || self.payment_methods.iter().any(|p| p == payment)
    }
}
