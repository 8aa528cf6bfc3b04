//! # Catalog Data Model
//!
//! Product records scraped from the remote storefront and the coarse
//! category classification attached to them during extraction.
//!
//! ## Core Concepts
//!
//! - **ProductRecord**: one catalog entry (name, price, link, category)
//! - **Category**: fixed set of labels shown to users as inline buttons
//! - **CategoryPolicy**: replaceable rule that maps a product name to a category
//!
//! ## Usage
//!
//! ```rust
//! use aros_catalog_bot::catalog_model::{Category, CategoryPolicy, KeywordCategoryPolicy};
//!
//! let policy = KeywordCategoryPolicy::default();
//! assert_eq!(policy.categorize("Phone Accessory Kit"), Category::Accessories);
//! assert_eq!(policy.categorize("Brake pad"), Category::SpareParts);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keyword that marks a product as an accessory
pub const ACCESSORY_KEYWORD: &str = "accessory";

/// One scraped catalog entry
///
/// Every field is non-empty after extraction: missing source data is
/// replaced by a fallback value, never left blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product title as shown on the storefront
    pub name: String,

    /// Price text, kept verbatim (currency and formatting vary)
    pub price: String,

    /// Absolute URL of the product page
    pub link: String,

    /// Heuristic category assigned from the name
    pub category: Category,
}

impl ProductRecord {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        link: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            link: link.into(),
            category,
        }
    }
}

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// "Aksessuarlar"
    Accessories,
    /// "Ehtiyot qismlar"
    SpareParts,
}

impl Category {
    /// Every category, in the order the selector keyboard shows them
    pub const ALL: [Category; 2] = [Category::Accessories, Category::SpareParts];

    /// Display label, also the value persisted in the store
    pub fn label(self) -> &'static str {
        match self {
            Category::Accessories => "Aksessuarlar",
            Category::SpareParts => "Ehtiyot qismlar",
        }
    }

    /// Lower-cased label, used as the callback key
    pub fn key(self) -> String {
        self.label().to_lowercase()
    }

    /// Resolve a category from a key or label, ignoring case and
    /// surrounding whitespace
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rule assigning a category to a product from its name
pub trait CategoryPolicy: Send + Sync {
    fn categorize(&self, name: &str) -> Category;
}

/// Single keyword predicate over the lower-cased name
#[derive(Debug, Clone)]
pub struct KeywordCategoryPolicy {
    keyword: String,
    matched: Category,
    fallback: Category,
}

impl KeywordCategoryPolicy {
    pub fn new(keyword: impl Into<String>, matched: Category, fallback: Category) -> Self {
        Self {
            keyword: keyword.into().to_lowercase(),
            matched,
            fallback,
        }
    }
}

impl Default for KeywordCategoryPolicy {
    fn default() -> Self {
        Self::new(ACCESSORY_KEYWORD, Category::Accessories, Category::SpareParts)
    }
}

impl CategoryPolicy for KeywordCategoryPolicy {
    fn categorize(&self, name: &str) -> Category {
        if name.to_lowercase().contains(&self.keyword) {
            self.matched
        } else {
            self.fallback
        }
    }
}
