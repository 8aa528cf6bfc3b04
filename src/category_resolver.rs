//! Read-only access to the stored catalog, filtered by category.

use anyhow::{Context, Result};
use tracing::debug;

use crate::catalog_model::{Category, ProductRecord};
use crate::db::CatalogStore;

#[derive(Debug, Clone)]
pub struct CategoryResolver {
    store: CatalogStore,
}

impl CategoryResolver {
    pub fn new(store: CatalogStore) -> Self {
        Self { store }
    }

    /// Stored products whose category matches exactly, in insertion order
    ///
    /// An empty result is not an error; it means nothing has been fetched
    /// for that category yet.
    pub async fn lookup(&self, category: Category) -> Result<Vec<ProductRecord>> {
        let store = self.store.clone();
        let products = tokio::task::spawn_blocking(move || store.products_by_category(category))
            .await
            .context("Category lookup task failed")??;
        debug!(%category, count = products.len(), "Resolved category");
        Ok(products)
    }
}
