//! # Catalog Synchronizer
//!
//! Fetches the storefront page, extracts product entries from its HTML and
//! persists them into the [`CatalogStore`].
//!
//! A failed refresh never propagates: [`CatalogSynchronizer::refresh`] logs
//! the error and returns an empty list, which callers must read as
//! "unavailable right now" rather than "the catalog is empty".

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::catalog_errors::CatalogError;
use crate::catalog_model::{CategoryPolicy, KeywordCategoryPolicy, ProductRecord};
use crate::config::CatalogConfig;
use crate::db::CatalogStore;

pub struct CatalogSynchronizer {
    client: reqwest::Client,
    config: CatalogConfig,
    store: CatalogStore,
    policy: Arc<dyn CategoryPolicy>,
}

impl CatalogSynchronizer {
    /// Build a synchronizer using the default keyword categorization
    pub fn new(config: CatalogConfig, store: CatalogStore) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            config,
            store,
            policy: Arc::new(KeywordCategoryPolicy::default()),
        })
    }

    /// Replace the categorization rule
    pub fn with_policy(mut self, policy: impl CategoryPolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Fetch, extract and persist the catalog
    ///
    /// Returns the extracted records, or an empty list if anything failed.
    pub async fn refresh(&self) -> Vec<ProductRecord> {
        match self.try_refresh().await {
            Ok(products) => products,
            Err(e) => {
                error!(url = %self.config.url, error = %e, "Catalog refresh failed");
                Vec::new()
            }
        }
    }

    /// Same as [`refresh`](Self::refresh) but surfaces the failure
    pub async fn try_refresh(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        let body = self.fetch_page().await?;
        let products = parse_catalog_html(&body, &self.config, self.policy.as_ref())?;
        info!(count = products.len(), "Extracted catalog products");

        let store = self.store.clone();
        let batch = products.clone();
        let inserted = tokio::task::spawn_blocking(move || store.insert_products(&batch)).await??;
        debug!(inserted, "Catalog snapshot persisted");

        Ok(products)
    }

    async fn fetch_page(&self) -> Result<String, CatalogError> {
        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: self.config.url.clone(),
            });
        }

        response.text().await.map_err(|e| self.map_transport_error(e))
    }

    fn map_transport_error(&self, e: reqwest::Error) -> CatalogError {
        if e.is_timeout() {
            CatalogError::Timeout(self.config.timeout_secs)
        } else {
            CatalogError::Http(e)
        }
    }
}

fn compile(selector: &str) -> Result<Selector, CatalogError> {
    Selector::parse(selector).map_err(|e| CatalogError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Extract up to `config.max_products` records from a catalog page
///
/// Each field falls back independently: a missing name or price becomes
/// `config.fallback_text`, a missing or unusable link becomes `config.url`.
pub fn parse_catalog_html(
    body: &str,
    config: &CatalogConfig,
    policy: &dyn CategoryPolicy,
) -> Result<Vec<ProductRecord>, CatalogError> {
    let item_selector = compile(&config.selectors.item)?;
    let name_selector = compile(&config.selectors.name)?;
    let price_selector = compile(&config.selectors.price)?;
    let link_selector = compile(&config.selectors.link)?;

    let document = Html::parse_document(body);
    let mut products = Vec::new();

    for item in document.select(&item_selector).take(config.max_products) {
        let name = element_text(&item, &name_selector)
            .unwrap_or_else(|| config.fallback_text.clone());
        let price = element_text(&item, &price_selector)
            .unwrap_or_else(|| config.fallback_text.clone());
        let link = item
            .select(&link_selector)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
            .and_then(|href| resolve_link(&config.url, href))
            .unwrap_or_else(|| config.url.clone());
        let category = policy.categorize(&name);

        products.push(ProductRecord {
            name,
            price,
            link,
            category,
        });
    }

    if products.is_empty() {
        warn!(selector = %config.selectors.item, "No product entries matched");
    }

    Ok(products)
}

/// Whitespace-collapsed text of the first match, if non-empty
fn element_text(item: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    let element = item.select(selector).next()?;
    let text = element.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

/// Resolve `href` against the catalog URL, keeping only http(s) targets
pub fn resolve_link(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let url = Url::parse(base).ok()?.join(href).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_model::Category;

    fn entry(name: &str, price: &str, href: &str) -> String {
        format!(
            r#"<div class="product-item"><a href="{href}"><span class="product-name">{name}</span></a><span class="product-price">{price}</span></div>"#
        )
    }

    #[test]
    fn test_parse_truncates_to_max_products() {
        let body: String = (0..8)
            .map(|i| entry(&format!("Item {i}"), "10 000 so'm", &format!("/uz/p/{i}")))
            .collect();
        let config = CatalogConfig::default();

        let products = parse_catalog_html(&body, &config, &KeywordCategoryPolicy::default()).unwrap();

        assert_eq!(products.len(), 5);
        assert_eq!(products[0].name, "Item 0");
        assert_eq!(products[4].name, "Item 4");
        assert_eq!(products[0].link, "https://aros.uz/uz/p/0");
    }

    #[test]
    fn test_parse_applies_independent_fallbacks() {
        let body = r#"
            <div class="product-item"><span class="product-price">5 so'm</span></div>
            <div class="product-item"><span class="product-name">Wheel accessory</span></div>
            <div class="product-item"><span class="product-name">  </span><a>no href</a></div>
        "#;
        let config = CatalogConfig::default();

        let products = parse_catalog_html(body, &config, &KeywordCategoryPolicy::default()).unwrap();

        assert_eq!(products.len(), 3);
        assert_eq!(products[0].name, "Noma'lum");
        assert_eq!(products[0].price, "5 so'm");
        assert_eq!(products[0].link, "https://aros.uz/uz");

        assert_eq!(products[1].name, "Wheel accessory");
        assert_eq!(products[1].price, "Noma'lum");
        assert_eq!(products[1].category, Category::Accessories);

        assert_eq!(products[2].name, "Noma'lum");
        assert_eq!(products[2].link, "https://aros.uz/uz");
    }

    #[test]
    fn test_parse_collapses_whitespace() {
        let body = entry("\n   Brake\n   pad  ", " 12 000 ", "https://aros.uz/uz/p/9");
        let products =
            parse_catalog_html(&body, &CatalogConfig::default(), &KeywordCategoryPolicy::default()).unwrap();
        assert_eq!(products[0].name, "Brake pad");
        assert_eq!(products[0].price, "12 000");
        assert_eq!(products[0].category, Category::SpareParts);
    }

    #[test]
    fn test_parse_rejects_bad_selector() {
        let mut config = CatalogConfig::default();
        config.selectors.item = "..[".to_string();
        let result = parse_catalog_html("<html></html>", &config, &KeywordCategoryPolicy::default());
        assert!(matches!(result, Err(CatalogError::Selector { .. })));
    }

    #[test]
    fn test_resolve_link() {
        let base = "https://aros.uz/uz";
        assert_eq!(resolve_link(base, "/uz/p/1"), Some("https://aros.uz/uz/p/1".to_string()));
        assert_eq!(
            resolve_link(base, "https://cdn.aros.uz/x"),
            Some("https://cdn.aros.uz/x".to_string())
        );
        assert_eq!(resolve_link(base, "javascript:void(0)"), None);
        assert_eq!(resolve_link(base, "   "), None);
    }
}
