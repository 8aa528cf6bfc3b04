//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use aros_catalog_bot::bot::{Reply, Transport, UpdateDispatcher};
use aros_catalog_bot::catalog_sync::CatalogSynchronizer;
use aros_catalog_bot::config::CatalogConfig;
use aros_catalog_bot::db::CatalogStore;

/// Nothing listens here, so every fetch fails with a connection error
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1/uz";

/// One well-formed product entry
pub fn product_entry(name: &str, price: &str, href: &str) -> String {
    format!(
        r#"<div class="product-item">
             <a href="{href}"><img src="/img.png"></a>
             <h3 class="product-name">{name}</h3>
             <span class="product-price">{price}</span>
           </div>"#
    )
}

/// Catalog page wrapping the given entries
pub fn catalog_page(entries: &[String]) -> String {
    format!(
        "<html><head><title>Aros</title></head><body><div class=\"grid\">{}</div></body></html>",
        entries.concat()
    )
}

pub fn catalog_config(url: &str) -> CatalogConfig {
    CatalogConfig {
        timeout_secs: 2,
        ..CatalogConfig::with_url(url)
    }
}

pub fn synchronizer(url: &str, db_path: &Path) -> CatalogSynchronizer {
    CatalogSynchronizer::new(catalog_config(url), CatalogStore::new(db_path))
        .expect("Failed to build synchronizer")
}

pub fn dispatcher(url: &str, db_path: &Path) -> UpdateDispatcher {
    UpdateDispatcher::new(synchronizer(url, db_path)).expect("Failed to build dispatcher")
}

/// Transport that records what the dispatcher and endpoint send
#[derive(Default)]
pub struct RecordingTransport {
    pub acks: Mutex<Vec<String>>,
    pub delivered: Mutex<Vec<(i64, Reply)>>,
    pub fail_delivery: bool,
    pub panic_on_ack: bool,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            fail_delivery: true,
            ..Self::default()
        }
    }

    pub fn panicking_ack() -> Self {
        Self {
            panic_on_ack: true,
            ..Self::default()
        }
    }

    pub fn acks(&self) -> Vec<String> {
        self.acks.lock().unwrap().clone()
    }

    pub fn delivered(&self) -> Vec<(i64, Reply)> {
        self.delivered.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    async fn acknowledge(&self, callback_id: &str) -> anyhow::Result<()> {
        if self.panic_on_ack {
            panic!("acknowledge blew up for {callback_id}");
        }
        self.acks.lock().unwrap().push(callback_id.to_string());
        Ok(())
    }

    async fn deliver(&self, chat_id: i64, reply: &Reply) -> anyhow::Result<()> {
        if self.fail_delivery {
            anyhow::bail!("telegram unavailable");
        }
        self.delivered.lock().unwrap().push((chat_id, reply.clone()));
        Ok(())
    }
}
