use anyhow::{Context, Result};
use log::{info, warn};
use rusqlite::{params, Connection};
use rusqlite::OpenFlags;
use std::path::{Path, PathBuf};
use std::sync::Once;

use crate::catalog_model::{Category, ProductRecord};

/// Persisted catalog snapshot backed by a SQLite file
///
/// Every operation opens its own connection and drops it before returning,
/// so the store can be shared freely between tasks without locking.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection for writing, creating the file and schema if missing
    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)
            .with_context(|| format!("Failed to open catalog store at {}", self.path.display()))?;
        init_catalog_schema(&conn)?;
        Ok(conn)
    }

    /// Open a read-only connection, or `None` while nothing has been written
    fn connect_read_only(&self) -> Result<Option<Connection>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open catalog store at {}", self.path.display()))?;

        let has_table: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'aros_products')",
                [],
                |row| row.get(0),
            )
            .context("Failed to inspect catalog schema")?;

        Ok(has_table.then_some(conn))
    }

    /// Insert records, skipping ones already stored. Returns the number of new rows.
    pub fn insert_products(&self, products: &[ProductRecord]) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction().context("Failed to begin insert transaction")?;

        let mut inserted = 0;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT OR IGNORE INTO aros_products (name, price, link, category)
                     VALUES (?1, ?2, ?3, ?4)",
                )
                .context("Failed to prepare insert statement")?;

            for product in products {
                inserted += stmt
                    .execute(params![
                        product.name,
                        product.price,
                        product.link,
                        product.category.label()
                    ])
                    .context("Failed to insert product")?;
            }
        }

        tx.commit().context("Failed to commit products")?;
        info!(
            "Stored {} new of {} scraped products",
            inserted,
            products.len()
        );
        Ok(inserted)
    }

    /// Products in a category, in insertion order
    pub fn products_by_category(&self, category: Category) -> Result<Vec<ProductRecord>> {
        let Some(conn) = self.connect_read_only()? else {
            return Ok(Vec::new());
        };
        let mut stmt = conn
            .prepare(
                "SELECT name, price, link FROM aros_products
                 WHERE category = ?1 ORDER BY id",
            )
            .context("Failed to prepare category query")?;

        let rows = stmt
            .query_map(params![category.label()], |row| {
                Ok(ProductRecord {
                    name: row.get(0)?,
                    price: row.get(1)?,
                    link: row.get(2)?,
                    category,
                })
            })
            .context("Failed to query products by category")?;

        let products = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read product row")?;

        info!("Found {} products in category {}", products.len(), category);
        Ok(products)
    }

    /// Total number of stored rows
    pub fn count(&self) -> Result<usize> {
        let Some(conn) = self.connect_read_only()? else {
            return Ok(0);
        };
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM aros_products", [], |row| row.get(0))
            .context("Failed to count products")?;
        Ok(count as usize)
    }
}

/// Create the products table and its uniqueness index if missing
pub fn init_catalog_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS aros_products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            price TEXT,
            link TEXT,
            category TEXT
        )",
        [],
    )
    .context("Failed to create aros_products table")?;

    // Without this index INSERT OR IGNORE has nothing to conflict on.
    if let Err(e) = conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS aros_products_natural_key
         ON aros_products (name, price, link, category)",
        [],
    ) {
        // Databases written before the index existed may already hold duplicates.
        static INDEX_WARNING: Once = Once::new();
        INDEX_WARNING.call_once(|| {
            warn!("Could not create uniqueness index, duplicates will accumulate: {e}");
        });
    }

    Ok(())
}
