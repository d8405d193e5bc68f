//! Catalog persistence seam

use anyhow::Result;
use async_trait::async_trait;

use super::Product;

/// Operations the import/export paths need from the product catalog
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert a product without an id, or insert-or-replace one that has an id
    async fn save(&self, product: Product) -> Result<Product>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>>;

    /// Exact, case-sensitive name match
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>>;

    /// Save several products in one transaction
    async fn save_all(&self, products: Vec<Product>) -> Result<Vec<Product>>;

    /// All products ordered by id
    async fn find_all(&self) -> Result<Vec<Product>>;
}
