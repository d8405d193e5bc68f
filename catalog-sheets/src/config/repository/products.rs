//! Product catalog repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::catalog::{CatalogStore, Product};

type ProductTuple = (i64, String, Option<String>, f64, i64);

fn from_tuple((id, name, description, price, quantity): ProductTuple) -> Product {
    Product {
        id: Some(id),
        name,
        description,
        price,
        quantity,
    }
}

/// Get a product by id
pub async fn get_product(pool: &SqlitePool, id: i64) -> Result<Option<Product>> {
    let row: Option<ProductTuple> = sqlx::query_as(
        "SELECT id, name, description, price, quantity FROM products WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get product")?;

    Ok(row.map(from_tuple))
}

/// Get the first product with exactly this name
pub async fn get_product_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Product>> {
    let row: Option<ProductTuple> = sqlx::query_as(
        "SELECT id, name, description, price, quantity FROM products
         WHERE name = ?
         ORDER BY id
         LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await
    .context("Failed to get product by name")?;

    Ok(row.map(from_tuple))
}

/// List all products
pub async fn list_products(pool: &SqlitePool) -> Result<Vec<Product>> {
    let rows: Vec<ProductTuple> = sqlx::query_as(
        "SELECT id, name, description, price, quantity FROM products ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list products")?;

    Ok(rows.into_iter().map(from_tuple).collect())
}

/// Insert a new product, or replace the one with the same id
pub async fn save_product(pool: &SqlitePool, product: &Product) -> Result<Product> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;
    let saved = save_product_tx(&mut tx, product).await?;
    tx.commit().await.context("Failed to commit product")?;
    Ok(saved)
}

async fn save_product_tx(tx: &mut Transaction<'_, Sqlite>, product: &Product) -> Result<Product> {
    let id = match product.id {
        Some(id) => {
            sqlx::query(
                "INSERT INTO products (id, name, description, price, quantity)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    description = excluded.description,
                    price = excluded.price,
                    quantity = excluded.quantity",
            )
            .bind(id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.quantity)
            .execute(&mut **tx)
            .await
            .context("Failed to save product")?;
            id
        }
        None => sqlx::query(
            "INSERT INTO products (name, description, price, quantity) VALUES (?, ?, ?, ?)",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.quantity)
        .execute(&mut **tx)
        .await
        .context("Failed to insert product")?
        .last_insert_rowid(),
    };

    Ok(Product {
        id: Some(id),
        ..product.clone()
    })
}

/// SQLite-backed [`CatalogStore`]
#[derive(Debug, Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn save(&self, product: Product) -> Result<Product> {
        save_product(&self.pool, &product).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>> {
        get_product(&self.pool, id).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>> {
        get_product_by_name(&self.pool, name).await
    }

    async fn save_all(&self, products: Vec<Product>) -> Result<Vec<Product>> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;
        let mut saved = Vec::with_capacity(products.len());
        for product in &products {
            saved.push(save_product_tx(&mut tx, product).await?);
        }
        tx.commit().await.context("Failed to commit products")?;
        Ok(saved)
    }

    async fn find_all(&self) -> Result<Vec<Product>> {
        list_products(&self.pool).await
    }
}
