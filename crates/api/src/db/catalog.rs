//! Catalog repository for categories and products.
//!
//! The API only ever reads the catalog; writes happen through `kiosk-cli`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use kiosk_core::{CategoryId, ProductId};

use super::{RepositoryError, is_unique_violation};
use crate::models::catalog::{Category, Product};

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: String,
    price: Decimal,
    category_id: CategoryId,
    category_name: String,
    stock_quantity: i32,
    image_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            category_id: row.category_id,
            category_name: row.category_name,
            stock_quantity: row.stock_quantity,
            image_url: row.image_url,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

const PRODUCT_SELECT: &str = "SELECT p.id, p.name, p.description, p.price, p.category_id,
        c.name AS category_name, p.stock_quantity, p.image_url, p.is_active, p.created_at
 FROM shop.products p
 JOIN shop.categories c ON p.category_id = c.id";

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description, created_at FROM shop.categories ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// List active products, optionally restricted to one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active_products(
        &self,
        category: Option<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = match category {
            Some(category_id) => {
                sqlx::query_as::<_, ProductRow>(&format!(
                    "{PRODUCT_SELECT} WHERE p.is_active AND p.category_id = $1 ORDER BY p.id"
                ))
                .bind(category_id)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProductRow>(&format!(
                    "{PRODUCT_SELECT} WHERE p.is_active ORDER BY p.id"
                ))
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a single active product by ID.
    ///
    /// Inactive products are treated the same as missing ones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active_product(
        &self,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_SELECT} WHERE p.is_active AND p.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Create a category (administrative tooling only).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_category(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "INSERT INTO shop.categories (name, description)
             VALUES ($1, $2)
             RETURNING id, name, description, created_at",
        )
        .bind(name)
        .bind(description)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return RepositoryError::Conflict("category name already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Create a product (administrative tooling only).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_product(
        &self,
        name: &str,
        description: &str,
        price: Decimal,
        category_id: CategoryId,
        stock_quantity: i32,
        image_url: Option<&str>,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "WITH inserted AS (
                 INSERT INTO shop.products
                     (name, description, price, category_id, stock_quantity, image_url)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING id, name, description, price, category_id, stock_quantity,
                           image_url, is_active, created_at
             )
             SELECT i.id, i.name, i.description, i.price, i.category_id,
                    c.name AS category_name, i.stock_quantity, i.image_url,
                    i.is_active, i.created_at
             FROM inserted i
             JOIN shop.categories c ON i.category_id = c.id",
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(category_id)
        .bind(stock_quantity)
        .bind(image_url)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation()) {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }
}
