//! Catalog route handlers.
//!
//! Public and read-only; catalog writes go through `kiosk-cli`.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kiosk_core::{CategoryId, ProductId};

use crate::db::{CatalogRepository, ReviewRepository};
use crate::error::{AppError, Result};
use crate::models::catalog::{Category, Product};
use crate::models::review::RatingSummary;
use crate::routes::reviews::ReviewView;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Category display data.
#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            created_at: category.created_at,
        }
    }
}

/// Product display data with derived review aggregates.
#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: CategoryId,
    pub category_name: String,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub average_rating: f64,
    pub review_count: i64,
    pub rating_distribution: BTreeMap<i32, i64>,
}

impl ProductView {
    fn new(product: Product, summary: RatingSummary) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            category: product.category_id,
            category_name: product.category_name,
            stock_quantity: product.stock_quantity,
            image_url: product.image_url,
            is_active: product.is_active,
            created_at: product.created_at,
            average_rating: summary.average,
            review_count: summary.count,
            rating_distribution: summary.distribution,
        }
    }
}

/// Product detail with its reviews inlined.
#[derive(Debug, Serialize)]
pub struct ProductDetailView {
    #[serde(flatten)]
    pub product: ProductView,
    pub reviews: Vec<ReviewView>,
}

/// Query parameters for product listing.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<CategoryId>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /products`
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let catalog = CatalogRepository::new(state.pool());
    let reviews = ReviewRepository::new(state.pool());

    let products = catalog.list_active_products(query.category).await?;

    let ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();
    let mut counts = reviews.rating_counts_many(&ids).await?;

    let views = products
        .into_iter()
        .map(|product| {
            let summary = counts
                .remove(&product.id)
                .map_or_else(RatingSummary::default, |c| RatingSummary::from_counts(&c));
            ProductView::new(product, summary)
        })
        .collect();

    Ok(Json(views))
}

/// `GET /products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDetailView>> {
    let catalog = CatalogRepository::new(state.pool());
    let reviews = ReviewRepository::new(state.pool());

    let product = catalog
        .get_active_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let summary = RatingSummary::from_counts(&reviews.rating_counts(id).await?);
    let product_reviews = reviews.list_for_product(id).await?;

    Ok(Json(ProductDetailView {
        product: ProductView::new(product, summary),
        reviews: product_reviews.into_iter().map(ReviewView::from).collect(),
    }))
}

/// `GET /categories`
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryView>>> {
    let catalog = CatalogRepository::new(state.pool());
    let categories = catalog.list_categories().await?;

    Ok(Json(
        categories.into_iter().map(CategoryView::from).collect(),
    ))
}
