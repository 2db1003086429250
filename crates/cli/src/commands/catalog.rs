//! Catalog management commands.
//!
//! The REST API treats the catalog as read-only; categories and products
//! are created here.

use rust_decimal::Decimal;

use kiosk_api::db::CatalogRepository;
use kiosk_core::CategoryId;

use super::{CliError, connect};

/// Create a category.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the name is taken.
pub async fn add_category(name: &str, description: &str) -> Result<(), CliError> {
    let pool = connect().await?;
    let catalog = CatalogRepository::new(&pool);

    let category = catalog.create_category(name, description).await?;
    tracing::info!(id = %category.id, name = %category.name, "category created");

    Ok(())
}

/// Create a product.
///
/// # Errors
///
/// Returns an error if the price doesn't parse, the category doesn't exist,
/// or the database is unreachable.
pub async fn add_product(
    name: &str,
    description: &str,
    price: &str,
    category: i32,
    stock: i32,
    image_url: Option<&str>,
) -> Result<(), CliError> {
    let price = price
        .parse::<Decimal>()
        .map_err(|e| CliError::InvalidArgument("price", e.to_string()))?;

    if price < Decimal::ZERO {
        return Err(CliError::InvalidArgument(
            "price",
            "must not be negative".to_owned(),
        ));
    }

    if stock < 0 {
        return Err(CliError::InvalidArgument(
            "stock",
            "must not be negative".to_owned(),
        ));
    }

    let pool = connect().await?;
    let catalog = CatalogRepository::new(&pool);

    let product = catalog
        .create_product(
            name,
            description,
            price,
            CategoryId::new(category),
            stock,
            image_url,
        )
        .await?;

    tracing::info!(
        id = %product.id,
        name = %product.name,
        price = %product.price,
        stock = product.stock_quantity,
        "product created"
    );

    Ok(())
}
