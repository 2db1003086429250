//! Review repository for database operations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use kiosk_core::{OrderStatus, ProductId, ReviewId, UserId};

use super::{RepositoryError, is_unique_violation};
use crate::models::review::Review;

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: ReviewId,
    product_id: ProductId,
    product_name: String,
    user_id: UserId,
    user_name: String,
    user_first_name: String,
    rating: i32,
    title: String,
    comment: String,
    is_verified_purchase: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            user_id: row.user_id,
            user_name: row.user_name,
            user_first_name: row.user_first_name,
            rating: row.rating,
            title: row.title,
            comment: row.comment,
            is_verified_purchase: row.is_verified_purchase,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const REVIEW_SELECT: &str = "SELECT r.id, r.product_id, p.name AS product_name, r.user_id,
        u.username AS user_name, u.first_name AS user_first_name,
        r.rating, r.title, r.comment, r.is_verified_purchase,
        r.created_at, r.updated_at
 FROM shop.reviews r
 JOIN shop.products p ON r.product_id = p.id
 JOIN shop.users u ON r.user_id = u.id";

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all reviews for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "{REVIEW_SELECT} WHERE r.product_id = $1 ORDER BY r.created_at DESC, r.id DESC"
        ))
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    /// List all reviews written by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "{REVIEW_SELECT} WHERE r.user_id = $1 ORDER BY r.created_at DESC, r.id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    /// True if the user has a qualifying order containing the product.
    ///
    /// Qualifying means an order whose status is processing, shipped, or
    /// delivered; a still-pending or cancelled order does not count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn has_verified_purchase(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let statuses: Vec<String> = OrderStatus::VERIFIED_PURCHASE
            .iter()
            .map(|s| s.as_str().to_owned())
            .collect();

        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                 SELECT 1
                 FROM shop.order_items oi
                 JOIN shop.orders o ON oi.order_id = o.id
                 WHERE o.user_id = $1 AND oi.product_id = $2 AND o.status = ANY($3)
             )",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(&statuses)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Create a review, capturing the verified-purchase flag at creation
    /// time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already reviewed the
    /// product.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        user_id: UserId,
        product_id: ProductId,
        rating: i32,
        title: &str,
        comment: &str,
    ) -> Result<Review, RepositoryError> {
        let verified = self.has_verified_purchase(user_id, product_id).await?;

        let (id,): (ReviewId,) = sqlx::query_as(
            "INSERT INTO shop.reviews
                 (product_id, user_id, rating, title, comment, is_verified_purchase)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(product_id)
        .bind(user_id)
        .bind(rating)
        .bind(title)
        .bind(comment)
        .bind(verified)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return RepositoryError::Conflict(
                    "you have already reviewed this product".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        self.get(id).await
    }

    /// Partially update a review owned by `user_id`.
    ///
    /// `None` fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review doesn't exist or
    /// belongs to another user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_for_user(
        &self,
        user_id: UserId,
        review_id: ReviewId,
        rating: Option<i32>,
        title: Option<&str>,
        comment: Option<&str>,
    ) -> Result<Review, RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.reviews
             SET rating = COALESCE($1, rating),
                 title = COALESCE($2, title),
                 comment = COALESCE($3, comment),
                 updated_at = now()
             WHERE id = $4 AND user_id = $5",
        )
        .bind(rating)
        .bind(title)
        .bind(comment)
        .bind(review_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(review_id).await
    }

    /// Delete a review owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review doesn't exist or
    /// belongs to another user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete_for_user(
        &self,
        user_id: UserId,
        review_id: ReviewId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.reviews WHERE id = $1 AND user_id = $2")
            .bind(review_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Per-rating review counts for one product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn rating_counts(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<(i32, i64)>, RepositoryError> {
        let rows: Vec<(i32, i64)> = sqlx::query_as(
            "SELECT rating, COUNT(*) FROM shop.reviews WHERE product_id = $1 GROUP BY rating",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-rating review counts for many products at once.
    ///
    /// Products with no reviews are absent from the map.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn rating_counts_many(
        &self,
        product_ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Vec<(i32, i64)>>, RepositoryError> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<i32> = product_ids.iter().map(ProductId::as_i32).collect();

        let rows: Vec<(ProductId, i32, i64)> = sqlx::query_as(
            "SELECT product_id, rating, COUNT(*)
             FROM shop.reviews
             WHERE product_id = ANY($1)
             GROUP BY product_id, rating",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut counts: HashMap<ProductId, Vec<(i32, i64)>> = HashMap::new();
        for (product_id, rating, count) in rows {
            counts.entry(product_id).or_default().push((rating, count));
        }

        Ok(counts)
    }

    /// Fetch one review by ID with its joined display fields.
    async fn get(&self, id: ReviewId) -> Result<Review, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!("{REVIEW_SELECT} WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}
