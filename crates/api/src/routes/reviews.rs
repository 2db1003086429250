//! Review route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kiosk_core::{ProductId, ReviewId, UserId};

use crate::db::{CatalogRepository, ReviewRepository};
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::models::review::{MAX_RATING, MIN_RATING, Review};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Review display data.
#[derive(Debug, Serialize)]
pub struct ReviewView {
    pub id: ReviewId,
    pub product: ProductId,
    pub product_name: String,
    pub user: UserId,
    pub user_name: String,
    pub user_first_name: String,
    pub rating: i32,
    pub title: String,
    pub comment: String,
    pub is_verified_purchase: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Review> for ReviewView {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            product: review.product_id,
            product_name: review.product_name,
            user: review.user_id,
            user_name: review.user_name,
            user_first_name: review.user_first_name,
            rating: review.rating,
            title: review.title,
            comment: review.comment,
            is_verified_purchase: review.is_verified_purchase,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

/// Review creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub product: ProductId,
    pub rating: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
}

/// Review update request body; omitted fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: Option<i32>,
    pub title: Option<String>,
    pub comment: Option<String>,
}

fn validate_rating(rating: i32) -> Result<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::BadRequest(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /products/{id}/reviews`
pub async fn list_product_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Vec<ReviewView>>> {
    let catalog = CatalogRepository::new(state.pool());
    let reviews = ReviewRepository::new(state.pool());

    // 404 for unknown or inactive products, same as the product detail page
    catalog
        .get_active_product(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let list = reviews.list_for_product(product_id).await?;

    Ok(Json(list.into_iter().map(ReviewView::from).collect()))
}

/// `POST /reviews`
pub async fn create_review(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse> {
    validate_rating(body.rating)?;

    let catalog = CatalogRepository::new(state.pool());
    let reviews = ReviewRepository::new(state.pool());

    let product = catalog
        .get_active_product(body.product)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let review = reviews
        .create(user.id, product.id, body.rating, &body.title, &body.comment)
        .await?;

    Ok((StatusCode::CREATED, Json(ReviewView::from(review))))
}

/// `PUT /reviews/{id}`
pub async fn update_review(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(review_id): Path<ReviewId>,
    Json(body): Json<UpdateReviewRequest>,
) -> Result<Json<ReviewView>> {
    if let Some(rating) = body.rating {
        validate_rating(rating)?;
    }

    let reviews = ReviewRepository::new(state.pool());

    let review = reviews
        .update_for_user(
            user.id,
            review_id,
            body.rating,
            body.title.as_deref(),
            body.comment.as_deref(),
        )
        .await?;

    Ok(Json(review.into()))
}

/// `DELETE /reviews/{id}`
pub async fn delete_review(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(review_id): Path<ReviewId>,
) -> Result<impl IntoResponse> {
    let reviews = ReviewRepository::new(state.pool());
    reviews.delete_for_user(user.id, review_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /users/reviews`
pub async fn list_user_reviews(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewView>>> {
    let reviews = ReviewRepository::new(state.pool());
    let list = reviews.list_for_user(user.id).await?;

    Ok(Json(list.into_iter().map(ReviewView::from).collect()))
}
