//! Review domain types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use kiosk_core::{ProductId, ReviewId, UserId};

/// Valid rating bounds (inclusive).
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// A user's review of a product.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub product_name: String,
    pub user_id: UserId,
    pub user_name: String,
    pub user_first_name: String,
    pub rating: i32,
    pub title: String,
    pub comment: String,
    /// Captured when the review is created; not re-evaluated afterwards.
    pub is_verified_purchase: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate rating data for one product, derived from its reviews.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingSummary {
    /// Mean rating rounded to one decimal, 0 when there are no reviews.
    pub average: f64,
    /// Number of reviews.
    pub count: i64,
    /// Review count per rating value 1..=5.
    pub distribution: BTreeMap<i32, i64>,
}

impl RatingSummary {
    /// Build a summary from `(rating, count)` pairs.
    ///
    /// Ratings outside 1..=5 cannot occur (enforced on write) and are
    /// ignored here.
    #[must_use]
    pub fn from_counts(counts: &[(i32, i64)]) -> Self {
        let mut distribution: BTreeMap<i32, i64> =
            (MIN_RATING..=MAX_RATING).map(|r| (r, 0)).collect();
        let mut total = 0_i64;
        let mut weighted = 0_i64;

        for &(rating, count) in counts {
            if let Some(slot) = distribution.get_mut(&rating) {
                *slot = count;
                total += count;
                weighted += i64::from(rating) * count;
            }
        }

        #[allow(clippy::cast_precision_loss)] // Review counts never exceed f64 precision
        let average = if total == 0 {
            0.0
        } else {
            (weighted as f64 / total as f64 * 10.0).round() / 10.0
        };

        Self {
            average,
            count: total,
            distribution,
        }
    }
}

impl Default for RatingSummary {
    fn default() -> Self {
        Self::from_counts(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_5_3_4() {
        // Ratings [5, 3, 4] average to exactly 4.0
        let summary = RatingSummary::from_counts(&[(5, 1), (3, 1), (4, 1)]);
        assert!((summary.average - 4.0).abs() < f64::EPSILON);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.distribution.get(&5), Some(&1));
        assert_eq!(summary.distribution.get(&4), Some(&1));
        assert_eq!(summary.distribution.get(&3), Some(&1));
        assert_eq!(summary.distribution.get(&2), Some(&0));
        assert_eq!(summary.distribution.get(&1), Some(&0));
    }

    #[test]
    fn test_summary_empty() {
        let summary = RatingSummary::from_counts(&[]);
        assert!((summary.average - 0.0).abs() < f64::EPSILON);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.distribution.len(), 5);
    }

    #[test]
    fn test_summary_rounds_to_one_decimal() {
        // [5, 4] -> 4.5; [5, 4, 4] -> 4.333... -> 4.3
        let summary = RatingSummary::from_counts(&[(5, 1), (4, 2)]);
        assert!((summary.average - 4.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_ignores_out_of_range() {
        let summary = RatingSummary::from_counts(&[(9, 4), (5, 1)]);
        assert_eq!(summary.count, 1);
        assert!((summary.average - 5.0).abs() < f64::EPSILON);
    }
}
