//! User domain types.

use chrono::{DateTime, NaiveDate, Utc};

use kiosk_core::{Email, UserId};

/// A registered user (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// User's email address.
    pub email: Email,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Optional profile attributes, 1:1 with a user.
///
/// A pure attribute bag; an empty profile row is created at registration.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}
