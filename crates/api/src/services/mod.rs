//! Business logic services.
//!
//! Services sit between route handlers and repositories: `auth` owns
//! credential validation and hashing, `checkout` owns the one multi-entity
//! transaction in the system.

pub mod auth;
pub mod checkout;

pub use auth::AuthService;
pub use checkout::CheckoutService;
