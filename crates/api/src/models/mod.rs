//! Domain models for the Kiosk API.
//!
//! These types represent validated domain objects separate from database row
//! types; repositories in [`crate::db`] produce them, and route modules map
//! them onto JSON view types.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod review;
pub mod session;
pub mod user;

pub use cart::{Cart, CartDetail, CartItem};
pub use catalog::{Category, Product};
pub use order::{Order, OrderDetail, OrderItem};
pub use review::{RatingSummary, Review};
pub use session::CurrentUser;
pub use user::{User, UserProfile};
