//! Repository layer for database persistence.
//!
//! All database access uses Diesel ORM with compile-time query checking
//! against SQLite.

pub mod context;
pub mod item;
pub mod models;
pub mod pool;
pub mod price;
pub mod store;
pub mod util;

pub use context::DbContext;
pub use item::DieselItemRepository;
pub use pool::{DbPool, DieselError};
pub use price::{DieselPriceRepository, DEFAULT_FRESHNESS_WINDOW_HOURS};
pub use store::{ItemStore, PriceStore};
