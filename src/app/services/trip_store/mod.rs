//! SQLite persistence for trips, positions and measurements
//!
//! - [`schema`] - Versioned schema migrations
//! - [`store`] - Connection handling and scoped load transactions
//! - [`display_ranges`] - The post-load display range hook

pub mod display_ranges;
pub mod schema;
pub mod store;

#[cfg(test)]
pub mod tests;

pub use display_ranges::{DisplayRanges, SqlRoutines};
pub use store::{StoreTransaction, TripStore};
