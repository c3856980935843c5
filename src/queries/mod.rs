//! Read-only query interfaces over the price store.
//!
//! Each query struct borrows a [`Connection`](crate::connection::Connection)
//! and returns typed rows.

pub mod observations;

pub use observations::{ObservationQuery, ProductStats};
