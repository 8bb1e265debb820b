//! Data access layer repositories.
//!
//! Repositories run statements against the warehouse through an already established
//! [`WarehouseSession`](crate::server::warehouse::WarehouseSession): the production table
//! read by the dashboard and the append-only audit table written on downloads.

pub mod event;
pub mod production;
