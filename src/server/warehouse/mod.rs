//! Snowflake SQL API client.
//!
//! Statements are sent to the SQL REST API (`/api/v2/statements`) authenticated with a
//! key-pair JWT. Values are always passed as bindings; statement text never embeds user
//! input.

pub mod auth;
pub mod client;
pub mod statement;

pub use client::{SnowflakeClient, WarehouseSession};
pub use statement::{ResultSet, Statement};
