//! Types and transforms shared by the server and the web client.

pub mod api;
pub mod chart;
pub mod production;
