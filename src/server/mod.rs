//! Server application core modules.
//!
//! This module contains all server-side functionality for the Harvest dashboard: loading
//! warehouse credentials, talking to the Snowflake SQL API, keeping one warehouse session per
//! dashboard user, serving the dashboard's JSON and file endpoints, and sweeping idle
//! sessions in the background.

#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod util;
pub mod warehouse;
