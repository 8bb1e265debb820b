//! Server application models and type definitions.
//!
//! This module contains the application state shared by the HTTP handlers, the audit event
//! written on downloads, and the data kept in each browser's cookie session.

pub mod app;
pub mod event;
pub mod session;
