//! Session data models and utilities.
//!
//! Type-safe wrappers for data stored in the browser's tower-sessions session.

pub mod dashboard;
