//! Utility functions for controller request handling.
//!
//! Helpers shared by the dashboard endpoints: reading the region selection from the query
//! string and resolving the browser's dashboard key.

pub mod dashboard;
