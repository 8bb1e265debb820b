//! Utility functions and helpers for server operations.
//!
//! Currently holds the shared fixtures used by the server's unit tests.
