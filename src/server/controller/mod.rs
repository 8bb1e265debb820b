//! HTTP controller endpoints for the Harvest web API.
//!
//! This module contains Axum handlers for the region list, the production table, and the
//! CSV and PNG downloads. Controllers read the region selection from the query string,
//! resolve the browser's dashboard key from its tower-sessions session, call into the
//! services, and return JSON or file responses documented with utoipa.

pub mod export;
pub mod production;
pub mod region;
pub mod util;
