//! Tests for the dashboard HTTP endpoints.
//!
//! Handlers are called directly with an [`AppState`](harvest::server::model::app::AppState)
//! wired to a mock Snowflake SQL API and an in-memory browser session.

mod export;
mod production;
mod region;

pub use harvest::server::data::{
    event::INSERT_EVENT_SQL,
    production::{LIST_REGIONS_SQL, REGION_ROWS_SQL},
};
pub use harvest_test_utils::prelude::*;

pub use crate::{
    util::test_utils::{body_bytes, region_params},
    TestContextExt,
};
