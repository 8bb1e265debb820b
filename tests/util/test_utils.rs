//! Test utilities for creating AppState backed by the mock warehouse

use std::time::Duration;

use axum::{body::to_bytes, response::Response};
use harvest::server::{
    config::Config, model::app::AppState, service::session::WarehouseSessionService,
    warehouse::SnowflakeClient,
};
use harvest_test_utils::TestContext;

/// Extension trait for TestContext to create AppState pointing at the mock server
pub trait TestContextExt {
    fn into_app_state(&self) -> AppState;
}

impl TestContextExt for TestContext {
    fn into_app_state(&self) -> AppState {
        let config = Config {
            account: "xy12345".to_string(),
            user: "REPORT_USER".to_string(),
            private_key: self.key().private_key_pem.clone(),
            private_key_passphrase: self.key().passphrase.clone(),
            database: "AGRO".to_string(),
            schema: "PUBLIC".to_string(),
            warehouse: "COMPUTE_WH".to_string(),
            role: "REPORTER".to_string(),
            api_url: Some(self.server_url()),
        };

        let client = SnowflakeClient::new(&config).expect("Failed to build Snowflake client");

        AppState {
            sessions: WarehouseSessionService::new(client).with_retry_delay(Duration::ZERO),
        }
    }
}

/// Collects a response body
pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body")
        .to_vec()
}

/// Region query parameters as the extractor yields them
pub fn region_params(regions: &[&str]) -> Vec<(String, String)> {
    regions
        .iter()
        .map(|region| ("region".to_string(), region.to_string()))
        .collect()
}
