//! Tests for the get_regions endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use harvest::server::controller::region::get_regions;

use super::*;

/// Expect the warehouse region list as JSON.
#[tokio::test]
async fn success_with_region_list() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let _session = test.warehouse().with_session_endpoint("4711", 1);
    let regions = test.warehouse().with_statement_endpoint(
        LIST_REGIONS_SQL,
        &["Region"],
        vec![vec![Some("Peru")], vec![Some("Brazil")], vec![Some("Chile")]],
        1,
    );

    let result = get_regions(State(test.into_app_state()), test.session.clone()).await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Vec<String> = serde_json::from_slice(&body_bytes(resp).await)?;
    assert_eq!(body, vec!["Peru", "Brazil", "Chile"]);
    regions.assert();

    Ok(())
}

/// Expect 503 once every connection attempt failed.
#[tokio::test]
async fn service_unavailable_when_warehouse_unreachable() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let session = test.warehouse().with_failing_session_endpoint(500, 3);

    let result = get_regions(State(test.into_app_state()), test.session.clone()).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await)?;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("An error occurred. Error details:"));
    session.assert();

    Ok(())
}
