//! Tests for the get_production endpoint.
//!
//! Verifies scaling to display units, sorting by region, the empty selection guard, and the
//! reuse of one warehouse session across requests of the same browser.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use harvest::{
    model::api::{ProductionDto, EMPTY_SELECTION_MESSAGE},
    server::controller::production::get_production,
};

use super::*;

/// Expect scaled values sorted by region.
#[tokio::test]
async fn success_with_scaled_sorted_table() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let _session = test.warehouse().with_session_endpoint("4711", 1);
    let _peru = test.warehouse().with_bound_statement_endpoint(
        REGION_ROWS_SQL,
        "Peru",
        &["Region", "2020", "2021"],
        vec![vec![Some("Peru"), Some("1000000"), Some("1500000")]],
        1,
    );
    let _brazil = test.warehouse().with_bound_statement_endpoint(
        REGION_ROWS_SQL,
        "Brazil",
        &["Region", "2020", "2021"],
        vec![vec![Some("Brazil"), Some("250000000"), Some("260000000")]],
        1,
    );

    let result = get_production(
        State(test.into_app_state()),
        test.session.clone(),
        Query(region_params(&["Peru", "Brazil"])),
    )
    .await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);
    let dto: ProductionDto = serde_json::from_slice(&body_bytes(resp).await)?;
    assert_eq!(dto.table.years, vec!["2020", "2021"]);
    assert_eq!(dto.table.regions(), vec!["Brazil", "Peru"]);
    assert_eq!(dto.table.rows[0].values, vec![Some(250.0), Some(260.0)]);
    assert_eq!(dto.table.rows[1].values, vec![Some(1.0), Some(1.5)]);

    Ok(())
}

/// Expect 400 with the selection prompt and no warehouse traffic.
#[tokio::test]
async fn bad_request_for_empty_selection() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let session = test.warehouse().with_session_endpoint("4711", 0);

    let result = get_production(
        State(test.into_app_state()),
        test.session.clone(),
        Query(vec![("format".to_string(), "wide".to_string())]),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await)?;
    assert_eq!(body["error"], EMPTY_SELECTION_MESSAGE);
    session.assert();

    Ok(())
}

/// Expect an empty table, not an error, when the selection has no rows.
#[tokio::test]
async fn success_with_empty_table_for_unknown_region() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let _session = test.warehouse().with_session_endpoint("4711", 1);
    let _rows = test.warehouse().with_bound_statement_endpoint(
        REGION_ROWS_SQL,
        "Atlantis",
        &["Region", "2020"],
        vec![],
        1,
    );

    let result = get_production(
        State(test.into_app_state()),
        test.session.clone(),
        Query(region_params(&["Atlantis"])),
    )
    .await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);
    let dto: ProductionDto = serde_json::from_slice(&body_bytes(resp).await)?;
    assert!(dto.table.is_empty());

    Ok(())
}

/// Expect one warehouse session for consecutive requests of the same browser.
#[tokio::test]
async fn reuses_session_across_requests() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let session = test.warehouse().with_session_endpoint("4711", 1);
    let rows = test.warehouse().with_bound_statement_endpoint(
        REGION_ROWS_SQL,
        "Peru",
        &["Region", "2020"],
        vec![vec![Some("Peru"), Some("1000000")]],
        2,
    );
    let state = test.into_app_state();

    for _ in 0..2 {
        let result = get_production(
            State(state.clone()),
            test.session.clone(),
            Query(region_params(&["Peru"])),
        )
        .await;

        assert_eq!(result.unwrap().into_response().status(), StatusCode::OK);
    }

    session.assert();
    rows.assert();

    Ok(())
}

/// Expect separate warehouse sessions for separate browsers.
#[tokio::test]
async fn separates_sessions_per_browser() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let other = TestBuilder::new().build().await?;
    let session = test.warehouse().with_session_endpoint("4711", 2);
    let _rows = test.warehouse().with_bound_statement_endpoint(
        REGION_ROWS_SQL,
        "Peru",
        &["Region", "2020"],
        vec![vec![Some("Peru"), Some("1000000")]],
        2,
    );
    let state = test.into_app_state();

    for browser in [test.session.clone(), other.session.clone()] {
        let result = get_production(
            State(state.clone()),
            browser,
            Query(region_params(&["Peru"])),
        )
        .await;

        assert_eq!(result.unwrap().into_response().status(), StatusCode::OK);
    }

    session.assert();
    assert_eq!(state.sessions.registry().len().await, 2);

    Ok(())
}
